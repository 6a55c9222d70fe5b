use std::sync::Arc;

use twilight_http::Client;

use scriptos_paste::{PasteClient, ScriptRelay};
use scriptos_store::{ChannelDirectory, CooldownTracker};

/// Environment-backed startup configuration.
pub mod config;
/// Single-channel authorization.
pub mod gate;

pub use config::{Config, ConfigError};
pub use gate::ChannelGate;

/// Shared application context passed into command handlers.
///
/// Cheap to clone because it only stores reference-counted shared state.
#[derive(Clone)]
pub struct Context {
    pub http: Arc<Client>,
    pub gate: Arc<ChannelGate>,
    pub cooldowns: Arc<CooldownTracker>,
    pub channels: Arc<ChannelDirectory>,
    pub relay: Arc<dyn ScriptRelay>,
}

impl Context {
    /// Create a new application context from explicit collaborators.
    pub fn new(
        http: Arc<Client>,
        gate: ChannelGate,
        cooldowns: CooldownTracker,
        relay: Arc<dyn ScriptRelay>,
    ) -> Self {
        Self {
            http,
            gate: Arc::new(gate),
            cooldowns: Arc::new(cooldowns),
            channels: Arc::new(ChannelDirectory::new()),
            relay,
        }
    }

    /// Create the context described by the startup configuration.
    pub fn from_config(http: Arc<Client>, config: &Config) -> Self {
        let relay = PasteClient::new(
            config.paste_service,
            config.paste_base_url.clone(),
            config.paste_api_key.clone(),
        );

        Self::new(
            http,
            ChannelGate::new(config.channel_name.clone()),
            CooldownTracker::from_secs(config.cooldown_secs),
            Arc::new(relay),
        )
    }
}
