use std::collections::HashMap;

use tokio::sync::RwLock;

/// Cache of channel names keyed by channel snowflake.
///
/// Message events only carry a channel id, while the gate works on names.
/// Entries are filled on first lookup and refreshed from channel update events.
#[derive(Debug, Default)]
pub struct ChannelDirectory {
    names: RwLock<HashMap<u64, String>>,
}

impl ChannelDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached name for a channel, if known.
    pub async fn name(&self, channel_id: u64) -> Option<String> {
        self.names.read().await.get(&channel_id).cloned()
    }

    /// Record or overwrite the name of a channel.
    pub async fn remember(&self, channel_id: u64, name: impl Into<String>) {
        self.names.write().await.insert(channel_id, name.into());
    }

    /// Drop a channel from the cache.
    pub async fn forget(&self, channel_id: u64) {
        self.names.write().await.remove(&channel_id);
    }
}
