use std::future::Future;
use std::sync::Arc;

use tracing::{error, info, warn};
use twilight_gateway::{EventTypeFlags, Intents, Shard, ShardId, StreamExt as _};
use twilight_http::Client;
use twilight_model::gateway::event::Event;

use rustls::crypto::ring::default_provider;

use scriptos_commands::{
    forget_channel, handle_interaction, handle_message, register_commands, remember_channel,
};
use scriptos_core::{Config, Context};

mod liveness;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load the .env file before anything reads the environment
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt::init();

    default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("failed to install rustls ring provider"))?;

    let config = Config::from_env()?;
    info!(?config, "configuration loaded");

    // Create a single shared HTTP Client
    let http = Arc::new(Client::new(config.discord_token.clone()));
    let ctx = Context::from_config(Arc::clone(&http), &config);

    // Keeps answering even while the gateway is reconnecting
    let liveness_addr = config.liveness_addr;
    tokio::spawn(async move {
        if let Err(source) = liveness::serve(liveness_addr).await {
            error!(?source, "liveness endpoint stopped");
        }
    });

    // Declare which intents the bot has
    let intents = Intents::GUILDS | Intents::GUILD_MESSAGES | Intents::MESSAGE_CONTENT;

    // A shard is one Gateway WebSocket connection to Discord
    let mut shard = Shard::new(ShardId::new(0, 1), config.discord_token.clone(), intents);

    info!(channel = %config.channel_name, "Scriptos is connecting...");

    // Our ears, listens for stuff to do
    while let Some(item) = shard.next_event(EventTypeFlags::all()).await {
        let event = match item {
            Ok(event) => event,
            Err(source) => {
                error!(?source, "gateway event stream error");
                continue;
            }
        };

        match event {
            Event::Ready(ready) => {
                info!(user = %ready.user.name, "Scriptos has successfully awoken!");

                let ctx = ctx.clone();
                let application_id = ready.application.id;
                tokio::spawn(async move {
                    match register_commands(&ctx, application_id).await {
                        Ok(count) => info!(count, "synced slash commands"),
                        Err(source) => {
                            warn!(?source, "failed to sync slash commands, continuing without them");
                        }
                    }
                });
            }
            Event::MessageCreate(msg) => {
                spawn_handler("message", handle_message(ctx.clone(), msg));
            }
            Event::InteractionCreate(interaction) => {
                spawn_handler("interaction", handle_interaction(ctx.clone(), interaction));
            }
            Event::ChannelUpdate(update) => remember_channel(&ctx, &update.0).await,
            Event::ChannelDelete(delete) => forget_channel(&ctx, &delete.0).await,
            _ => {} // Ignore unused events
        }
    }
    Ok(()) // Return Success, shutdown cleanly
}

/// Run an event handler on its own task so slow uploads never stall the gateway loop.
fn spawn_handler<F>(kind: &'static str, handler: F)
where
    F: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    tokio::spawn(async move {
        if let Err(source) = handler.await {
            error!(?source, kind, "event handler failed");
        }
    });
}
