pub mod filter;
pub mod script;
pub mod utility;

use tracing::debug;
use twilight_model::{
    application::interaction::InteractionData,
    channel::Channel,
    gateway::payload::incoming::{InteractionCreate, MessageCreate},
    id::{Id, marker::ApplicationMarker},
};

use filter::{IncomingMessage, discord::HttpModerator, filter_message};
use scriptos_core::Context;
use scriptos_utils::COMMAND_PREFIX;

// Global command meta data
pub struct CommandMeta {
    pub name: &'static str,
    pub desc: &'static str,
    pub category: &'static str,
    pub usage: &'static str,
}

pub const COMMANDS: &[CommandMeta] = &[
    script::META,
    utility::help::META,
    utility::ping::META,
    // Add new commands here
];

/// Run the channel filter on a message, then dispatch prefix commands.
pub async fn handle_message(ctx: Context, msg: Box<MessageCreate>) -> anyhow::Result<()> {
    let incoming = IncomingMessage {
        author_id: msg.author.id.get(),
        author_is_bot: msg.author.bot,
        channel_id: msg.channel_id.get(),
        message_id: msg.id.get(),
        content: msg.content.clone(),
    };

    let moderator = HttpModerator::new(&ctx.http, &ctx.channels);
    let verdict = filter_message(&ctx.gate, &incoming, &moderator).await?;
    if !verdict.passes_through() {
        debug!(?verdict, message_id = incoming.message_id, "message filtered");
        return Ok(());
    }

    let content = msg.content.trim();
    let Some(content) = content.strip_prefix(COMMAND_PREFIX) else {
        return Ok(());
    };

    let cmd = content
        .split_whitespace()
        .next()
        .unwrap_or("")
        .to_ascii_lowercase();

    match cmd.as_str() {
        "ping" => utility::ping::run(ctx.clone(), &msg).await?,
        "help" => utility::help::run(ctx.clone(), &msg).await?,
        // Add new commands here
        _ => {}
    }

    Ok(())
}

/// Dispatch slash-command interactions.
pub async fn handle_interaction(
    ctx: Context,
    interaction: Box<InteractionCreate>,
) -> anyhow::Result<()> {
    let Some(InteractionData::ApplicationCommand(data)) = interaction.data.as_ref() else {
        return Ok(());
    };

    match data.name.as_str() {
        name if name == script::META.name => script::run(ctx.clone(), &interaction, data).await?,
        other => debug!(command = other, "ignoring unknown slash command"),
    }

    Ok(())
}

/// Register every slash command globally, returning how many Discord accepted.
pub async fn register_commands(
    ctx: &Context,
    application_id: Id<ApplicationMarker>,
) -> anyhow::Result<usize> {
    let commands = [script::definition()?];

    let registered = ctx
        .http
        .interaction(application_id)
        .set_global_commands(&commands)
        .await?
        .model()
        .await?;

    Ok(registered.len())
}

/// Keep the channel-name cache in step with a created or renamed channel.
pub async fn remember_channel(ctx: &Context, channel: &Channel) {
    match channel.name.as_deref() {
        Some(name) => ctx.channels.remember(channel.id.get(), name).await,
        None => ctx.channels.forget(channel.id.get()).await,
    }
}

/// Drop a deleted channel from the channel-name cache.
pub async fn forget_channel(ctx: &Context, channel: &Channel) {
    ctx.channels.forget(channel.id.get()).await;
}
