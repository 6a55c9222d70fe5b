//! The `/script` slash command.

pub mod discord;
pub mod flow;

use tracing::debug;
use twilight_model::{
    application::{
        command::{Command, CommandType},
        interaction::application_command::{CommandData, CommandDataOption, CommandOptionValue},
    },
    gateway::payload::incoming::InteractionCreate,
};
use twilight_util::builder::command::{CommandBuilder, StringBuilder};

use crate::CommandMeta;
use discord::InteractionResponder;
use flow::{ScriptRequest, run_script};
use scriptos_core::Context;
use scriptos_utils::interaction::respond_ephemeral_message;

pub const META: CommandMeta = CommandMeta {
    name: "script",
    desc: "Upload a script with name and key.",
    category: "scripts",
    usage: "/script <name> <script> <key>",
};

const NAME_MAX_LENGTH: u16 = 100;
const KEY_MAX_LENGTH: u16 = 200;

/// Slash command definition registered with Discord.
pub fn definition() -> anyhow::Result<Command> {
    let command = CommandBuilder::new(META.name, META.desc, CommandType::ChatInput)
        .option(
            StringBuilder::new("name", "Name or title of the script.")
                .required(true)
                .max_length(NAME_MAX_LENGTH),
        )
        .option(StringBuilder::new("script", "The script text or code.").required(true))
        .option(
            StringBuilder::new("key", "The key associated with the script.")
                .required(true)
                .max_length(KEY_MAX_LENGTH),
        )
        .validate()?
        .build();

    Ok(command)
}

/// The three required `/script` arguments.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ScriptArgs {
    pub name: String,
    pub script: String,
    pub key: String,
}

impl ScriptArgs {
    /// Pull the string options out of the command data.
    ///
    /// Returns `None` if any of them is missing or not a string.
    pub fn from_options(options: &[CommandDataOption]) -> Option<Self> {
        let string_option = |wanted: &str| {
            options.iter().find_map(|option| match &option.value {
                CommandOptionValue::String(value) if option.name == wanted => Some(value.clone()),
                _ => None,
            })
        };

        Some(Self {
            name: string_option("name")?,
            script: string_option("script")?,
            key: string_option("key")?,
        })
    }
}

/// Handle one `/script` invocation end to end.
pub async fn run(
    ctx: Context,
    interaction: &InteractionCreate,
    data: &CommandData,
) -> anyhow::Result<()> {
    let http = &ctx.http;

    let Some(args) = ScriptArgs::from_options(&data.options) else {
        let usage = format!("Usage: `{}`", META.usage);
        respond_ephemeral_message(http, interaction, &usage).await?;
        return Ok(());
    };

    let Some(user_id) = interaction.author_id() else {
        debug!("script interaction without an author, ignoring");
        return Ok(());
    };

    let request = ScriptRequest {
        user_id: user_id.get(),
        channel_name: interaction
            .channel
            .as_ref()
            .and_then(|channel| channel.name.clone()),
        name: args.name,
        script: args.script,
        key: args.key,
    };

    let responder = InteractionResponder::new(http, interaction);
    let outcome = run_script(
        &ctx.gate,
        &ctx.cooldowns,
        ctx.relay.as_ref(),
        request,
        &responder,
    )
    .await?;

    debug!(user_id = user_id.get(), ?outcome, "script invocation handled");

    Ok(())
}
