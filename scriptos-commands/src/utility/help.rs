use twilight_model::{channel::message::embed::Embed, gateway::payload::incoming::MessageCreate};

use crate::{COMMANDS, CommandMeta};
use scriptos_core::Context;
use scriptos_utils::embed::{EmbedField, build_titled_embed};

pub const META: CommandMeta = CommandMeta {
    name: "help",
    desc: "List what the bot can do.",
    category: "utility",
    usage: "!help",
};

/// Render the command overview shown by `!help`, one field per category.
pub fn help_embed(channel_name: &str) -> anyhow::Result<Embed> {
    let description = format!("Only `/script` is allowed in **#{channel_name}**.");

    // Categories keep the order in which they first appear in `COMMANDS`
    let mut categories: Vec<&str> = Vec::new();
    for command in COMMANDS {
        if !categories.contains(&command.category) {
            categories.push(command.category);
        }
    }

    let fields: Vec<EmbedField> = categories
        .into_iter()
        .map(|category| {
            let value = COMMANDS
                .iter()
                .filter(|command| command.category == category)
                .map(|command| {
                    format!(
                        "**{}** - {}\nUsage: `{}`",
                        command.name, command.desc, command.usage
                    )
                })
                .collect::<Vec<_>>()
                .join("\n");

            EmbedField::new(category_title(category), value)
        })
        .collect();

    build_titled_embed("Commands", &description, &fields, None)
}

fn category_title(category: &str) -> String {
    let mut chars = category.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Post the command overview in the invoking channel.
pub async fn run(ctx: Context, msg: &MessageCreate) -> anyhow::Result<()> {
    let embed = help_embed(ctx.gate.channel_name())?;
    ctx.http
        .create_message(msg.channel_id)
        .embeds(&[embed])
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_every_command() {
        let embed = help_embed("scriptos").unwrap();
        let description = embed.description.unwrap_or_default();

        assert!(description.contains("**#scriptos**"));
        for command in COMMANDS {
            assert!(embed.fields.iter().any(|field| field.value.contains(command.usage)));
        }
    }

    #[test]
    fn commands_are_grouped_by_category() {
        let embed = help_embed("scriptos").unwrap();
        let names: Vec<&str> = embed.fields.iter().map(|field| field.name.as_str()).collect();

        assert_eq!(names, ["Scripts", "Utility"]);
        assert!(embed.fields[0].value.contains("/script <name> <script> <key>"));
        assert!(embed.fields[1].value.contains("!help"));
        assert!(embed.fields[1].value.contains("!ping"));
        assert!(!embed.fields[0].value.contains("!ping"));
    }
}
