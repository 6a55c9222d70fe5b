use async_trait::async_trait;
use twilight_http::Client;
use twilight_model::{
    channel::message::{component::Component, embed::Embed},
    gateway::payload::incoming::InteractionCreate,
};

use scriptos_utils::{
    components::link_button_row,
    embed::{EMBED_FIELD_VALUE_MAX_CHARS, EmbedField, build_titled_embed},
    interaction::{
        DeferredResponse, defer_channel_message, edit_deferred_content, edit_deferred_embed,
        respond_ephemeral_message,
    },
    text::code_block,
};

use super::flow::{ScriptCard, ScriptReply, ScriptResponder};

const CARD_FOOTER: &str = "Click below to view or copy the full script.";

/// Responds to a `/script` interaction through the Discord interaction API.
pub struct InteractionResponder<'a> {
    http: &'a Client,
    interaction: &'a InteractionCreate,
}

impl<'a> InteractionResponder<'a> {
    pub fn new(http: &'a Client, interaction: &'a InteractionCreate) -> Self {
        Self { http, interaction }
    }
}

#[async_trait]
impl ScriptResponder for InteractionResponder<'_> {
    type Handle = DeferredResponse;

    async fn reply_private(&self, content: &str) -> anyhow::Result<()> {
        respond_ephemeral_message(self.http, self.interaction, content).await
    }

    async fn acknowledge(&self) -> anyhow::Result<DeferredResponse> {
        defer_channel_message(self.http, self.interaction).await
    }

    async fn finalize(&self, handle: DeferredResponse, reply: ScriptReply) -> anyhow::Result<()> {
        match reply {
            ScriptReply::Failed(content) => edit_deferred_content(self.http, &handle, &content).await,
            ScriptReply::Posted(card) => {
                let (embed, components) = render_card(&card)?;
                edit_deferred_embed(self.http, &handle, &embed, &components).await
            }
        }
    }
}

/// Turn a success card into its embed and link button.
pub fn render_card(card: &ScriptCard) -> anyhow::Result<(Embed, Vec<Component>)> {
    let fields = [
        EmbedField::new(
            "Script Preview",
            code_block(&card.preview, EMBED_FIELD_VALUE_MAX_CHARS),
        ),
        EmbedField::new("Key", code_block(&card.key, EMBED_FIELD_VALUE_MAX_CHARS)),
    ];

    let embed = build_titled_embed(&card.title, &card.description, &fields, Some(CARD_FOOTER))?;
    let components = link_button_row(&card.link_label, &card.url);

    Ok((embed, components))
}
