use twilight_http::Client;
use twilight_model::{
    channel::message::{MessageFlags, component::Component, embed::Embed},
    gateway::payload::incoming::InteractionCreate,
    http::interaction::{InteractionResponse, InteractionResponseType},
    id::{Id, marker::ApplicationMarker},
};
use twilight_util::builder::InteractionResponseDataBuilder;

/// Handle to an acknowledged interaction whose original response can still be edited.
///
/// Interaction tokens stay valid for 15 minutes after the acknowledgement.
#[derive(Clone, Debug)]
pub struct DeferredResponse {
    pub application_id: Id<ApplicationMarker>,
    pub token: String,
}

/// Respond to an interaction with a message only the caller can see.
pub async fn respond_ephemeral_message(
    http: &Client,
    interaction: &InteractionCreate,
    content: &str,
) -> anyhow::Result<()> {
    let response = InteractionResponse {
        kind: InteractionResponseType::ChannelMessageWithSource,
        data: Some(
            InteractionResponseDataBuilder::new()
                .content(content)
                .flags(MessageFlags::EPHEMERAL)
                .build(),
        ),
    };

    http.interaction(interaction.application_id)
        .create_response(interaction.id, &interaction.token, &response)
        .await?;

    Ok(())
}

/// Acknowledge an interaction with a public "thinking" placeholder.
///
/// The returned handle is used to replace the placeholder with the final content.
pub async fn defer_channel_message(
    http: &Client,
    interaction: &InteractionCreate,
) -> anyhow::Result<DeferredResponse> {
    let response = InteractionResponse {
        kind: InteractionResponseType::DeferredChannelMessageWithSource,
        data: None,
    };

    http.interaction(interaction.application_id)
        .create_response(interaction.id, &interaction.token, &response)
        .await?;

    Ok(DeferredResponse {
        application_id: interaction.application_id,
        token: interaction.token.clone(),
    })
}

/// Replace a deferred placeholder with plain text.
pub async fn edit_deferred_content(
    http: &Client,
    deferred: &DeferredResponse,
    content: &str,
) -> anyhow::Result<()> {
    http.interaction(deferred.application_id)
        .update_response(&deferred.token)
        .content(Some(content))
        .await?;

    Ok(())
}

/// Replace a deferred placeholder with an embed and its components.
pub async fn edit_deferred_embed(
    http: &Client,
    deferred: &DeferredResponse,
    embed: &Embed,
    components: &[Component],
) -> anyhow::Result<()> {
    http.interaction(deferred.application_id)
        .update_response(&deferred.token)
        .content(None)
        .embeds(Some(std::slice::from_ref(embed)))
        .components(Some(components))
        .await?;

    Ok(())
}
