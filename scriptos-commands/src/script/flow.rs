//! Transport-independent `/script` pipeline: gate, cooldown, relay, reply.

use async_trait::async_trait;
use tracing::{debug, info, warn};

use scriptos_core::ChannelGate;
use scriptos_paste::{ScriptRelay, Submission, UploadError};
use scriptos_store::{CooldownTracker, Reservation};
use scriptos_utils::text::preview;

/// Number of script characters shown in the success preview.
pub const PREVIEW_MAX_CHARS: usize = 100;

/// Message shown for every relay failure, whatever the cause.
pub const UPLOAD_FAILED_MESSAGE: &str = "❌ Failed to upload script. Try again later.";

/// A `/script` invocation reduced to what the pipeline needs.
#[derive(Clone, Debug)]
pub struct ScriptRequest {
    pub user_id: u64,
    /// Name of the channel the command was used in, when the platform supplied it.
    pub channel_name: Option<String>,
    pub name: String,
    pub script: String,
    pub key: String,
}

/// Content of the public success notification.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ScriptCard {
    pub title: String,
    pub description: String,
    /// Leading part of the script, already truncated.
    pub preview: String,
    pub key: String,
    pub url: String,
    pub link_label: String,
}

impl ScriptCard {
    pub fn new(submission: &Submission, url: String, service: &str) -> Self {
        Self {
            title: format!("📜 {}", submission.name),
            description: format!("Your script has been uploaded to {service}!"),
            preview: preview(&submission.body, PREVIEW_MAX_CHARS),
            key: submission.key.clone(),
            url,
            link_label: format!("🔗 View on {service}"),
        }
    }
}

/// Final content that replaces the acknowledgement placeholder.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ScriptReply {
    Failed(String),
    Posted(ScriptCard),
}

/// Which exit of the pipeline an invocation took.
#[derive(Debug)]
pub enum ScriptOutcome {
    WrongChannel,
    CoolingDown { remaining_secs: u64 },
    UploadFailed(UploadError),
    Posted { url: String },
}

/// Two-phase response channel for a command invocation.
///
/// Private replies are final on their own. For the upload path the caller is
/// first acknowledged, then the placeholder is replaced once through `finalize`.
#[async_trait]
pub trait ScriptResponder: Send + Sync {
    type Handle: Send;

    /// Reply with a message only the caller can see.
    async fn reply_private(&self, content: &str) -> anyhow::Result<()>;

    /// Send a provisional "working" acknowledgement.
    async fn acknowledge(&self) -> anyhow::Result<Self::Handle>;

    /// Replace the acknowledgement with the final reply.
    async fn finalize(&self, handle: Self::Handle, reply: ScriptReply) -> anyhow::Result<()>;
}

pub fn wrong_channel_message(channel_name: &str) -> String {
    format!("⚠️ Use this command only in **#{channel_name}**.")
}

pub fn cooldown_message(remaining_secs: u64) -> String {
    format!("⏳ Please wait **{remaining_secs}** seconds before using `/script` again.")
}

/// Run one `/script` invocation to completion.
///
/// The cooldown reservation is taken before the upload and released if the
/// upload (or the acknowledgement) fails. No lock is held while uploading.
pub async fn run_script<R>(
    gate: &ChannelGate,
    cooldowns: &CooldownTracker,
    relay: &dyn ScriptRelay,
    request: ScriptRequest,
    responder: &R,
) -> anyhow::Result<ScriptOutcome>
where
    R: ScriptResponder,
{
    let ScriptRequest {
        user_id,
        channel_name,
        name,
        script,
        key,
    } = request;

    if !gate.is_authorized_opt(channel_name.as_deref()) {
        debug!(user_id, channel = ?channel_name, "script used outside the allowed channel");
        responder
            .reply_private(&wrong_channel_message(gate.channel_name()))
            .await?;
        return Ok(ScriptOutcome::WrongChannel);
    }

    if let Reservation::Blocked { remaining_secs } = cooldowns.check_and_reserve(user_id).await {
        debug!(user_id, remaining_secs, "script on cooldown");
        responder
            .reply_private(&cooldown_message(remaining_secs))
            .await?;
        return Ok(ScriptOutcome::CoolingDown { remaining_secs });
    }

    let handle = match responder.acknowledge().await {
        Ok(handle) => handle,
        Err(source) => {
            cooldowns.release(user_id).await;
            return Err(source);
        }
    };

    let submission = Submission::new(name, script, key);

    match relay.upload(&submission).await {
        Ok(url) => {
            info!(user_id, name = %submission.name, %url, "script relayed");
            let card = ScriptCard::new(&submission, url.clone(), relay.service_name());
            responder.finalize(handle, ScriptReply::Posted(card)).await?;
            Ok(ScriptOutcome::Posted { url })
        }
        Err(source) => {
            warn!(user_id, %source, "script relay failed, releasing cooldown");
            cooldowns.release(user_id).await;
            responder
                .finalize(handle, ScriptReply::Failed(UPLOAD_FAILED_MESSAGE.to_owned()))
                .await?;
            Ok(ScriptOutcome::UploadFailed(source))
        }
    }
}
