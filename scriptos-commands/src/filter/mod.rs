//! Keeps the script channel free of anything but commands.

pub mod discord;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, error, warn};

use scriptos_core::ChannelGate;
use scriptos_utils::{COMMAND_PREFIX, SLASH_PREFIX};

/// How long the removal notice stays visible.
pub const NOTICE_LIFETIME: Duration = Duration::from_secs(5);

/// A plain message as seen by the filter.
#[derive(Clone, Debug)]
pub struct IncomingMessage {
    pub author_id: u64,
    pub author_is_bot: bool,
    pub channel_id: u64,
    pub message_id: u64,
    pub content: String,
}

/// What the filter did with a message.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FilterVerdict {
    /// Authored by a bot, never inspected.
    IgnoredBot,
    /// Starts with a command prefix.
    Allowed,
    /// Posted in some other channel.
    OutsideScope,
    /// Deleted and the author was notified.
    Removed,
    /// Deletion was refused for lack of permission.
    DeletionDenied,
    /// Deletion failed for another reason.
    DeletionFailed,
}

impl FilterVerdict {
    /// Whether the message is still around for normal command processing.
    pub fn passes_through(self) -> bool {
        matches!(self, Self::Allowed | Self::OutsideScope)
    }
}

#[derive(Debug, Error)]
pub enum DeleteError {
    #[error("missing permission to delete messages")]
    Forbidden,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Channel operations the filter needs from the platform.
#[async_trait]
pub trait ChannelModerator: Send + Sync {
    /// Resolve a channel's name, `None` if it has none (DMs).
    async fn channel_name(&self, channel_id: u64) -> anyhow::Result<Option<String>>;

    async fn delete_message(&self, channel_id: u64, message_id: u64) -> Result<(), DeleteError>;

    /// Post a message that removes itself after `lifetime`.
    async fn post_notice(
        &self,
        channel_id: u64,
        content: &str,
        lifetime: Duration,
    ) -> anyhow::Result<()>;
}

/// True when the content starts with `/` or `!`.
pub fn is_command_like(content: &str) -> bool {
    content.starts_with(SLASH_PREFIX) || content.starts_with(COMMAND_PREFIX)
}

pub fn removal_notice(author_id: u64) -> String {
    format!("⚠️ <@{author_id}>, only `/script` commands are allowed here.")
}

/// Inspect one message, removing it if it is not a command in the scoped channel.
///
/// Deletion failures are logged and reported through the verdict, never returned.
pub async fn filter_message<M>(
    gate: &ChannelGate,
    message: &IncomingMessage,
    moderator: &M,
) -> anyhow::Result<FilterVerdict>
where
    M: ChannelModerator,
{
    if message.author_is_bot {
        return Ok(FilterVerdict::IgnoredBot);
    }

    if is_command_like(&message.content) {
        return Ok(FilterVerdict::Allowed);
    }

    let channel_name = moderator.channel_name(message.channel_id).await?;
    if !gate.is_authorized_opt(channel_name.as_deref()) {
        return Ok(FilterVerdict::OutsideScope);
    }

    match moderator
        .delete_message(message.channel_id, message.message_id)
        .await
    {
        Ok(()) => {}
        Err(DeleteError::Forbidden) => {
            warn!(
                channel_id = message.channel_id,
                message_id = message.message_id,
                "missing permission to delete messages"
            );
            return Ok(FilterVerdict::DeletionDenied);
        }
        Err(DeleteError::Other(source)) => {
            error!(
                ?source,
                channel_id = message.channel_id,
                message_id = message.message_id,
                "error deleting message"
            );
            return Ok(FilterVerdict::DeletionFailed);
        }
    }

    debug!(
        author_id = message.author_id,
        message_id = message.message_id,
        "removed non-command message"
    );

    if let Err(source) = moderator
        .post_notice(
            message.channel_id,
            &removal_notice(message.author_id),
            NOTICE_LIFETIME,
        )
        .await
    {
        warn!(?source, channel_id = message.channel_id, "failed to post removal notice");
    }

    Ok(FilterVerdict::Removed)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    const SCRIPT_CHANNEL: u64 = 100;
    const OTHER_CHANNEL: u64 = 200;
    const AUTHOR: u64 = 42;

    #[derive(Clone, Copy)]
    enum DeleteBehavior {
        Succeed,
        Forbid,
        Fail,
    }

    struct FakeModerator {
        delete: DeleteBehavior,
        deleted: Mutex<Vec<u64>>,
        notices: Mutex<Vec<(String, Duration)>>,
    }

    impl FakeModerator {
        fn new(delete: DeleteBehavior) -> Self {
            Self {
                delete,
                deleted: Mutex::new(Vec::new()),
                notices: Mutex::new(Vec::new()),
            }
        }

        fn deleted(&self) -> Vec<u64> {
            self.deleted.lock().unwrap().clone()
        }

        fn notices(&self) -> Vec<(String, Duration)> {
            self.notices.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChannelModerator for FakeModerator {
        async fn channel_name(&self, channel_id: u64) -> anyhow::Result<Option<String>> {
            Ok(match channel_id {
                SCRIPT_CHANNEL => Some("scriptos".to_owned()),
                OTHER_CHANNEL => Some("general".to_owned()),
                _ => None,
            })
        }

        async fn delete_message(
            &self,
            _channel_id: u64,
            message_id: u64,
        ) -> Result<(), DeleteError> {
            match self.delete {
                DeleteBehavior::Succeed => {
                    self.deleted.lock().unwrap().push(message_id);
                    Ok(())
                }
                DeleteBehavior::Forbid => Err(DeleteError::Forbidden),
                DeleteBehavior::Fail => Err(DeleteError::Other(anyhow::anyhow!("unknown message"))),
            }
        }

        async fn post_notice(
            &self,
            _channel_id: u64,
            content: &str,
            lifetime: Duration,
        ) -> anyhow::Result<()> {
            self.notices
                .lock()
                .unwrap()
                .push((content.to_owned(), lifetime));
            Ok(())
        }
    }

    fn message(channel_id: u64, content: &str) -> IncomingMessage {
        IncomingMessage {
            author_id: AUTHOR,
            author_is_bot: false,
            channel_id,
            message_id: 7,
            content: content.to_owned(),
        }
    }

    #[tokio::test]
    async fn plain_text_in_scope_is_removed_with_one_notice() {
        let gate = ChannelGate::new("scriptos");
        let moderator = FakeModerator::new(DeleteBehavior::Succeed);

        let verdict = filter_message(&gate, &message(SCRIPT_CHANNEL, "hello"), &moderator)
            .await
            .unwrap();

        assert_eq!(verdict, FilterVerdict::Removed);
        assert_eq!(moderator.deleted(), vec![7]);
        assert_eq!(
            moderator.notices(),
            vec![(removal_notice(AUTHOR), NOTICE_LIFETIME)]
        );
        assert!(moderator.notices()[0].0.contains("<@42>"));
    }

    #[tokio::test]
    async fn command_prefixes_are_left_alone() {
        let gate = ChannelGate::new("scriptos");
        let moderator = FakeModerator::new(DeleteBehavior::Succeed);

        for content in ["/script", "!help"] {
            let verdict = filter_message(&gate, &message(SCRIPT_CHANNEL, content), &moderator)
                .await
                .unwrap();
            assert_eq!(verdict, FilterVerdict::Allowed);
        }

        assert!(moderator.deleted().is_empty());
        assert!(moderator.notices().is_empty());
    }

    #[tokio::test]
    async fn other_channels_are_untouched() {
        let gate = ChannelGate::new("scriptos");
        let moderator = FakeModerator::new(DeleteBehavior::Succeed);

        let verdict = filter_message(&gate, &message(OTHER_CHANNEL, "hello"), &moderator)
            .await
            .unwrap();
        assert_eq!(verdict, FilterVerdict::OutsideScope);

        let verdict = filter_message(&gate, &message(999, "hello"), &moderator)
            .await
            .unwrap();
        assert_eq!(verdict, FilterVerdict::OutsideScope);

        assert!(moderator.deleted().is_empty());
    }

    #[tokio::test]
    async fn bot_messages_are_ignored() {
        let gate = ChannelGate::new("scriptos");
        let moderator = FakeModerator::new(DeleteBehavior::Succeed);

        // Neither removed nor handed on to prefix commands
        for content in ["hello", "!help"] {
            let mut bot_message = message(SCRIPT_CHANNEL, content);
            bot_message.author_is_bot = true;

            let verdict = filter_message(&gate, &bot_message, &moderator).await.unwrap();

            assert_eq!(verdict, FilterVerdict::IgnoredBot);
            assert!(!verdict.passes_through());
        }
        assert!(moderator.deleted().is_empty());
        assert!(moderator.notices().is_empty());
    }

    #[tokio::test]
    async fn permission_denial_is_reported_not_raised() {
        let gate = ChannelGate::new("scriptos");
        let moderator = FakeModerator::new(DeleteBehavior::Forbid);

        let verdict = filter_message(&gate, &message(SCRIPT_CHANNEL, "hello"), &moderator)
            .await
            .unwrap();

        assert_eq!(verdict, FilterVerdict::DeletionDenied);
        assert!(moderator.notices().is_empty());
    }

    #[tokio::test]
    async fn other_delete_errors_are_reported_not_raised() {
        let gate = ChannelGate::new("scriptos");
        let moderator = FakeModerator::new(DeleteBehavior::Fail);

        let verdict = filter_message(&gate, &message(SCRIPT_CHANNEL, "hello"), &moderator)
            .await
            .unwrap();

        assert_eq!(verdict, FilterVerdict::DeletionFailed);
        assert!(!verdict.passes_through());
    }

    #[test]
    fn prefix_check_is_exact() {
        assert!(is_command_like("/script"));
        assert!(is_command_like("!ping"));
        assert!(!is_command_like(" /script"));
        assert!(!is_command_like(""));
        assert!(!is_command_like("hello /script"));
    }
}
