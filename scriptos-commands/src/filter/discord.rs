use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use twilight_http::{Client, error::ErrorType};
use twilight_model::id::{
    Id,
    marker::{ChannelMarker, MessageMarker},
};

use scriptos_store::ChannelDirectory;
use scriptos_utils::cleanup::schedule_message_deletion;

use super::{ChannelModerator, DeleteError};

const FORBIDDEN: u16 = 403;

/// [`ChannelModerator`] backed by the Discord HTTP API and the channel-name cache.
pub struct HttpModerator<'a> {
    http: &'a Arc<Client>,
    channels: &'a ChannelDirectory,
}

impl<'a> HttpModerator<'a> {
    pub fn new(http: &'a Arc<Client>, channels: &'a ChannelDirectory) -> Self {
        Self { http, channels }
    }
}

fn channel_id(raw: u64) -> anyhow::Result<Id<ChannelMarker>> {
    Id::new_checked(raw).ok_or_else(|| anyhow::anyhow!("invalid channel id {raw}"))
}

fn message_id(raw: u64) -> anyhow::Result<Id<MessageMarker>> {
    Id::new_checked(raw).ok_or_else(|| anyhow::anyhow!("invalid message id {raw}"))
}

#[async_trait]
impl ChannelModerator for HttpModerator<'_> {
    async fn channel_name(&self, raw_channel_id: u64) -> anyhow::Result<Option<String>> {
        if let Some(name) = self.channels.name(raw_channel_id).await {
            return Ok(Some(name));
        }

        let channel = self
            .http
            .channel(channel_id(raw_channel_id)?)
            .await?
            .model()
            .await?;

        if let Some(name) = channel.name.as_deref() {
            self.channels.remember(raw_channel_id, name).await;
        }

        Ok(channel.name)
    }

    async fn delete_message(
        &self,
        raw_channel_id: u64,
        raw_message_id: u64,
    ) -> Result<(), DeleteError> {
        let result = self
            .http
            .delete_message(channel_id(raw_channel_id)?, message_id(raw_message_id)?)
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(source) => match source.kind() {
                ErrorType::Response { status, .. } if status.get() == FORBIDDEN => {
                    Err(DeleteError::Forbidden)
                }
                _ => Err(DeleteError::Other(source.into())),
            },
        }
    }

    async fn post_notice(
        &self,
        raw_channel_id: u64,
        content: &str,
        lifetime: Duration,
    ) -> anyhow::Result<()> {
        let notice = self
            .http
            .create_message(channel_id(raw_channel_id)?)
            .content(content)
            .await?
            .model()
            .await?;

        schedule_message_deletion(Arc::clone(self.http), notice.channel_id, notice.id, lifetime);

        Ok(())
    }
}
