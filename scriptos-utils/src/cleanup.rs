use std::{sync::Arc, time::Duration};

use tokio::time::sleep;
use tracing::warn;
use twilight_http::Client;
use twilight_model::id::{
    Id,
    marker::{ChannelMarker, MessageMarker},
};

/// Delete a bot message once `delay` has elapsed.
///
/// Runs detached; a failed deletion (message already gone, missing access) is only logged.
pub fn schedule_message_deletion(
    http: Arc<Client>,
    channel_id: Id<ChannelMarker>,
    message_id: Id<MessageMarker>,
    delay: Duration,
) {
    tokio::spawn(async move {
        sleep(delay).await;

        if let Err(source) = http.delete_message(channel_id, message_id).await {
            warn!(
                ?source,
                channel_id = channel_id.get(),
                message_id = message_id.get(),
                "failed to delete expired notice"
            );
        }
    });
}
