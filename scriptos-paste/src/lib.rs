//! Relay of `/script` submissions to a paste-hosting service.

mod client;
mod error;
mod submission;

pub use client::{PasteClient, PasteService};
pub use error::UploadError;
pub use submission::Submission;

use async_trait::async_trait;

/// Upload sink for script submissions.
///
/// One call is one upload attempt. Implementations never retry.
#[async_trait]
pub trait ScriptRelay: Send + Sync {
    /// Short human name of the service, used in user-facing text.
    fn service_name(&self) -> &str;

    /// Upload a submission and return the shareable URL.
    async fn upload(&self, submission: &Submission) -> Result<String, UploadError>;
}
