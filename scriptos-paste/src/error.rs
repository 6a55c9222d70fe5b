use thiserror::Error;

/// Reasons a relay upload can fail.
///
/// Users only ever see one generic failure message; the variants exist for logs.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("paste service is not configured: missing {0}")]
    ConfigMissing(&'static str),

    #[error("paste service answered with HTTP {status}")]
    HttpError { status: u16 },

    #[error("paste service returned no usable URL: {0}")]
    MalformedResponse(String),

    #[error("paste request failed")]
    Transport(#[from] reqwest::Error),
}
