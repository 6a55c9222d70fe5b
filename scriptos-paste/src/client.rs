use std::{fmt, str::FromStr};

use async_trait::async_trait;
use reqwest::{Client, Url, header::CONTENT_TYPE};
use serde::Deserialize;
use tracing::{debug, error};

use crate::{ScriptRelay, Submission, UploadError};

const PASTEBIN_DEFAULT_BASE_URL: &str = "https://pastebin.com";
const HASTE_DEFAULT_BASE_URL: &str = "https://hastebin.com";

/// Supported paste-hosting backends.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PasteService {
    /// Form POST to `api_post.php`, the body of the reply is the paste URL.
    Pastebin,
    /// Raw POST to `/documents`, the reply is `{"key": "..."}`.
    Haste,
}

impl PasteService {
    pub fn default_base_url(self) -> &'static str {
        match self {
            Self::Pastebin => PASTEBIN_DEFAULT_BASE_URL,
            Self::Haste => HASTE_DEFAULT_BASE_URL,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Pastebin => "Pastebin",
            Self::Haste => "Hastebin",
        }
    }
}

impl FromStr for PasteService {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pastebin" => Ok(Self::Pastebin),
            "haste" | "hastebin" => Ok(Self::Haste),
            other => Err(format!("unknown paste service `{other}`")),
        }
    }
}

impl fmt::Display for PasteService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Deserialize)]
struct HasteDocument {
    key: Option<String>,
}

/// HTTP client for the configured paste service.
#[derive(Clone, Debug)]
pub struct PasteClient {
    http: Client,
    service: PasteService,
    base_url: String,
    api_key: Option<String>,
}

impl PasteClient {
    /// Build a client.
    ///
    /// `api_key` is the developer key for Pastebin and an optional bearer token
    /// for haste servers. A missing Pastebin key is reported on upload, not here.
    pub fn new(service: PasteService, base_url: Option<String>, api_key: Option<String>) -> Self {
        let base_url = base_url
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| service.default_base_url().to_owned());

        Self {
            http: Client::new(),
            service,
            base_url: base_url.trim_end_matches('/').to_owned(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn upload_pastebin(&self, submission: &Submission) -> Result<String, UploadError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(UploadError::ConfigMissing("PASTEBIN_API_KEY"));
        };

        let document = submission.document();
        let form = [
            ("api_dev_key", api_key),
            ("api_option", "paste"),
            ("api_paste_code", document.as_str()),
            ("api_paste_name", submission.name.as_str()),
            ("api_paste_private", "1"),
            ("api_paste_expire_date", "N"),
            ("api_paste_format", "text"),
        ];

        let response = self
            .http
            .post(format!("{}/api/api_post.php", self.base_url))
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UploadError::HttpError {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        parse_paste_url(body.trim())
    }

    async fn upload_haste(&self, submission: &Submission) -> Result<String, UploadError> {
        let mut request = self
            .http
            .post(format!("{}/documents", self.base_url))
            .header(CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(submission.document());

        if let Some(token) = self.api_key.as_deref() {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UploadError::HttpError {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let document: HasteDocument = serde_json::from_str(&body)
            .map_err(|_| UploadError::MalformedResponse(truncate_for_log(&body)))?;

        match document.key.map(|key| key.trim().to_owned()) {
            Some(key) if !key.is_empty() => Ok(format!("{}/{}", self.base_url, key)),
            _ => Err(UploadError::MalformedResponse(truncate_for_log(&body))),
        }
    }
}

#[async_trait]
impl ScriptRelay for PasteClient {
    fn service_name(&self) -> &str {
        self.service.display_name()
    }

    async fn upload(&self, submission: &Submission) -> Result<String, UploadError> {
        debug!(service = %self.service, name = %submission.name, "uploading script");

        let result = match self.service {
            PasteService::Pastebin => self.upload_pastebin(submission).await,
            PasteService::Haste => self.upload_haste(submission).await,
        };

        if let Err(source) = &result {
            error!(%source, service = %self.service, "paste upload failed");
        }

        result
    }
}

/// Accept a literal URL reply only if it parses and uses an HTTP scheme.
///
/// Pastebin reports errors as plain text with a 200 status (`Bad API request, ...`).
fn parse_paste_url(raw: &str) -> Result<String, UploadError> {
    match Url::parse(raw) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.host_str().is_some() => {
            Ok(raw.to_owned())
        }
        _ => Err(UploadError::MalformedResponse(truncate_for_log(raw))),
    }
}

fn truncate_for_log(raw: &str) -> String {
    const MAX_CHARS: usize = 200;
    raw.chars().take(MAX_CHARS).collect()
}
