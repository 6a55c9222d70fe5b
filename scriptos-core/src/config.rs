use std::{env, fmt, net::SocketAddr};

use scriptos_paste::PasteService;
use scriptos_store::cooldowns::DEFAULT_COOLDOWN_SECS;
use thiserror::Error;

/// Channel the bot is locked to when `SCRIPT_CHANNEL` is unset.
pub const DEFAULT_CHANNEL_NAME: &str = "scriptos";
/// Liveness endpoint bind address when `LIVENESS_ADDR` is unset.
pub const DEFAULT_LIVENESS_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value `{value}` for {var}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Startup configuration, read once from the process environment.
#[derive(Clone)]
pub struct Config {
    pub discord_token: String,
    pub channel_name: String,
    pub cooldown_secs: u64,
    pub paste_service: PasteService,
    pub paste_base_url: Option<String>,
    /// Pastebin developer key, or bearer token for haste servers.
    pub paste_api_key: Option<String>,
    pub liveness_addr: SocketAddr,
}

impl Config {
    /// Load from the process environment.
    ///
    /// Call `dotenvy::dotenv()` first if a `.env` file should be honored.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Load from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |var: &str| {
            lookup(var)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let discord_token = read("DISCORD_TOKEN").ok_or(ConfigError::Missing("DISCORD_TOKEN"))?;

        let channel_name = read("SCRIPT_CHANNEL")
            .map(|name| name.trim_start_matches('#').to_owned())
            .unwrap_or_else(|| DEFAULT_CHANNEL_NAME.to_owned());

        let cooldown_secs = match read("SCRIPT_COOLDOWN_SECS") {
            Some(raw) => raw.parse::<u64>().map_err(|source| ConfigError::Invalid {
                var: "SCRIPT_COOLDOWN_SECS",
                value: raw.clone(),
                reason: source.to_string(),
            })?,
            None => DEFAULT_COOLDOWN_SECS,
        };

        let paste_service = match read("PASTE_SERVICE") {
            Some(raw) => raw
                .parse::<PasteService>()
                .map_err(|reason| ConfigError::Invalid {
                    var: "PASTE_SERVICE",
                    value: raw.clone(),
                    reason,
                })?,
            None => PasteService::Pastebin,
        };

        let paste_api_key = match paste_service {
            PasteService::Pastebin => read("PASTEBIN_API_KEY"),
            PasteService::Haste => read("HASTE_TOKEN"),
        };

        let liveness_raw =
            read("LIVENESS_ADDR").unwrap_or_else(|| DEFAULT_LIVENESS_ADDR.to_owned());
        let liveness_addr =
            liveness_raw
                .parse::<SocketAddr>()
                .map_err(|source| ConfigError::Invalid {
                    var: "LIVENESS_ADDR",
                    value: liveness_raw.clone(),
                    reason: source.to_string(),
                })?;

        Ok(Self {
            discord_token,
            channel_name,
            cooldown_secs,
            paste_service,
            paste_base_url: read("PASTE_BASE_URL"),
            paste_api_key,
            liveness_addr,
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("discord_token", &"<redacted>")
            .field("channel_name", &self.channel_name)
            .field("cooldown_secs", &self.cooldown_secs)
            .field("paste_service", &self.paste_service)
            .field("paste_base_url", &self.paste_base_url)
            .field("paste_api_key", &self.paste_api_key.as_ref().map(|_| "<redacted>"))
            .field("liveness_addr", &self.liveness_addr)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect();
        Config::from_lookup(|var| vars.get(var).cloned())
    }

    #[test]
    fn defaults_apply() {
        let config = load(&[("DISCORD_TOKEN", "token")]).unwrap();

        assert_eq!(config.channel_name, "scriptos");
        assert_eq!(config.cooldown_secs, 60);
        assert_eq!(config.paste_service, PasteService::Pastebin);
        assert_eq!(config.paste_api_key, None);
        assert_eq!(config.liveness_addr.port(), 8080);
    }

    #[test]
    fn token_is_required() {
        assert!(matches!(
            load(&[("DISCORD_TOKEN", "  ")]),
            Err(ConfigError::Missing("DISCORD_TOKEN"))
        ));
    }

    #[test]
    fn overrides_are_read() {
        let config = load(&[
            ("DISCORD_TOKEN", "token"),
            ("SCRIPT_CHANNEL", "#scripts"),
            ("SCRIPT_COOLDOWN_SECS", "15"),
            ("PASTE_SERVICE", "haste"),
            ("PASTE_BASE_URL", "https://paste.example.org"),
            ("PASTEBIN_API_KEY", "ignored"),
            ("HASTE_TOKEN", "bearer"),
            ("LIVENESS_ADDR", "127.0.0.1:9000"),
        ])
        .unwrap();

        assert_eq!(config.channel_name, "scripts");
        assert_eq!(config.cooldown_secs, 15);
        assert_eq!(config.paste_service, PasteService::Haste);
        assert_eq!(
            config.paste_base_url.as_deref(),
            Some("https://paste.example.org")
        );
        assert_eq!(config.paste_api_key.as_deref(), Some("bearer"));
        assert_eq!(config.liveness_addr.port(), 9000);
    }

    #[test]
    fn malformed_numbers_are_rejected() {
        assert!(matches!(
            load(&[("DISCORD_TOKEN", "token"), ("SCRIPT_COOLDOWN_SECS", "1m")]),
            Err(ConfigError::Invalid {
                var: "SCRIPT_COOLDOWN_SECS",
                ..
            })
        ));
        assert!(matches!(
            load(&[("DISCORD_TOKEN", "token"), ("PASTE_SERVICE", "gist")]),
            Err(ConfigError::Invalid {
                var: "PASTE_SERVICE",
                ..
            })
        ));
    }

    #[test]
    fn debug_output_hides_secrets() {
        let config = load(&[("DISCORD_TOKEN", "super-secret"), ("PASTEBIN_API_KEY", "dev-key")])
            .unwrap();

        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(!rendered.contains("dev-key"));
    }
}
