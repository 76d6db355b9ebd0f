//! Provider configuration management.
//!
//! Supports reading secrets from `~/.config/scriba/secret.json`, with
//! environment variables as a fallback:
//!
//! 1. `~/.config/scriba/secret.json` (`chat.api_token`, `chat.model_name`,
//!    `chat.provider`)
//! 2. `SCRIBA_API_TOKEN`, `SCRIBA_MODEL_NAME`, `SCRIBA_PROVIDER`
//!
//! The access credential is required; model and provider fall back to
//! defaults. A missing credential is a `Configuration` error, fatal for
//! any gateway call, checked before the first network request.

use crate::error::{Result, ScribaError};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "deepseek-ai/DeepSeek-V3-0324";

/// Inference provider tag sent with each completion request.
pub const DEFAULT_PROVIDER: &str = "nebius";

/// Root configuration structure for secret.json
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecretConfig {
    #[serde(default)]
    pub chat: Option<ChatSecrets>,
}

/// Chat-completion credentials section of secret.json
#[derive(Debug, Clone, Deserialize)]
pub struct ChatSecrets {
    pub api_token: String,
    #[serde(default)]
    pub model_name: Option<String>,
    #[serde(default)]
    pub provider: Option<String>,
}

/// Fully resolved provider configuration for the completion client.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub api_token: String,
    pub model: String,
    pub provider: String,
}

impl ProviderConfig {
    /// Resolves configuration from secret.json and the environment.
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error when no access credential is found
    /// in either source. The message never contains secret values.
    pub fn resolve() -> Result<Self> {
        let secrets = load_secret_config().ok().and_then(|config| config.chat);
        Self::from_sources(
            secrets,
            std::env::var("SCRIBA_API_TOKEN").ok(),
            std::env::var("SCRIBA_MODEL_NAME").ok(),
            std::env::var("SCRIBA_PROVIDER").ok(),
        )
    }

    /// Combines the secret-file and environment sources, secret file first.
    pub fn from_sources(
        secrets: Option<ChatSecrets>,
        env_token: Option<String>,
        env_model: Option<String>,
        env_provider: Option<String>,
    ) -> Result<Self> {
        if let Some(chat) = secrets {
            return Ok(Self {
                api_token: chat.api_token,
                model: chat.model_name.unwrap_or_else(|| DEFAULT_MODEL.into()),
                provider: chat.provider.unwrap_or_else(|| DEFAULT_PROVIDER.into()),
            });
        }

        let Some(api_token) = env_token.filter(|token| !token.trim().is_empty()) else {
            return Err(ScribaError::configuration(
                "no API token found in ~/.config/scriba/secret.json or SCRIBA_API_TOKEN",
            ));
        };

        Ok(Self {
            api_token,
            model: env_model.unwrap_or_else(|| DEFAULT_MODEL.into()),
            provider: env_provider.unwrap_or_else(|| DEFAULT_PROVIDER.into()),
        })
    }
}

/// Loads the secret configuration file from ~/.config/scriba/secret.json
pub fn load_secret_config() -> Result<SecretConfig> {
    load_secret_config_from(&secret_file_path()?)
}

/// Loads a secret configuration file from an explicit path.
pub fn load_secret_config_from(path: &Path) -> Result<SecretConfig> {
    if !path.exists() {
        return Err(ScribaError::configuration(format!(
            "configuration file not found at: {}",
            path.display()
        )));
    }

    let content = fs::read_to_string(path).map_err(|e| {
        ScribaError::configuration(format!(
            "failed to read configuration file at {}: {e}",
            path.display()
        ))
    })?;

    serde_json::from_str(&content).map_err(|e| {
        ScribaError::configuration(format!(
            "failed to parse configuration file at {}: {e}",
            path.display()
        ))
    })
}

/// Returns the path to the configuration file: ~/.config/scriba/secret.json
fn secret_file_path() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| ScribaError::configuration("could not determine home directory"))?;
    Ok(home.join(".config").join("scriba").join("secret.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_file_takes_priority_over_env() {
        let config = ProviderConfig::from_sources(
            Some(ChatSecrets {
                api_token: "file-token".into(),
                model_name: Some("file-model".into()),
                provider: None,
            }),
            Some("env-token".into()),
            Some("env-model".into()),
            None,
        )
        .unwrap();

        assert_eq!(config.api_token, "file-token");
        assert_eq!(config.model, "file-model");
        assert_eq!(config.provider, DEFAULT_PROVIDER);
    }

    #[test]
    fn env_fallback_applies_defaults() {
        let config =
            ProviderConfig::from_sources(None, Some("env-token".into()), None, None).unwrap();
        assert_eq!(config.api_token, "env-token");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.provider, DEFAULT_PROVIDER);
    }

    #[test]
    fn missing_token_is_a_configuration_error() {
        let err = ProviderConfig::from_sources(None, None, None, None).unwrap_err();
        assert!(err.is_configuration());

        let err = ProviderConfig::from_sources(None, Some("   ".into()), None, None).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn parses_secret_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secret.json");
        fs::write(
            &path,
            r#"{ "chat": { "api_token": "tok", "model_name": "m" } }"#,
        )
        .unwrap();

        let config = load_secret_config_from(&path).unwrap();
        let chat = config.chat.unwrap();
        assert_eq!(chat.api_token, "tok");
        assert_eq!(chat.model_name.as_deref(), Some("m"));
    }

    #[test]
    fn malformed_secret_file_is_a_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secret.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(load_secret_config_from(&path).unwrap_err().is_configuration());
        assert!(
            load_secret_config_from(&dir.path().join("missing.json"))
                .unwrap_err()
                .is_configuration()
        );
    }
}
