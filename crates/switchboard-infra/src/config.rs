//! Configuration loader for Switchboard.
//!
//! Reads `config.toml` from the data directory (`~/.switchboard/` by default)
//! and deserializes it into [`AppConfig`]. Falls back to defaults when the
//! file is missing or malformed.

use std::path::{Path, PathBuf};

use switchboard_types::config::AppConfig;
use switchboard_types::error::ConfigError;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "SWITCHBOARD_DATA_DIR";

pub const CONFIG_FILE: &str = "config.toml";

/// Resolve the data directory: `SWITCHBOARD_DATA_DIR`, else `~/.switchboard`.
pub fn resolve_data_dir() -> PathBuf {
    match std::env::var(DATA_DIR_ENV) {
        Ok(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
        _ => dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".switchboard"),
    }
}

/// Load `{data_dir}/config.toml`, reporting read and parse failures.
///
/// A missing file is not an error; it yields [`AppConfig::default()`].
pub async fn try_load_config(data_dir: &Path) -> Result<AppConfig, ConfigError> {
    let config_path = data_dir.join(CONFIG_FILE);

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return Ok(AppConfig::default());
        }
        Err(err) => {
            return Err(ConfigError::Read {
                path: config_path.display().to_string(),
                reason: err.to_string(),
            });
        }
    };

    toml::from_str::<AppConfig>(&content).map_err(|err| ConfigError::Parse {
        path: config_path.display().to_string(),
        reason: err.to_string(),
    })
}

/// Load configuration, logging a warning and using defaults on any failure.
pub async fn load_config(data_dir: &Path) -> AppConfig {
    match try_load_config(data_dir).await {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("{err}, using defaults");
            AppConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use switchboard_types::intent::Intent;
    use switchboard_types::llm::ProviderType;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).await;
        assert_eq!(config.router.default_intent, Intent::Qa);
        assert_eq!(config.router.context_limit, 5);
        assert_eq!(config.llm.provider, ProviderType::Ollama);
    }

    #[tokio::test]
    async fn load_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join(CONFIG_FILE),
            r#"
http_timeout_secs = 20

[llm]
provider = "openai"
model = "gpt-4o-mini"
base_url = "https://api.openai.com/v1"

[router]
intents = ["news", "music"]
default_intent = "music"
use_context = true

[router.aliases]
song = "music"

[calendar]
time_zone = "Europe/Berlin"
"#,
        )
        .await
        .unwrap();

        let config = load_config(tmp.path()).await;
        assert_eq!(config.http_timeout_secs, 20);
        assert_eq!(config.llm.provider, ProviderType::OpenAiCompatible);
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.router.intents, vec![Intent::News, Intent::Music]);
        assert_eq!(config.router.default_intent, Intent::Music);
        assert!(config.router.use_context);
        assert_eq!(config.router.aliases.get("song"), Some(&Intent::Music));
        assert_eq!(config.calendar.time_zone, "Europe/Berlin");
        // Untouched sections keep their defaults.
        assert_eq!(config.news.page_size, 3);
        assert_eq!(config.calendar.calendar_id, "primary");
    }

    #[tokio::test]
    async fn load_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join(CONFIG_FILE), "this is not { valid toml !!!")
            .await
            .unwrap();

        assert!(matches!(
            try_load_config(tmp.path()).await,
            Err(ConfigError::Parse { .. })
        ));
        let config = load_config(tmp.path()).await;
        assert_eq!(config.router.command_prefix, "!");
    }

    #[tokio::test]
    async fn load_config_unknown_intent_is_a_parse_error() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join(CONFIG_FILE),
            "[router]\ndefault_intent = \"weather\"\n",
        )
        .await
        .unwrap();

        assert!(matches!(
            try_load_config(tmp.path()).await,
            Err(ConfigError::Parse { .. })
        ));
    }
}
