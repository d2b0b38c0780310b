use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::LogLevel;
use crate::client::DEFAULT_BASE_URL;
use crate::error::{PersonioError, Result};

const SECRETS_FILE: &str = "secrets.json";

/// Credentials and endpoint settings for the Personio client.
#[derive(Debug, Clone, Deserialize)]
pub struct PersonioConfig {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub log_level: LogLevel,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl PersonioConfig {
    pub fn new(client_id: &str, client_secret: &str) -> Self {
        PersonioConfig {
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            base_url: default_base_url(),
            log_level: LogLevel::default(),
        }
    }

    /// Read `PERSONIO_CLIENT_ID`, `PERSONIO_CLIENT_SECRET` and optionally
    /// `PERSONIO_BASE_URL`.
    pub fn from_env() -> Result<Self> {
        let client_id = required_env("PERSONIO_CLIENT_ID")?;
        let client_secret = required_env("PERSONIO_CLIENT_SECRET")?;
        let mut config = PersonioConfig::new(&client_id, &client_secret);
        if let Ok(base_url) = std::env::var("PERSONIO_BASE_URL") {
            config.base_url = base_url;
        }
        Ok(config)
    }
}

fn required_env(name: &str) -> Result<String> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| PersonioError::Config(format!("{} is not set", name)))
}

/// Load `secrets.json` from the working directory, falling back to
/// `<config dir>/personio/secrets.json`.
pub fn load_config() -> Result<PersonioConfig> {
    let mut candidates = vec![std::env::current_dir()?.join(SECRETS_FILE)];
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("personio").join(SECRETS_FILE));
    }

    let path = candidates
        .iter()
        .find(|path| path.is_file())
        .ok_or_else(|| not_found(&candidates))?;
    read_config(path)
}

fn not_found(candidates: &[PathBuf]) -> PersonioError {
    let searched = candidates
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(", ");
    PersonioError::Config(format!("no {} found (searched {})", SECRETS_FILE, searched))
}

/// Parse a JSON secrets file.
pub fn read_config(path: &Path) -> Result<PersonioConfig> {
    let contents = fs::read_to_string(path)
        .map_err(|e| PersonioError::Config(format!("Failed to read {}: {e}", path.display())))?;
    let mut config: PersonioConfig = serde_json::from_str(&contents)
        .map_err(|e| PersonioError::Config(format!("Invalid {}: {e}", path.display())))?;
    config.base_url = config.base_url.trim_end_matches('/').to_string();
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "personio-client-{}-{}.json",
            name,
            std::process::id()
        ));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn reads_minimal_secrets_with_defaults() {
        let path = write_temp("minimal", r#"{"client_id": "id", "client_secret": "secret"}"#);
        let config = read_config(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(config.client_id, "id");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.log_level, LogLevel::Information);
    }

    #[test]
    fn reads_overrides() {
        let path = write_temp(
            "overrides",
            r#"{"client_id": "id", "client_secret": "secret",
                "base_url": "http://localhost:8080/v1/", "log_level": "debug"}"#,
        );
        let config = read_config(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(config.base_url, "http://localhost:8080/v1");
        assert_eq!(config.log_level, LogLevel::Debug);
    }

    #[test]
    fn rejects_incomplete_secrets() {
        let path = write_temp("incomplete", r#"{"client_id": "id"}"#);
        let err = read_config(&path).unwrap_err();
        fs::remove_file(&path).ok();
        assert!(matches!(err, PersonioError::Config(_)));
    }
}
