//! Persisted application configuration.
//!
//! A single JSON file under the platform config directory holds the AI
//! provider settings and the recent-repository list. Writes go through a
//! temp file in the target directory and are persisted atomically.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::ai::Provider;
use crate::error::{AiError, ConfigError};

/// Maximum entries kept in the recent repository list.
const MAX_RECENT_REPOS: usize = 10;

/// AI provider settings. Field names match the original JSON wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AiConfig {
    pub provider: String,
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: Provider::OpenAi.as_str().to_string(),
            api_key: String::new(),
            base_url: Provider::OpenAi.default_base_url().to_string(),
            model: Provider::OpenAi.default_model().to_string(),
        }
    }
}

impl AiConfig {
    /// Parse the configured provider, checking the credential pairing.
    pub fn resolved_provider(&self) -> Result<Provider, AiError> {
        let provider: Provider = self.provider.parse()?;
        if provider.requires_api_key() && self.api_key.is_empty() {
            return Err(AiError::MissingCredential { provider });
        }
        Ok(provider)
    }

    /// Validate against provider requirements.
    ///
    /// Pure: usable both for "test this candidate" and "validate before
    /// persisting" without touching any held state.
    pub fn validate(&self) -> Result<(), AiError> {
        self.resolved_provider().map(|_| ())
    }
}

/// The persisted application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    pub ai: AiConfig,
    pub recent_repos: Vec<PathBuf>,
}

impl AppConfig {
    /// Path of the config file under the platform config directory.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(dir.join("scrivener").join("config.json"))
    }

    /// Load from the default location; a missing file yields the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let data = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(ConfigError::ReadFailed(e)),
        };
        serde_json::from_str(&data).map_err(ConfigError::ParseFailed)
    }

    /// Save to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path()?)
    }

    /// Write atomically: serialize into a temp file beside the destination,
    /// then persist over it.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let parent = path.parent().ok_or(ConfigError::NoConfigDir)?;
        fs::create_dir_all(parent).map_err(ConfigError::WriteFailed)?;

        let data = serde_json::to_string_pretty(self).map_err(ConfigError::ParseFailed)?;

        let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(ConfigError::WriteFailed)?;
        tmp.write_all(data.as_bytes())
            .map_err(ConfigError::WriteFailed)?;
        tmp.persist(path).map_err(|e| ConfigError::WriteFailed(e.error))?;
        Ok(())
    }

    /// Move `path` to the front of the recent list, deduplicated and capped.
    pub fn touch_recent_repo(&mut self, path: &Path) {
        self.recent_repos.retain(|p| p != path);
        self.recent_repos.insert(0, path.to_path_buf());
        self.recent_repos.truncate(MAX_RECENT_REPOS);
    }

    pub fn remove_recent_repo(&mut self, path: &Path) {
        self.recent_repos.retain(|p| p != path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_needs_api_key_before_use() {
        // The default provider is openai with no key, which must fail the
        // credential check until the user supplies one.
        let config = AiConfig::default();
        assert!(matches!(
            config.validate(),
            Err(AiError::MissingCredential { .. })
        ));
    }

    #[test]
    fn test_ollama_needs_no_api_key() {
        let config = AiConfig {
            provider: "ollama".to_string(),
            api_key: String::new(),
            base_url: String::new(),
            model: String::new(),
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_openai_requires_api_key() {
        let config = AiConfig {
            provider: "openai".to_string(),
            api_key: String::new(),
            base_url: String::new(),
            model: String::new(),
        };
        match config.validate() {
            Err(AiError::MissingCredential { provider }) => {
                assert_eq!(provider, Provider::OpenAi);
            }
            other => panic!("expected MissingCredential, got {other:?}"),
        }
    }

    #[test]
    fn test_claude_requires_api_key() {
        let config = AiConfig {
            provider: "claude".to_string(),
            api_key: String::new(),
            base_url: String::new(),
            model: String::new(),
        };
        assert!(matches!(
            config.validate(),
            Err(AiError::MissingCredential { .. })
        ));
    }

    #[test]
    fn test_empty_provider_is_required_error() {
        let config = AiConfig {
            provider: String::new(),
            api_key: "key".to_string(),
            base_url: String::new(),
            model: String::new(),
        };
        assert!(matches!(config.validate(), Err(AiError::ProviderRequired)));
    }

    #[test]
    fn test_unknown_provider_is_unsupported() {
        let config = AiConfig {
            provider: "gemini".to_string(),
            api_key: "key".to_string(),
            base_url: String::new(),
            model: String::new(),
        };
        assert!(matches!(
            config.validate(),
            Err(AiError::UnsupportedProvider(_))
        ));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = AppConfig::default();
        config.ai.provider = "claude".to_string();
        config.ai.api_key = "sk-ant".to_string();
        config.touch_recent_repo(Path::new("/work/repo"));
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.ai, config.ai);
        assert_eq!(loaded.recent_repos, vec![PathBuf::from("/work/repo")]);
    }

    #[test]
    fn test_load_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = AppConfig::load_from(&dir.path().join("nope.json")).unwrap();
        assert_eq!(loaded.ai, AiConfig::default());
        assert!(loaded.recent_repos.is_empty());
    }

    #[test]
    fn test_load_garbage_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            AppConfig::load_from(&path),
            Err(ConfigError::ParseFailed(_))
        ));
    }

    #[test]
    fn test_persisted_fields_are_camel_case() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        AppConfig::default().save_to(&path).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"apiKey\""));
        assert!(raw.contains("\"baseUrl\""));
        assert!(raw.contains("\"recentRepos\""));
    }

    #[test]
    fn test_recent_repos_dedup_and_cap() {
        let mut config = AppConfig::default();
        for i in 0..12 {
            config.touch_recent_repo(Path::new(&format!("/repo/{i}")));
        }
        assert_eq!(config.recent_repos.len(), MAX_RECENT_REPOS);
        assert_eq!(config.recent_repos[0], PathBuf::from("/repo/11"));

        // Re-touching an existing entry moves it to the front without growth.
        config.touch_recent_repo(Path::new("/repo/5"));
        assert_eq!(config.recent_repos.len(), MAX_RECENT_REPOS);
        assert_eq!(config.recent_repos[0], PathBuf::from("/repo/5"));

        config.remove_recent_repo(Path::new("/repo/5"));
        assert!(!config.recent_repos.contains(&PathBuf::from("/repo/5")));
    }
}
