use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::defaults;
use crate::config::CommitFormat;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Settings {
    pub core: CoreConfig,
    #[serde(default)]
    pub providers: BTreeMap<String, ProviderConfig>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CoreConfig {
    /// Name of the backend used when `gen` is run without `--provider`.
    pub provider: String,
    pub commit_format: CommitFormat,
    pub auto_commit: bool,
    pub cache_responses: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ProviderConfig {
    pub model: String,
    pub endpoint: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_max_tokens() -> u32 {
    50
}

fn default_temperature() -> f32 {
    0.7
}

impl Settings {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;

        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home_dir =
            dirs::home_dir().ok_or_else(|| anyhow!("Could not find home directory"))?;

        Ok(home_dir.join(".scrive").join("config.toml"))
    }

    /// Settings for a provider, materializing the section with defaults when
    /// it is missing. Unknown names leave the settings untouched.
    pub fn ensure_provider(&mut self, name: &str) -> Result<&ProviderConfig> {
        if !self.providers.contains_key(name) {
            let section = defaults::provider_defaults(name)
                .ok_or_else(|| anyhow!("Unknown provider '{name}'"))?;
            self.providers.insert(name.to_string(), section);
        }

        Ok(&self.providers[name])
    }

    pub fn has_provider(&self, name: &str) -> bool {
        self.providers.contains_key(name)
    }
}

impl Default for Settings {
    fn default() -> Self {
        let providers = defaults::PROVIDER_NAMES
            .iter()
            .filter_map(|name| {
                defaults::provider_defaults(name).map(|cfg| (name.to_string(), cfg))
            })
            .collect();

        Self {
            core: CoreConfig {
                provider: "openai".to_string(),
                commit_format: CommitFormat::Conventional,
                auto_commit: false,
                cache_responses: true,
            },
            providers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_all_providers() {
        let settings = Settings::default();
        assert_eq!(settings.core.provider, "openai");
        assert_eq!(settings.core.commit_format, CommitFormat::Conventional);
        for name in defaults::PROVIDER_NAMES {
            assert!(settings.has_provider(name), "missing section for {name}");
        }
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut settings = Settings::default();
        settings.core.provider = "ollama".to_string();
        settings.providers.get_mut("ollama").unwrap().model = "codellama".to_string();
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(&path).unwrap();
        assert_eq!(loaded.core.provider, "ollama");
        assert_eq!(loaded.providers["ollama"].model, "codellama");
        assert_eq!(loaded.providers["openai"].max_tokens, 50);
    }

    #[test]
    fn load_from_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(settings.core.provider, "openai");
        assert!(settings.core.cache_responses);
    }

    #[test]
    fn ensure_provider_materializes_missing_section() {
        let mut settings = Settings::default();
        settings.providers.remove("gemini");

        let section = settings.ensure_provider("gemini").unwrap();
        assert_eq!(section.model, "gemini-pro");
        assert!(settings.has_provider("gemini"));

        assert!(settings.ensure_provider("replicate").is_err());
        assert!(!settings.has_provider("replicate"));
    }
}
