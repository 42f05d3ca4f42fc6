use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use shuttle_coach::config::{AnalysisConfig, FeedbackConfig};
use shuttle_coach::services::MergePolicy;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analyze: AnalyzeSettings,

    #[serde(default)]
    pub feedback: FeedbackSettings,

    #[serde(default)]
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeSettings {
    /// Language code for coaching feedback
    #[serde(default = "default_language")]
    pub language: String,

    #[serde(default)]
    pub merge_policy: MergePolicy,
}

/// Feedback service settings; the API key only comes from `GEMINI_API_KEY`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackSettings {
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

// Default value functions
fn default_language() -> String {
    "en".to_string()
}

fn default_model() -> String {
    FeedbackConfig::default().model
}

fn default_base_url() -> String {
    FeedbackConfig::default().base_url
}

fn default_timeout() -> u64 {
    FeedbackConfig::default().timeout_seconds
}

fn default_max_retries() -> u32 {
    FeedbackConfig::default().max_retries
}

impl Default for AnalyzeSettings {
    fn default() -> Self {
        Self {
            language: default_language(),
            merge_policy: MergePolicy::default(),
        }
    }
}

impl Default for FeedbackSettings {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
            max_retries: default_max_retries(),
        }
    }
}

impl FeedbackSettings {
    /// File settings with environment overrides applied on top
    pub fn resolve(&self) -> FeedbackConfig {
        let mut config = FeedbackConfig {
            api_key: None,
            model: self.model.clone(),
            base_url: self.base_url.clone(),
            timeout_seconds: self.timeout_seconds,
            max_retries: self.max_retries,
        };
        config.apply_env();
        config
    }
}

impl Config {
    /// Get config directory path (~/.shuttle-coach/)
    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".shuttle-coach"))
    }

    /// Get config file path (~/.shuttle-coach/config.toml)
    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// The explicit override if given, else the default location
    pub fn resolve_path(path: Option<&Path>) -> Result<PathBuf> {
        match path {
            Some(path) => Ok(path.to_path_buf()),
            None => Self::config_file(),
        }
    }

    /// Load configuration, falling back to defaults when the file is missing
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_file = Self::resolve_path(path)?;

        if !config_file.exists() {
            tracing::debug!("Config file {} not found, using defaults", config_file.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&config_file)
            .with_context(|| format!("Failed to read config file {}", config_file.display()))?;

        let config: Config = toml::from_str(&contents).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.analyze.language, "en");
        assert_eq!(config.analyze.merge_policy, MergePolicy::Wrist);
        assert_eq!(config.feedback.timeout_seconds, 30);
        assert_eq!(config.analysis.detection.wrist_speed_threshold, 20.0);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let serialized = toml::to_string(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();

        assert_eq!(config.feedback.model, deserialized.feedback.model);
        assert_eq!(config.analysis, deserialized.analysis);
    }

    #[test]
    fn test_partial_file() {
        let config: Config = toml::from_str(
            r#"
            [analyze]
            merge_policy = "union"

            [analysis.detection]
            min_shot_gap_frames = 8
            "#,
        )
        .unwrap();

        assert_eq!(config.analyze.merge_policy, MergePolicy::Union);
        assert_eq!(config.analyze.language, "en");
        assert_eq!(config.analysis.detection.min_shot_gap_frames, 8);
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.analyze.language = "id".to_string();
        config.save(&path).unwrap();

        let loaded = Config::load(Some(&path)).unwrap();
        assert_eq!(loaded.analyze.language, "id");
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let loaded = Config::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(loaded.analyze.language, "en");
    }
}
