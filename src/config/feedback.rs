use anyhow::Result;
use std::env;

/// Settings for the coaching feedback service
#[derive(Debug, Clone)]
pub struct FeedbackConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout_seconds: u64,
    pub max_retries: u32,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-1.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            timeout_seconds: 30,
            max_retries: 2,
        }
    }
}

impl FeedbackConfig {
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env();
        Ok(config)
    }

    /// Override fields with any of `GEMINI_API_KEY`, `GEMINI_MODEL`,
    /// `GEMINI_BASE_URL`, `FEEDBACK_TIMEOUT_SECONDS`, `FEEDBACK_MAX_RETRIES`
    pub fn apply_env(&mut self) {
        if let Some(key) = env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty()) {
            self.api_key = Some(key);
        }
        if let Ok(model) = env::var("GEMINI_MODEL") {
            self.model = model;
        }
        if let Ok(base_url) = env::var("GEMINI_BASE_URL") {
            self.base_url = base_url;
        }
        if let Some(timeout) = env::var("FEEDBACK_TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.timeout_seconds = timeout;
        }
        if let Some(retries) = env::var("FEEDBACK_MAX_RETRIES")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.max_retries = retries;
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }
}
