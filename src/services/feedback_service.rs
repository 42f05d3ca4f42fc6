/// Feedback Service
///
/// Turns the text summary of a shot list into coaching prose. The generator
/// is an external collaborator; the Gemini REST client here is the default
/// implementation and `NoFeedback` is used offline.
use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::FeedbackConfig;
use crate::error::FeedbackError;
use crate::models::{AnalysisSummary, ShotEvent};
use crate::services::retry::RetryConfig;

/// Build the text summary handed to the feedback generator
pub fn prepare_summary(shots: &[ShotEvent]) -> AnalysisSummary {
    AnalysisSummary::from_shots(shots)
}

/// Produces coaching prose from a shot summary
pub trait FeedbackGenerator {
    fn generate(
        &self,
        summary: &str,
        language: &str,
    ) -> impl Future<Output = Result<String, FeedbackError>> + Send;
}

/// Offline generator, always returns an empty string
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFeedback;

impl FeedbackGenerator for NoFeedback {
    async fn generate(&self, _summary: &str, _language: &str) -> Result<String, FeedbackError> {
        Ok(String::new())
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Client for the Gemini `generateContent` endpoint
#[derive(Debug)]
pub struct GeminiFeedbackClient {
    client: Client,
    config: FeedbackConfig,
    retry_config: RetryConfig,
}

impl GeminiFeedbackClient {
    /// Create a new client.
    ///
    /// # Returns
    /// `FeedbackError::NotConfigured` when no API key is set
    pub fn new(config: FeedbackConfig) -> Result<Self, FeedbackError> {
        if !config.is_enabled() {
            return Err(FeedbackError::NotConfigured);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        let retry_config = RetryConfig::with_retries(config.max_retries);

        Ok(Self {
            client,
            config,
            retry_config,
        })
    }

    pub fn with_retry_config(mut self, retry_config: RetryConfig) -> Self {
        self.retry_config = retry_config;
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Coaching prompt wrapped around the shot summary
    pub fn build_prompt(summary: &str, language: &str) -> String {
        format!(
            "You are an experienced badminton coach. Below is an automated analysis \
             of a player's shots from a practice video.\n\n{}\n\n\
             Give concise, encouraging coaching feedback: what the player does well, \
             the most important technique corrections, and one or two drills to \
             practice. Respond in the language with code \"{}\".",
            summary, language
        )
    }

    async fn request_once(&self, prompt: &str) -> Result<String, FeedbackError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(FeedbackError::NotConfigured)?;

        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&text)
                .map(|e| e.error.message)
                .unwrap_or(text);
            return Err(FeedbackError::Service {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse = response.json().await?;
        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .map(|p| p.text)
            .filter(|t| !t.trim().is_empty())
            .ok_or(FeedbackError::EmptyResponse)?;

        Ok(text)
    }
}

impl FeedbackGenerator for GeminiFeedbackClient {
    async fn generate(&self, summary: &str, language: &str) -> Result<String, FeedbackError> {
        let prompt = Self::build_prompt(summary, language);
        debug!("Requesting feedback from {} ({})", self.config.model, language);

        self.retry_config
            .execute(FeedbackError::is_transient, || self.request_once(&prompt))
            .await
    }
}
