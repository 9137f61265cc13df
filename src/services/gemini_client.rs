use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::{
    config::PlannerConfig,
    core::model::TextModel,
    error::{PlannerError, Result},
};

/// Client for the Generative Language `generateContent` endpoint.
///
/// Every call is a single attempt; failures go straight back to the caller.
#[derive(Clone, Debug)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiClient {
    pub fn new(config: &PlannerConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|err| PlannerError::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            http,
            api_key: config.api_key().to_string(),
            base_url: config.base_url().to_string(),
            model: config.model().to_string(),
        })
    }

    pub async fn generate_content(&self, prompt: &str) -> Result<String> {
        let request_url = build_generate_url(&self.base_url, &self.model);
        let body = json!({
            "contents": [
                {
                    "role": "user",
                    "parts": [ { "text": prompt } ]
                }
            ]
        });

        let response = self
            .http
            .post(&request_url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            let api_message = serde_json::from_str::<Value>(&response_text)
                .ok()
                .and_then(|value| {
                    value
                        .get("error")
                        .and_then(|error| error.get("message"))
                        .and_then(|message| message.as_str())
                        .map(|s| s.to_string())
                })
                .unwrap_or_else(|| response_text.clone());

            return Err(PlannerError::ModelApi(format!(
                "HTTP {} error: {}",
                status, api_message
            )));
        }

        let envelope = decode_envelope(&response_text)?;
        debug!(
            target: "trip_planner::gemini",
            candidates = envelope.candidates.len(),
            "received generateContent response"
        );
        envelope.into_text()
    }
}

#[async_trait]
impl TextModel for GeminiClient {
    fn name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        self.generate_content(prompt).await
    }
}

fn build_generate_url(base_url: &str, model: &str) -> String {
    let trimmed = base_url.trim_end_matches('/');
    if trimmed.ends_with(":generateContent") {
        trimmed.to_string()
    } else {
        let model = model.trim_start_matches("models/");
        format!("{}/models/{}:generateContent", trimmed, model)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenate the text parts of the first candidate.
    fn into_text(self) -> Result<String> {
        let block_reason = self
            .prompt_feedback
            .and_then(|feedback| feedback.block_reason);

        let Some(candidate) = self.candidates.into_iter().next() else {
            return Err(PlannerError::ModelApi(match block_reason {
                Some(reason) => format!("prompt was blocked: {}", reason),
                None => "response contained no candidates".to_string(),
            }));
        };

        let text = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<String>()
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(PlannerError::ModelApi(format!(
                "candidate contained no text (finish reason: {})",
                candidate.finish_reason.as_deref().unwrap_or("unspecified")
            )));
        }

        Ok(text)
    }
}

fn decode_envelope(raw: &str) -> Result<GenerateContentResponse> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|err| {
        let path = err.path().to_string();
        let location = if path.is_empty() {
            "<root>".to_string()
        } else {
            path
        };
        PlannerError::ModelApi(format!(
            "unexpected generateContent response at {}: {}",
            location,
            err.inner()
        ))
    })
}
