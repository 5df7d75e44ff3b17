//! Gemini GenerateContent API client.

use serde::Deserialize;
use serde_json::json;

use itinera_types::{ApiKey, ModelName};

use crate::{
    GEMINI_API_BASE_URL, GenerateError, api_error_message, http_client, read_capped_error_body,
    request_timeout,
};

// ============================================================================
// Response payload
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Content {
    parts: Option<Vec<Part>>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

// ============================================================================
// Client
// ============================================================================

/// A configured handle on the Gemini GenerateContent endpoint.
///
/// Cheap to clone; the underlying HTTP client is shared.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: ApiKey,
    model: ModelName,
    base_url: String,
}

impl GeminiClient {
    #[must_use]
    pub fn new(api_key: ApiKey, model: ModelName) -> Self {
        Self {
            http: http_client().clone(),
            api_key,
            model,
            base_url: GEMINI_API_BASE_URL.to_string(),
        }
    }

    #[must_use]
    pub fn model(&self) -> &ModelName {
        &self.model
    }

    /// Send one prompt, get one complete reply string.
    ///
    /// The returned text is the concatenation of the first candidate's text
    /// parts. A blocked prompt, an empty candidate list, or a reply with no
    /// text all map to typed errors; the caller decides how to surface them.
    pub async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url,
            self.model.as_str()
        );
        let body = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }]
            }]
        });

        tracing::debug!(model = %self.model, prompt_bytes = prompt.len(), "Sending generate request");

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", self.api_key.as_str())
            .header("content-type", "application/json")
            .timeout(request_timeout())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let raw = read_capped_error_body(response).await;
            let message = api_error_message(&raw).unwrap_or(raw);
            tracing::warn!(%status, "Generate request rejected");
            return Err(GenerateError::Api { status, message });
        }

        let raw = response.text().await?;
        let payload: GenerateContentResponse = serde_json::from_str(&raw)?;

        if let Some(feedback) = payload.prompt_feedback
            && let Some(reason) = feedback.block_reason
        {
            return Err(GenerateError::Blocked(reason));
        }

        let candidate = payload
            .candidates
            .into_iter()
            .flatten()
            .next()
            .ok_or(GenerateError::Empty)?;

        let mut text = String::new();
        if let Some(parts) = candidate.content.and_then(|content| content.parts) {
            for part in parts {
                if let Some(chunk) = part.text {
                    text.push_str(&chunk);
                }
            }
        }

        if text.trim().is_empty() {
            return match candidate.finish_reason {
                Some(reason) if reason != "STOP" => Err(GenerateError::Blocked(reason)),
                _ => Err(GenerateError::Empty),
            };
        }

        tracing::debug!(reply_bytes = text.len(), "Generate request completed");
        Ok(text)
    }
}
