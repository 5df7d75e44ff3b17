//! Gemini text-generation client.
//!
//! The rest of the application treats the model as an opaque completion
//! service: [`GeminiClient::generate`] takes a prompt string and eventually
//! returns the reply text or a [`GenerateError`]. One call, one complete
//! string. No streaming, and deliberately no retry: a failed call surfaces
//! to the request lifecycle as a terminal `Failed` state.

mod gemini;

pub use gemini::GeminiClient;

use std::sync::OnceLock;
use std::time::Duration;

use thiserror::Error;

/// Canonical Gemini API base URL.
pub const GEMINI_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

const CONNECT_TIMEOUT_SECS: u64 = 30;
const REQUEST_TIMEOUT_SECS: u64 = 120;
const TCP_KEEPALIVE_SECS: u64 = 60;

const MAX_ERROR_BODY_BYTES: usize = 32 * 1024;

pub(crate) fn request_timeout() -> Duration {
    Duration::from_secs(REQUEST_TIMEOUT_SECS)
}

/// Shared hardened HTTP client.
pub(crate) fn http_client() -> &'static reqwest::Client {
    static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
    CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .tcp_keepalive(Some(Duration::from_secs(TCP_KEEPALIVE_SECS)))
            .redirect(reqwest::redirect::Policy::none())
            .https_only(true)
            .build()
            .unwrap_or_else(|e| {
                tracing::error!("Failed to build hardened HTTP client: {e}. Falling back to minimal hardened client.");
                reqwest::Client::builder()
                    .https_only(true)
                    .redirect(reqwest::redirect::Policy::none())
                    .build()
                    .expect("Minimal hardened HTTP client must build; cannot proceed without TLS")
            })
    })
}

/// Why a generation call produced no text.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("API error {status}: {message}")]
    Api {
        status: reqwest::StatusCode,
        message: String,
    },
    #[error("could not decode model response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("prompt was blocked by the service ({0})")]
    Blocked(String),
    #[error("model returned no usable text")]
    Empty,
}

/// Read a non-success response body through a size cap so an adversarial or
/// misbehaving endpoint cannot balloon an error message.
pub(crate) async fn read_capped_error_body(response: reqwest::Response) -> String {
    match response.text().await {
        Ok(mut body) => {
            if body.len() > MAX_ERROR_BODY_BYTES {
                let mut cut = MAX_ERROR_BODY_BYTES;
                while !body.is_char_boundary(cut) {
                    cut -= 1;
                }
                body.truncate(cut);
                body.push_str("...(truncated)");
            }
            body
        }
        Err(e) => format!("(unreadable error body: {e})"),
    }
}

/// Pull the human-readable message out of a Gemini error payload, if the
/// body is the usual `{"error": {"message": ...}}` JSON shape.
pub(crate) fn api_error_message(body: &str) -> Option<String> {
    let payload: serde_json::Value = serde_json::from_str(body).ok()?;
    payload
        .pointer("/error/message")
        .and_then(|value| value.as_str())
        .map(ToString::to_string)
}
