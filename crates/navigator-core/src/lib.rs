//! Core domain types and error definitions for the navigator relay.
//!
//! - [`RelayError`] — Error type for the identity exchange and scoring calls
//! - [`OnboardingRequest`] and [`ResponseEnvelope`] — The caller-facing pair
//! - [`ScoringPayload`] and [`ChatMessage`] — The body sent to the deployment
//! - [`CredentialToken`] — A bearer token scoped to a single request
//!
//! # Example
//!
//! ```rust
//! use navigator_core::{ResponseEnvelope, ScoringPayload};
//!
//! let payload = ScoringPayload::from_prompt("We build solar kiosks");
//! assert_eq!(payload.messages.len(), 1);
//!
//! let envelope = ResponseEnvelope::received("We build solar kiosks".to_string());
//! assert_eq!(envelope.data.as_deref(), Some("We build solar kiosks"));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ─────────────────────────────────────────────────────────────────────────────
// Error
// ─────────────────────────────────────────────────────────────────────────────

/// Errors raised while relaying an onboarding prompt upstream.
#[derive(Error, Debug)]
pub enum RelayError {
    /// The identity provider refused the key or returned no token.
    #[error("Identity exchange failed: {0}")]
    Auth(String),

    /// A network call to either upstream failed.
    #[error("Upstream request failed: {0}")]
    Transport(String),

    /// An upstream body could not be decoded.
    #[error("Failed to parse upstream response: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for RelayError {
    fn from(err: serde_json::Error) -> Self {
        RelayError::Parse(err.to_string())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Caller-facing Types
// ─────────────────────────────────────────────────────────────────────────────

/// Body of `POST /onboarding`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnboardingRequest {
    pub data: String,
}

pub const RECEIVED_MESSAGE: &str = "Onboarding request received";
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Fixed-shape reply to an onboarding request.
///
/// Always sent with HTTP 200. A failed relay is signalled only by `error`
/// being present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResponseEnvelope {
    /// Acknowledges a relayed prompt, echoing it back untouched.
    pub fn received(data: String) -> Self {
        Self {
            message: RECEIVED_MESSAGE.to_string(),
            data: Some(data),
            error: None,
        }
    }

    /// Generic failure envelope carrying the error text.
    pub fn failed(e: impl ToString) -> Self {
        Self {
            message: UNEXPECTED_ERROR_MESSAGE.to_string(),
            data: None,
            error: Some(e.to_string()),
        }
    }
}

impl From<Result<String, RelayError>> for ResponseEnvelope {
    fn from(outcome: Result<String, RelayError>) -> Self {
        match outcome {
            Ok(data) => Self::received(data),
            Err(e) => Self::failed(e),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Upstream Types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

/// JSON body posted to the scoring deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringPayload {
    pub messages: Vec<ChatMessage>,
}

impl ScoringPayload {
    /// Wraps a prompt as a single user message.
    pub fn from_prompt(prompt: &str) -> Self {
        Self {
            messages: vec![ChatMessage {
                role: MessageRole::User,
                content: prompt.to_string(),
            }],
        }
    }
}

/// Bearer token obtained from the identity provider.
///
/// Owned by one request and dropped with it. `Debug` never prints the secret.
pub struct CredentialToken(String);

impl CredentialToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Value for an `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for CredentialToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CredentialToken(<{} bytes redacted>)", self.0.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_received_envelope_omits_error() {
        let envelope = ResponseEnvelope::received("hello".into());
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(
            value,
            json!({ "message": "Onboarding request received", "data": "hello" })
        );
    }

    #[test]
    fn test_failed_envelope_omits_data() {
        let envelope = ResponseEnvelope::failed(RelayError::Auth("missing access_token".into()));
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(
            value,
            json!({
                "message": "An unexpected error occurred",
                "error": "Identity exchange failed: missing access_token"
            })
        );
    }

    #[test]
    fn test_envelope_from_outcome() {
        let ok: ResponseEnvelope = Ok::<_, RelayError>("  spaced \n".to_string()).into();
        assert_eq!(ok.data.as_deref(), Some("  spaced \n"));

        let err: ResponseEnvelope = Err(RelayError::Transport("connection refused".into())).into();
        assert_eq!(err.message, UNEXPECTED_ERROR_MESSAGE);
        assert_eq!(err.error.as_deref(), Some("Upstream request failed: connection refused"));
    }

    #[test]
    fn test_scoring_payload_shape() {
        let payload = ScoringPayload::from_prompt("We sell kombucha");
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({ "messages": [{ "role": "user", "content": "We sell kombucha" }] })
        );
    }

    #[test]
    fn test_token_debug_is_redacted() {
        let token = CredentialToken::new("eyJhbGciOi.secret");
        let printed = format!("{:?}", token);
        assert!(!printed.contains("secret"));
        assert_eq!(token.bearer(), "Bearer eyJhbGciOi.secret");
    }

    #[test]
    fn test_json_error_maps_to_parse() {
        let err = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        assert!(matches!(RelayError::from(err), RelayError::Parse(_)));
    }
}
