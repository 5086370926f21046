//! Clients for the two upstreams the relay calls on every request.
//!
//! [`IamClient`] trades the API key for a [`CredentialToken`](navigator_core::CredentialToken);
//! [`ScoringClient`] posts the prompt to the deployment with that token.

mod iam;
mod scoring;

pub use iam::IamClient;
pub use scoring::{log_scoring_response, ScoringBody, ScoringClient, ScoringResponse};

use navigator_core::RelayError;

fn transport(e: reqwest::Error) -> RelayError {
    RelayError::Transport(e.to_string())
}
