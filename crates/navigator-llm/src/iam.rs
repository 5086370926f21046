//! API key to bearer token exchange.

use navigator_config::UpstreamConfig;
use navigator_core::{CredentialToken, RelayError};
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::transport;

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    #[serde(rename = "errorMessage")]
    error_message: Option<String>,
}

/// Client for the identity provider's token endpoint.
pub struct IamClient {
    client: Client,
    upstream: UpstreamConfig,
}

impl IamClient {
    pub fn new(client: Client, upstream: UpstreamConfig) -> Self {
        Self { client, upstream }
    }

    /// Requests a fresh token. Nothing is cached between calls.
    pub async fn exchange(&self) -> Result<CredentialToken, RelayError> {
        if !self.upstream.has_api_key() {
            return Err(RelayError::Auth("no API key configured".into()));
        }

        let form = [
            ("apikey", self.upstream.api_key.as_str()),
            ("grant_type", self.upstream.grant_type.as_str()),
        ];

        let mut request = self
            .client
            .post(&self.upstream.token_url)
            .header(ACCEPT, "application/json")
            .form(&form);
        if let Some(timeout) = self.upstream.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(transport)?;
        let status = response.status();
        let body = response.text().await.map_err(transport)?;
        debug!(status = status.as_u16(), "Identity token response received");

        let parsed: TokenResponse = serde_json::from_str(&body)?;
        match parsed.access_token {
            Some(token) if !token.is_empty() => Ok(CredentialToken::new(token)),
            _ => Err(RelayError::Auth(match parsed.error_message {
                Some(msg) => format!("{} ({})", msg, status),
                None => format!("response has no access_token ({})", status),
            })),
        }
    }
}
