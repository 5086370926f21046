//! Prompt forwarding to the hosted deployment.

use std::time::Duration;

use navigator_config::UpstreamConfig;
use navigator_core::{CredentialToken, RelayError, ScoringPayload};
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::transport;

/// Decoded body of a scoring call. The relay only logs it.
#[derive(Debug, Clone, PartialEq)]
pub enum ScoringBody {
    Json(Value),
    Text(String),
    /// The body stream failed after the status line arrived.
    Unreadable(String),
}

#[derive(Debug, Clone)]
pub struct ScoringResponse {
    pub status: u16,
    pub body: ScoringBody,
}

pub struct ScoringClient {
    client: Client,
    scoring_url: String,
    timeout: Option<Duration>,
}

impl ScoringClient {
    pub fn new(client: Client, upstream: &UpstreamConfig) -> Self {
        Self {
            client,
            scoring_url: upstream.scoring_url.clone(),
            timeout: upstream.timeout,
        }
    }

    /// Posts `payload` with `token` as bearer auth.
    ///
    /// Only a failure to send is an error. Any status and any body are
    /// returned as-is for logging.
    pub async fn score(
        &self,
        token: &CredentialToken,
        payload: &ScoringPayload,
    ) -> Result<ScoringResponse, RelayError> {
        let mut request = self
            .client
            .post(&self.scoring_url)
            .header(AUTHORIZATION, token.bearer())
            .json(payload);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(transport)?;
        let status = response.status().as_u16();

        let body = match response.text().await {
            Ok(text) => match serde_json::from_str::<Value>(&text) {
                Ok(json) => ScoringBody::Json(json),
                Err(_) => ScoringBody::Text(text),
            },
            Err(e) => ScoringBody::Unreadable(e.to_string()),
        };

        Ok(ScoringResponse { status, body })
    }
}

/// Writes a scoring response to the log. Never fails.
pub fn log_scoring_response(response: &ScoringResponse) {
    if !(200..300).contains(&response.status) {
        warn!(status = response.status, "Scoring endpoint returned non-success status");
    }

    match &response.body {
        ScoringBody::Json(json) => info!(status = response.status, "Scoring response: {}", json),
        ScoringBody::Text(text) => info!(status = response.status, "Scoring response (text): {}", text),
        ScoringBody::Unreadable(e) => error!("An unexpected error occurred reading scoring response: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn upstream_with(scoring_url: String) -> UpstreamConfig {
        UpstreamConfig {
            api_key: "unused".into(),
            token_url: "http://127.0.0.1:1/identity/token".into(),
            grant_type: "unused".into(),
            scoring_url,
            timeout: None,
        }
    }

    fn client_for(server: &MockServer) -> ScoringClient {
        let upstream = upstream_with(format!("{}/ml/v4/deployments/d1/ai_service", server.uri()));
        ScoringClient::new(Client::new(), &upstream)
    }

    /// Serves one response that promises more body bytes than it sends.
    async fn truncated_body_server() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();

            // Drain the whole request so closing the socket sends FIN, not RST.
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.ends_with(b"}]}") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            socket
                .write_all(
                    b"HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 100\r\n\r\n{\"partial\"",
                )
                .await
                .unwrap();
            socket.shutdown().await.unwrap();
        });

        format!("http://{}/score", addr)
    }

    #[tokio::test]
    async fn test_score_posts_bearer_and_messages() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ml/v4/deployments/d1/ai_service"))
            .and(header("authorization", "Bearer tok-abc"))
            .and(body_json(json!({
                "messages": [{ "role": "user", "content": "We build drones" }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{ "message": { "role": "assistant", "content": "Great!" } }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server)
            .score(&CredentialToken::new("tok-abc"), &ScoringPayload::from_prompt("We build drones"))
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        match &response.body {
            ScoringBody::Json(v) => assert_eq!(v["choices"][0]["message"]["content"], "Great!"),
            other => panic!("expected json body, got {:?}", other),
        }
        log_scoring_response(&response);
    }

    #[tokio::test]
    async fn test_text_body_and_error_status_are_not_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("service warming up"))
            .mount(&server)
            .await;

        let response = client_for(&server)
            .score(&CredentialToken::new("tok"), &ScoringPayload::from_prompt("hi"))
            .await
            .unwrap();

        assert_eq!(response.status, 503);
        assert_eq!(response.body, ScoringBody::Text("service warming up".into()));
        log_scoring_response(&response);
    }

    #[tokio::test]
    async fn test_truncated_body_is_unreadable_not_error() {
        let upstream = upstream_with(truncated_body_server().await);
        let client = ScoringClient::new(Client::new(), &upstream);

        let response = client
            .score(&CredentialToken::new("tok"), &ScoringPayload::from_prompt("hi"))
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert!(
            matches!(response.body, ScoringBody::Unreadable(_)),
            "expected unreadable body, got {:?}",
            response.body
        );
        log_scoring_response(&response);
    }

    #[test]
    fn test_log_unreadable_body_does_not_panic() {
        log_scoring_response(&ScoringResponse {
            status: 200,
            body: ScoringBody::Unreadable("connection reset".into()),
        });
    }
}
