//! Shared server state.

use navigator_config::RelayConfig;
use navigator_llm::{IamClient, ScoringClient};
use reqwest::Client;

/// Upstream clients shared by all requests.
///
/// Both clients hold the same pooled `reqwest::Client`. Nothing request-scoped,
/// tokens included, is stored here.
pub struct ServerState {
    pub iam: IamClient,
    pub scoring: ScoringClient,
}

impl ServerState {
    pub fn new(config: &RelayConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(concat!("navigator-server/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            iam: IamClient::new(client.clone(), config.upstream.clone()),
            scoring: ScoringClient::new(client, &config.upstream),
        })
    }
}
