//! Token exchange and prompt forwarding for a single onboarding request.

use navigator_core::{RelayError, ScoringPayload};
use navigator_llm::log_scoring_response;
use tracing::debug;

use crate::ServerState;

/// Exchanges credentials, forwards `prompt` and logs what the deployment said.
///
/// The scoring output is logged and then dropped. Callers only learn whether
/// the chain went through.
pub async fn relay(state: &ServerState, prompt: &str) -> Result<(), RelayError> {
    let token = state.iam.exchange().await?;
    debug!("Obtained identity token: {:?}", token);

    let payload = ScoringPayload::from_prompt(prompt);
    let response = state.scoring.score(&token, &payload).await?;

    log_scoring_response(&response);
    Ok(())
}
