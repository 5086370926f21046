//! Onboarding relay handler.

use std::sync::Arc;

use axum::{extract::State, Json};
use navigator_core::{OnboardingRequest, ResponseEnvelope};
use tracing::{error, info};

use crate::services::onboarding as onboarding_service;
use crate::ServerState;

/// POST /onboarding - Relays the prompt upstream and acknowledges it.
///
/// Always answers 200; failures are reported in the envelope body.
pub async fn onboarding(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<OnboardingRequest>,
) -> Json<ResponseEnvelope> {
    info!("Relaying onboarding prompt ({} bytes)", req.data.len());

    let outcome = onboarding_service::relay(&state, &req.data)
        .await
        .map(|()| req.data);

    if let Err(e) = &outcome {
        error!("Onboarding relay failed: {}", e);
    }

    Json(outcome.into())
}
