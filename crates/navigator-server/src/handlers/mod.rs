//! HTTP route handlers for the relay.

pub mod onboarding;

use axum::Json;
use serde_json::{json, Value};

/// Welcome endpoint consumed by the frontend.
pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Welcome to the backend API" }))
}

/// Health check endpoint.
pub async fn health() -> &'static str {
    "OK"
}
