//! HTTP surface of the navigator relay.

pub mod handlers;
pub mod services;
mod state;

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{HeaderValue, Request, Response};
use axum::routing::{get, post};
use axum::Router;
use navigator_config::CorsConfig;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

pub use state::ServerState;

/// Builds the CORS policy: listed origins only, with credentials.
///
/// Methods and headers are mirrored from the preflight, since wildcards are
/// not allowed alongside credentials.
pub fn cors_layer(config: &CorsConfig) -> Result<CorsLayer, axum::http::header::InvalidHeaderValue> {
    let origins = config
        .origins
        .iter()
        .map(|o| HeaderValue::from_str(o))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request()))
}

/// Assembles the router with tracing on the API routes.
pub fn router(state: Arc<ServerState>, cors: CorsLayer) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request<Body>| {
            tracing::info_span!(
                "request",
                method = %req.method(),
                uri = %req.uri(),
                version = ?req.version(),
            )
        })
        .on_response(|res: &Response<Body>, latency: Duration, _span: &tracing::Span| {
            info!(
                latency = %format!("{} ms", latency.as_millis()),
                status = %res.status().as_u16(),
                "finished processing request"
            );
        });

    let logged_routes = Router::new()
        .route("/", get(handlers::root))
        .route("/onboarding", post(handlers::onboarding::onboarding))
        .layer(trace_layer);

    Router::new()
        .merge(logged_routes)
        .route("/health", get(handlers::health))
        .layer(cors)
        .with_state(state)
}
