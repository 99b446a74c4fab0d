//! # Router Module
//!
//! Builds the axum router for the advodir service.
//!
//! ## Routes
//!
//! - `GET /api/advocates` — filtered, searched, sorted, paginated lookup
//! - `GET /health` — liveness probe
//!
//! The router injects the shared application state and an HTTP tracing
//! layer; handlers are responsible for admission control before any query
//! work runs.

use super::handlers::list_advocates;
use crate::AppState;
use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

///////////////////////////////////////////////////////////////////////////////
//****                       Public Functions                            ****//
///////////////////////////////////////////////////////////////////////////////

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/advocates", get(list_advocates))
        .route("/health", get(|| async { "OK" }))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
