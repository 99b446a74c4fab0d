//! # Routing Handlers Module
//!
//! Request handlers for the advodir service.
//!
//! ## Request Flow
//!
//! 1. Derive the client key from the request (forwarded header, then peer
//!    address, then an `anonymous` fallback)
//! 2. Apply the rate-limit check; a denied client gets 429 and the query
//!    pipeline never runs for that request
//! 3. Parse raw query parameters into validated ones (malformed pagination
//!    input coerces to defaults, it is never an error)
//! 4. Take a snapshot of the advocate collection and run the pipeline
//! 5. Serialize the result page into the `{ data, pagination }` envelope
//!
//! A rate-limit denial is an expected outcome under load, not a fault; it
//! is logged by the limiter at `warn` and never retried here.

use crate::AppState;
use crate::query::params::{QueryParams, RawQueryParams};
use crate::query::pipeline::{self, ResultPage};
use crate::rate_limiter::check_rate_limit;
use crate::store::AdvocateRecord;
use axum::Json;
use axum::extract::{ConnectInfo, Query, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::net::SocketAddr;
use tracing::info;
use uuid::Uuid;

///////////////////////////////////////////////////////////////////////////////
//****                         Public Structs                            ****//
///////////////////////////////////////////////////////////////////////////////

/// Wire envelope for a lookup response
#[derive(Debug, Serialize)]
pub struct AdvocatesResponse {
    pub data: Vec<AdvocateRecord>,
    pub pagination: PaginationMeta,
}

/// Pagination block of the response envelope
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: usize,
    pub page_size: usize,
    /// Count after filtering and search, before pagination
    pub count: usize,
    pub page_total: usize,
}

impl From<ResultPage> for AdvocatesResponse {
    fn from(page: ResultPage) -> Self {
        Self {
            pagination: PaginationMeta {
                page: page.page,
                page_size: page.page_size,
                count: page.total_count,
                page_total: page.page_total,
            },
            data: page.items,
        }
    }
}

///////////////////////////////////////////////////////////////////////////////
//****                       Public Functions                            ****//
///////////////////////////////////////////////////////////////////////////////

/// Handles `GET /api/advocates`
pub async fn list_advocates(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Query(raw): Query<RawQueryParams>,
) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let client_key = client_key(&headers, Some(peer));

    // Admission control comes before any query work
    if let Err(response) = check_rate_limit(&client_key, &request_id, &state.rate_limiter) {
        return response;
    }

    let params = QueryParams::from_raw(raw);
    let snapshot = state.store.snapshot();
    let page = pipeline::run(&snapshot, &params);

    info!(
        request_id = %request_id,
        client_key = %client_key,
        page = params.page,
        page_size = params.page_size,
        count = page.total_count,
        "Advocate lookup served"
    );

    Json(AdvocatesResponse::from(page)).into_response()
}

/// Derive the throttling identity for a request.
///
/// Prefers the first hop of `X-Forwarded-For`, then the peer socket
/// address, and finally an `anonymous` bucket when neither is available.
pub fn client_key(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    if let Some(forwarded) = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
    {
        if let Some(first_hop) = forwarded.split(',').next() {
            let first_hop = first_hop.trim();
            if !first_hop.is_empty() {
                return first_hop.to_string();
            }
        }
    }

    match peer {
        Some(addr) => addr.ip().to_string(),
        None => "anonymous".to_string(),
    }
}

///////////////////////////////////////////////////////////////////////////////
//****                              Tests                                ****//
///////////////////////////////////////////////////////////////////////////////
