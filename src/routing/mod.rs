//! # Routing Module
//!
//! HTTP surface of the advodir service: the axum router and the advocate
//! lookup handler that composes the rate limiter with the query pipeline.

pub mod handlers;
pub mod router;
