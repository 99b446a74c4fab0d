//! # Query Module
//!
//! The query-processing pipeline for advocate lookups: a pure transformation
//! from `(record snapshot, query parameters)` to an ordered, bounded result
//! page. Stages run in a fixed order — field filters, free-text search,
//! sort, paginate — so pagination metadata always reflects the post-filter
//! count.
//!
//! `params` owns the raw-to-typed parameter parsing and defaulting;
//! `pipeline` owns the stages themselves. Nothing in this module performs
//! I/O or holds state across calls.

pub mod params;
pub mod pipeline;
