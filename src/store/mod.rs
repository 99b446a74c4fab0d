//! # Store Module
//!
//! Advocate record type and the in-memory store that hands immutable
//! snapshots to the query pipeline.
//!
//! The dataset is loaded once at startup from a JSON array. Field names on
//! the wire are camelCase (`firstName`, `yearsOfExperience`, ...) to match
//! the directory's established API shape. String fields and the specialty
//! list deserialize with defaults, so a partially populated record loads
//! and simply fails to match filters instead of faulting the pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::sync::Arc;
use tracing::info;

///////////////////////////////////////////////////////////////////////////////
//****                         Public Structs                            ****//
///////////////////////////////////////////////////////////////////////////////

/// One directory entry for a professional advocate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvocateRecord {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub specialties: Vec<String>,
    #[serde(default)]
    pub years_of_experience: u32,
    #[serde(default)]
    pub phone_number: u64,
    /// Informational only; not used by any filter or sort
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// In-memory advocate collection shared across request handlers.
///
/// The records never change while the process is running, so a snapshot is
/// just a cheap `Arc` clone; the pipeline never sees a collection that
/// mutates under it.
#[derive(Clone)]
pub struct AdvocateStore {
    records: Arc<Vec<AdvocateRecord>>,
}

impl AdvocateStore {
    /// Load the advocate dataset from a JSON file
    pub fn load(path: &str) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let raw = fs::read_to_string(path)?;
        let records: Vec<AdvocateRecord> = serde_json::from_str(&raw)?;
        info!(count = records.len(), path = %path, "Loaded advocate records");
        Ok(Self {
            records: Arc::new(records),
        })
    }

    /// Build a store from records already in memory, used by tests
    pub fn from_records(records: Vec<AdvocateRecord>) -> Self {
        Self {
            records: Arc::new(records),
        }
    }

    /// Immutable point-in-time view of the collection for one request
    pub fn snapshot(&self) -> Arc<Vec<AdvocateRecord>> {
        Arc::clone(&self.records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

///////////////////////////////////////////////////////////////////////////////
//****                              Tests                                ****//
///////////////////////////////////////////////////////////////////////////////
