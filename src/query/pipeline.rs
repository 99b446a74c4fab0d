//! # Query Pipeline Module
//!
//! Pure, stateless narrowing of an advocate snapshot into one result page.
//!
//! ## Stage Order
//!
//! 1. **Field filters** — optional per-field predicates, ANDed together
//! 2. **Free-text search** — multi-term AND substring match over a
//!    synthesized lowercase blob of the record's text fields
//! 3. **Sort** — by years of experience when requested; ties keep arrival
//!    order (stable sort, no secondary key)
//! 4. **Paginate** — clamped slice; `totalCount`/`pageTotal` are computed
//!    before slicing so the metadata reflects the whole filtered set
//!
//! The order is fixed: pagination metadata must describe the post-filter,
//! post-search collection. All active predicates are evaluated in a single
//! pass over the snapshot rather than one scan per filter.
//!
//! Out-of-range pages yield an empty page, never an error, and an empty
//! filtered collection yields `pageTotal = 0`. Missing record fields are
//! empty strings at this layer and cannot match a non-empty filter value,
//! so partially populated records degrade instead of faulting.

use crate::query::params::{QueryParams, SortField, SortOrder};
use crate::store::AdvocateRecord;

///////////////////////////////////////////////////////////////////////////////
//****                         Public Structs                            ****//
///////////////////////////////////////////////////////////////////////////////

/// One ordered, bounded page of results plus its pagination arithmetic
#[derive(Debug, Clone, PartialEq)]
pub struct ResultPage {
    /// At most `page_size` records, in pipeline output order
    pub items: Vec<AdvocateRecord>,
    pub page: usize,
    pub page_size: usize,
    /// Size of the collection after filtering and search, before slicing
    pub total_count: usize,
    /// `ceil(total_count / page_size)`, 0 for an empty collection
    pub page_total: usize,
}

///////////////////////////////////////////////////////////////////////////////
//****                       Public Functions                            ****//
///////////////////////////////////////////////////////////////////////////////

/// Run the full filter -> search -> sort -> paginate pipeline over a snapshot
pub fn run(records: &[AdvocateRecord], params: &QueryParams) -> ResultPage {
    let search_terms: Vec<String> = params
        .search
        .as_deref()
        .unwrap_or("")
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect();

    let mut matched: Vec<&AdvocateRecord> = records
        .iter()
        .filter(|record| matches_filters(record, params))
        .filter(|record| matches_search(record, &search_terms))
        .collect();

    if let Some(SortField::YearsOfExperience) = params.sort_by {
        match params.sort_order {
            SortOrder::Ascending => {
                matched.sort_by(|a, b| a.years_of_experience.cmp(&b.years_of_experience))
            }
            SortOrder::Descending => {
                matched.sort_by(|a, b| b.years_of_experience.cmp(&a.years_of_experience))
            }
        }
    }

    let total_count = matched.len();
    let page_total = if total_count == 0 {
        0
    } else {
        total_count.div_ceil(params.page_size)
    };

    // Saturating offset math: a pathological page * pageSize clamps to an
    // empty slice instead of overflowing.
    let offset = params.page.saturating_sub(1).saturating_mul(params.page_size);
    let items = matched
        .into_iter()
        .skip(offset)
        .take(params.page_size)
        .cloned()
        .collect();

    ResultPage {
        items,
        page: params.page,
        page_size: params.page_size,
        total_count,
        page_total,
    }
}

///////////////////////////////////////////////////////////////////////////////
//****                       Private Functions                           ****//
///////////////////////////////////////////////////////////////////////////////

/// Evaluate every active field filter against one record, ANDed
fn matches_filters(record: &AdvocateRecord, params: &QueryParams) -> bool {
    if let Some(specialty) = &params.specialty {
        if !record.specialties.iter().any(|s| s == specialty) {
            return false;
        }
    }

    if let Some(city) = &params.city {
        if record.city.to_lowercase() != city.to_lowercase() {
            return false;
        }
    }

    if let Some(first_name) = &params.first_name {
        if !contains_ci(&record.first_name, first_name) {
            return false;
        }
    }

    if let Some(last_name) = &params.last_name {
        if !contains_ci(&record.last_name, last_name) {
            return false;
        }
    }

    if let Some(degree) = &params.degree {
        if !contains_ci(&record.degree, degree) {
            return false;
        }
    }

    true
}

/// A record matches when every search term appears somewhere in its blob
fn matches_search(record: &AdvocateRecord, terms: &[String]) -> bool {
    if terms.is_empty() {
        return true;
    }
    let blob = searchable_blob(record);
    terms.iter().all(|term| blob.contains(term.as_str()))
}

/// Lowercase concatenation of the record's searchable text: full name,
/// first and last names, city, degree, and every specialty
fn searchable_blob(record: &AdvocateRecord) -> String {
    let mut blob = format!(
        "{} {} {} {} {} {}",
        record.first_name,
        record.last_name,
        record.first_name,
        record.last_name,
        record.city,
        record.degree,
    );
    for specialty in &record.specialties {
        blob.push(' ');
        blob.push_str(specialty);
    }
    blob.to_lowercase()
}

/// Case-insensitive substring containment
fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

///////////////////////////////////////////////////////////////////////////////
//****                              Tests                                ****//
///////////////////////////////////////////////////////////////////////////////
