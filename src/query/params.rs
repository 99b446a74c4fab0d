//! # Query Parameters Module
//!
//! Raw-to-typed parsing of lookup query parameters.
//!
//! Every raw field arrives as an `Option<String>`, so malformed input can
//! never fail request extraction. `QueryParams::from_raw` is the explicit
//! defaulting step: absent, non-numeric, or sub-1 `page`/`pageSize` values
//! coerce to the documented defaults (1 and 10) rather than erroring, and
//! unrecognized `sortBy`/`sortOrder` values fall back to "no sort" and
//! ascending. Defaulting is a documented contract of the API, not a failure,
//! so nothing in here logs or raises.

use serde::Deserialize;

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_PAGE_SIZE: usize = 10;

///////////////////////////////////////////////////////////////////////////////
//****                         Public Structs                            ****//
///////////////////////////////////////////////////////////////////////////////

/// Query parameters exactly as they arrive on the request, camelCase keys
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawQueryParams {
    pub specialty: Option<String>,
    pub city: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub degree: Option<String>,
    pub search: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

/// Field the collection can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    YearsOfExperience,
}

impl SortField {
    /// Parse a sort field name; anything unrecognized means "no sort"
    fn parse(s: &str) -> Option<Self> {
        match s {
            "yearsOfExperience" => Some(SortField::YearsOfExperience),
            _ => None,
        }
    }
}

/// Sort direction, ascending unless the client says otherwise
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "desc" | "descending" => SortOrder::Descending,
            _ => SortOrder::Ascending,
        }
    }
}

/// Validated, defaulted query parameters handed to the pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct QueryParams {
    pub specialty: Option<String>,
    pub city: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub degree: Option<String>,
    pub search: Option<String>,
    pub page: usize,
    pub page_size: usize,
    pub sort_by: Option<SortField>,
    pub sort_order: SortOrder,
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            specialty: None,
            city: None,
            first_name: None,
            last_name: None,
            degree: None,
            search: None,
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
            sort_by: None,
            sort_order: SortOrder::Ascending,
        }
    }
}

impl QueryParams {
    /// Convert raw request parameters into validated ones, applying the
    /// documented defaults
    pub fn from_raw(raw: RawQueryParams) -> Self {
        Self {
            specialty: non_empty(raw.specialty),
            city: non_empty(raw.city),
            first_name: non_empty(raw.first_name),
            last_name: non_empty(raw.last_name),
            degree: non_empty(raw.degree),
            search: non_empty(raw.search),
            page: parse_positive(raw.page.as_deref(), DEFAULT_PAGE),
            page_size: parse_positive(raw.page_size.as_deref(), DEFAULT_PAGE_SIZE),
            sort_by: raw.sort_by.as_deref().and_then(SortField::parse),
            sort_order: raw
                .sort_order
                .as_deref()
                .map(SortOrder::parse)
                .unwrap_or_default(),
        }
    }
}

///////////////////////////////////////////////////////////////////////////////
//****                       Private Functions                           ****//
///////////////////////////////////////////////////////////////////////////////

/// Parse a 1-based positive integer, coercing absence, garbage, and
/// sub-1 values to the default
fn parse_positive(raw: Option<&str>, default: usize) -> usize {
    raw.and_then(|s| s.trim().parse::<usize>().ok())
        .filter(|&n| n >= 1)
        .unwrap_or(default)
}

/// An empty filter value imposes no constraint, same as an absent one
fn non_empty(raw: Option<String>) -> Option<String> {
    raw.filter(|s| !s.is_empty())
}

///////////////////////////////////////////////////////////////////////////////
//****                              Tests                                ****//
///////////////////////////////////////////////////////////////////////////////
