//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Optional `?search=` term for list endpoints.
///
/// Matched case-insensitively as a substring of the record's searchable
/// fields. Absent or empty returns everything.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub search: Option<String>,
}
