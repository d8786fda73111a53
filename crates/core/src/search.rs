//! Case-insensitive substring filtering for list endpoints.

use crate::entity::Linked;

/// Whether any of `fields` contains `term`, ignoring case.
///
/// Missing and empty fields never match. An empty `term` matches everything.
pub fn matches_term(fields: &[Option<&str>], term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let needle = term.to_uppercase();
    fields
        .iter()
        .flatten()
        .filter(|field| !field.is_empty())
        .any(|field| field.to_uppercase().contains(&needle))
}

/// Keep the records whose search fields match `term`; `None` or an empty
/// term keeps everything.
pub fn filter_records<T: Linked>(records: Vec<T>, term: Option<&str>) -> Vec<T> {
    match term {
        Some(term) if !term.is_empty() => records
            .into_iter()
            .filter(|r| matches_term(&r.search_fields(), term))
            .collect(),
        _ => records,
    }
}
