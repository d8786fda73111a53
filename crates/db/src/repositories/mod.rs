//! Repository layer.
//!
//! Each repository holds a pool plus the table it reads and writes, and
//! implements [`EntityStore`](gamevault_core::store::EntityStore) so the
//! services never see SQL.

use gamevault_core::store::StoreError;

pub mod character_repo;
pub mod game_repo;

pub use character_repo::CharacterRepo;
pub use game_repo::GameRepo;

/// Table names are spliced into SQL text, so only plain identifiers pass.
pub(crate) fn checked_table_name(name: &str) -> Result<String, StoreError> {
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if valid_start && valid_rest && name.len() <= 63 {
        Ok(name.to_string())
    } else {
        tracing::debug!(table = name, "Rejected table name");
        Err(StoreError::InvalidCollection(name.to_string()))
    }
}
