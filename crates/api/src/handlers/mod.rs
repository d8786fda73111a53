pub mod character;
pub mod game;
pub mod images;

use gamevault_core::error::CoreError;
use gamevault_core::types::is_entity_id;

use crate::error::{AppError, AppResult};

/// Path ids that cannot name a record answer 404 like unknown ones.
pub(crate) fn require_entity_id(entity: &'static str, id: &str) -> AppResult<()> {
    if is_entity_id(id) {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity,
            id: id.to_string(),
        }))
    }
}
