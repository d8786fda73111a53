//! Character entity model and DTOs.

use gamevault_core::entity::{EntityKind, Linked};
use gamevault_core::types::EntityId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::validate_name;

/// A row from the characters table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub id: EntityId,
    pub name: String,
    pub description: Option<String>,
    pub game_ids: Vec<EntityId>,
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCharacter {
    #[validate(custom(function = "validate_name"))]
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub game_ids: Vec<EntityId>,
    #[serde(default)]
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCharacter {
    #[validate(custom(function = "validate_name"))]
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub game_ids: Vec<EntityId>,
    #[serde(default)]
    pub images: Vec<String>,
}

impl From<CreateCharacter> for Character {
    fn from(input: CreateCharacter) -> Self {
        Self {
            id: String::new(),
            name: input.name,
            description: input.description,
            game_ids: input.game_ids,
            images: input.images,
        }
    }
}

impl UpdateCharacter {
    pub fn into_character(self, id: &str) -> Character {
        Character {
            id: id.to_string(),
            name: self.name,
            description: self.description,
            game_ids: self.game_ids,
            images: self.images,
        }
    }
}

impl Linked for Character {
    const KIND: EntityKind = EntityKind::Character;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }

    fn peer_ids(&self) -> &[EntityId] {
        &self.game_ids
    }

    fn peer_ids_mut(&mut self) -> &mut Vec<EntityId> {
        &mut self.game_ids
    }

    fn images(&self) -> &[String] {
        &self.images
    }

    fn images_mut(&mut self) -> &mut Vec<String> {
        &mut self.images
    }

    /// Characters are searched by name only.
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![Some(&self.name)]
    }
}
