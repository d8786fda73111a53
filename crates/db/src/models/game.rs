//! Game entity model and DTOs.

use gamevault_core::entity::{EntityKind, Linked};
use gamevault_core::types::EntityId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::{validate_name, validate_price};

/// A row from the games table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: EntityId,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Decimal,
    pub character_ids: Vec<EntityId>,
    /// Reference paths of the form `images/games/{id}/{file_name}`.
    pub images: Vec<String>,
}

/// DTO for creating a new game. Character ids that do not resolve are
/// dropped on creation.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateGame {
    #[validate(custom(function = "validate_name"))]
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    /// Defaults to 0 if omitted.
    #[serde(default)]
    #[validate(custom(function = "validate_price"))]
    pub price: Decimal,
    #[serde(default)]
    pub character_ids: Vec<EntityId>,
    #[serde(default)]
    pub images: Vec<String>,
}

/// DTO for replacing a game. Every field is written; omitted lists become
/// empty.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGame {
    #[validate(custom(function = "validate_name"))]
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "validate_price"))]
    pub price: Decimal,
    #[serde(default)]
    pub character_ids: Vec<EntityId>,
    #[serde(default)]
    pub images: Vec<String>,
}

impl From<CreateGame> for Game {
    fn from(input: CreateGame) -> Self {
        Self {
            id: String::new(),
            name: input.name,
            description: input.description,
            category: input.category,
            price: input.price,
            character_ids: input.character_ids,
            images: input.images,
        }
    }
}

impl UpdateGame {
    /// The replacement record for the game stored under `id`.
    pub fn into_game(self, id: &str) -> Game {
        Game {
            id: id.to_string(),
            name: self.name,
            description: self.description,
            category: self.category,
            price: self.price,
            character_ids: self.character_ids,
            images: self.images,
        }
    }
}

impl Linked for Game {
    const KIND: EntityKind = EntityKind::Game;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }

    fn peer_ids(&self) -> &[EntityId] {
        &self.character_ids
    }

    fn peer_ids_mut(&mut self) -> &mut Vec<EntityId> {
        &mut self.character_ids
    }

    fn images(&self) -> &[String] {
        &self.images
    }

    fn images_mut(&mut self) -> &mut Vec<String> {
        &mut self.images
    }

    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![Some(&self.name), self.category.as_deref()]
    }
}
