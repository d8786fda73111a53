//! Minimal record types for exercising the generic code in unit tests.

use crate::entity::{EntityKind, Linked};
use crate::types::EntityId;

#[derive(Debug, Clone, Default)]
pub struct TestGame {
    pub id: EntityId,
    pub name: String,
    pub category: Option<String>,
    pub character_ids: Vec<EntityId>,
    pub images: Vec<String>,
}

impl TestGame {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }
}

impl Linked for TestGame {
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

#[derive(Debug, Clone, Default)]
pub struct TestCharacter {
    pub id: EntityId,
    pub name: String,
    pub game_ids: Vec<EntityId>,
    pub images: Vec<String>,
}

impl TestCharacter {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }
}

impl Linked for TestCharacter {
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

    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![Some(&self.name)]
    }
}
