//! The two catalog record kinds and the trait that lets generic code work on
//! either of them.

use std::fmt;

use crate::types::EntityId;

/// Which side of the game/character relationship a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Game,
    Character,
}

impl EntityKind {
    /// Human-readable label used in error messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Game => "Game",
            Self::Character => "Character",
        }
    }

    /// Folder name of this kind inside the image namespace.
    pub fn folder(self) -> &'static str {
        match self {
            Self::Game => "games",
            Self::Character => "characters",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A persisted record holding a list of peer ids and a list of image
/// references.
///
/// Records are plain values loaded fresh for every operation; links between
/// kinds are ids only, never in-memory references.
pub trait Linked: Clone + Send + Sync + 'static {
    const KIND: EntityKind;

    fn id(&self) -> &str;

    /// Overwrite the id. Only stores call this, when assigning a new one.
    fn set_id(&mut self, id: EntityId);

    fn peer_ids(&self) -> &[EntityId];

    fn peer_ids_mut(&mut self) -> &mut Vec<EntityId>;

    fn images(&self) -> &[String];

    fn images_mut(&mut self) -> &mut Vec<String>;

    /// Text fields matched by the list endpoint's `search` filter.
    fn search_fields(&self) -> Vec<Option<&str>>;
}
