//! Domain logic for the game/character catalog.
//!
//! Nothing in this crate talks to a database driver directly: persistence is
//! reached through the [`store::EntityStore`] trait, which `gamevault-db`
//! implements for PostgreSQL and [`store::MemoryStore`] implements in memory.

pub mod catalog;
pub mod entity;
pub mod error;
pub mod images;
pub mod relationship;
pub mod search;
pub mod store;
pub mod types;

#[cfg(test)]
mod fixtures;
