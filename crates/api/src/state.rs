use std::sync::Arc;

use gamevault_core::catalog::CatalogService;
use gamevault_core::images::ImageArchive;
use gamevault_core::store::{DynStore, StoreError};
use gamevault_db::models::character::Character;
use gamevault_db::models::game::Game;
use gamevault_db::repositories::{CharacterRepo, GameRepo};

use crate::config::ServerConfig;

/// Games and the characters they reference.
pub type GameService = CatalogService<Game, Character>;

/// Characters and the games they reference.
pub type CharacterService = CatalogService<Character, Game>;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: gamevault_db::DbPool,
    pub config: Arc<ServerConfig>,
    pub games: Arc<GameService>,
    pub characters: Arc<CharacterService>,
}

impl AppState {
    /// Wire both services over the configured tables and a shared image
    /// archive rooted at `config.web_root`.
    pub fn new(pool: gamevault_db::DbPool, config: ServerConfig) -> Result<Self, StoreError> {
        let games: DynStore<Game> = Arc::new(GameRepo::new(
            pool.clone(),
            &config.database.games_collection,
        )?);
        let characters: DynStore<Character> = Arc::new(CharacterRepo::new(
            pool.clone(),
            &config.database.characters_collection,
        )?);
        let images = Arc::new(ImageArchive::new(config.web_root.clone()));

        Ok(Self {
            pool,
            games: Arc::new(CatalogService::new(
                Arc::clone(&games),
                Arc::clone(&characters),
                Arc::clone(&images),
            )),
            characters: Arc::new(CatalogService::new(characters, games, images)),
            config: Arc::new(config),
        })
    }
}
