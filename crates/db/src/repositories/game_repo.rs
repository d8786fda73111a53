//! Repository for the games table.

use async_trait::async_trait;
use gamevault_core::store::{EntityStore, StoreError};
use gamevault_core::types::new_entity_id;
use sqlx::PgPool;

use super::checked_table_name;
use crate::models::game::Game;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, category, price, character_ids, images";

/// Games stored in a configurable table.
#[derive(Clone)]
pub struct GameRepo {
    pool: PgPool,
    table: String,
}

impl GameRepo {
    /// Fails with [`StoreError::InvalidCollection`] if `table` is not a
    /// plain SQL identifier.
    pub fn new(pool: PgPool, table: &str) -> Result<Self, StoreError> {
        Ok(Self {
            pool,
            table: checked_table_name(table)?,
        })
    }
}

#[async_trait]
impl EntityStore<Game> for GameRepo {
    /// All games in insertion order.
    async fn find_all(&self) -> Result<Vec<Game>, StoreError> {
        let query = format!(
            "SELECT {COLUMNS} FROM {} ORDER BY created_at ASC, id ASC",
            self.table
        );
        sqlx::query_as::<_, Game>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::backend)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Game>, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM {} WHERE id = $1", self.table);
        sqlx::query_as::<_, Game>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::backend)
    }

    /// Insert with a freshly generated id, returning the stored row.
    async fn insert(&self, record: Game) -> Result<Game, StoreError> {
        let query = format!(
            "INSERT INTO {} (id, name, description, category, price, character_ids, images)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}",
            self.table
        );
        sqlx::query_as::<_, Game>(&query)
            .bind(new_entity_id())
            .bind(&record.name)
            .bind(&record.description)
            .bind(&record.category)
            .bind(record.price)
            .bind(&record.character_ids)
            .bind(&record.images)
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::backend)
    }

    /// Overwrite every column of the row with `id`. The stored id is kept.
    async fn replace(&self, id: &str, record: &Game) -> Result<bool, StoreError> {
        let query = format!(
            "UPDATE {} SET
                name = $2,
                description = $3,
                category = $4,
                price = $5,
                character_ids = $6,
                images = $7,
                updated_at = NOW()
             WHERE id = $1",
            self.table
        );
        let result = sqlx::query(&query)
            .bind(id)
            .bind(&record.name)
            .bind(&record.description)
            .bind(&record.category)
            .bind(record.price)
            .bind(&record.character_ids)
            .bind(&record.images)
            .execute(&self.pool)
            .await
            .map_err(StoreError::backend)?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let query = format!("DELETE FROM {} WHERE id = $1", self.table);
        let result = sqlx::query(&query)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(StoreError::backend)?;
        Ok(result.rows_affected() > 0)
    }
}
