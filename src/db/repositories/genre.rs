use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};
use tracing::info;

use crate::entities::{genre, prelude::*, title_genre};

pub struct GenreRepository {
    conn: DatabaseConnection,
}

impl GenreRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get(&self, id: i32) -> Result<Option<genre::Model>> {
        Genre::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query genre by ID")
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<genre::Model>> {
        Genre::find()
            .filter(genre::Column::Name.eq(name))
            .one(&self.conn)
            .await
            .context("Failed to query genre by name")
    }

    pub async fn insert(&self, name: String) -> Result<genre::Model> {
        let active = genre::ActiveModel {
            name: Set(name),
            ..Default::default()
        };

        let created = active
            .insert(&self.conn)
            .await
            .context("Failed to insert genre")?;

        info!("Added genre: {}", created.name);
        Ok(created)
    }

    /// Number of titles still linked to the genre.
    pub async fn link_count(&self, id: i32) -> Result<u64> {
        title_genre::Entity::find()
            .filter(title_genre::Column::GenreId.eq(id))
            .count(&self.conn)
            .await
            .context("Failed to count genre links")
    }

    /// Returns the pre-deletion snapshot, or `None` when the id is unknown.
    pub async fn remove(&self, id: i32) -> Result<Option<genre::Model>> {
        let Some(existing) = self.get(id).await? else {
            return Ok(None);
        };

        Genre::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete genre")?;

        info!("Removed genre: {}", existing.name);
        Ok(Some(existing))
    }
}
