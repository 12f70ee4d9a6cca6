use anyhow::{Context, Result};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryOrder, Set};

use crate::entities::{director, prelude::*, title};

/// Partial update for a director. An outer `Some` means the field was present
/// in the request body; the inner option carries an explicit null for the
/// nullable columns.
#[derive(Debug, Clone, Default)]
pub struct DirectorPatch {
    pub name: Option<String>,
    pub photo_url: Option<Option<String>>,
    pub nationality: Option<Option<String>>,
    pub birth_date: Option<Option<String>>,
}

pub struct DirectorRepository {
    conn: DatabaseConnection,
}

impl DirectorRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self) -> Result<Vec<director::Model>> {
        Director::find()
            .order_by_asc(director::Column::Name)
            .all(&self.conn)
            .await
            .context("Failed to list directors")
    }

    pub async fn get(&self, id: i32) -> Result<Option<director::Model>> {
        Director::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query director by ID")
    }

    pub async fn apply_patch(
        &self,
        id: i32,
        patch: DirectorPatch,
    ) -> Result<Option<director::Model>> {
        let Some(existing) = self.get(id).await? else {
            return Ok(None);
        };

        let mut active: director::ActiveModel = existing.into();
        if let Some(name) = patch.name {
            active.name = Set(name);
        }
        if let Some(photo_url) = patch.photo_url {
            active.photo_url = Set(photo_url);
        }
        if let Some(nationality) = patch.nationality {
            active.nationality = Set(nationality);
        }
        if let Some(birth_date) = patch.birth_date {
            active.birth_date = Set(birth_date);
        }

        let updated = active
            .update(&self.conn)
            .await
            .context("Failed to update director")?;

        Ok(Some(updated))
    }

    /// Titles linked to the director, newest first.
    pub async fn titles_for(&self, director: &director::Model) -> Result<Vec<title::Model>> {
        director
            .find_related(Title)
            .order_by_desc(title::Column::ReleaseDate)
            .all(&self.conn)
            .await
            .context("Failed to list titles for director")
    }
}
