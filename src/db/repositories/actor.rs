use anyhow::{Context, Result};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};
use tracing::info;

use crate::entities::{actor, prelude::*};

/// Field set accepted by actor create and update.
#[derive(Debug, Clone)]
pub struct ActorInput {
    pub name: String,
    pub photo_url: Option<String>,
    pub nationality: Option<String>,
    pub birth_date: Option<String>,
}

pub struct ActorRepository {
    conn: DatabaseConnection,
}

impl ActorRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self) -> Result<Vec<actor::Model>> {
        Actor::find()
            .order_by_asc(actor::Column::Name)
            .all(&self.conn)
            .await
            .context("Failed to list actors")
    }

    pub async fn get(&self, id: i32) -> Result<Option<actor::Model>> {
        Actor::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query actor by ID")
    }

    pub async fn insert(&self, input: ActorInput) -> Result<actor::Model> {
        let active = actor::ActiveModel {
            name: Set(input.name),
            photo_url: Set(input.photo_url),
            nationality: Set(input.nationality),
            birth_date: Set(input.birth_date),
            ..Default::default()
        };

        let created = active
            .insert(&self.conn)
            .await
            .context("Failed to insert actor")?;

        info!("Added actor: {}", created.name);
        Ok(created)
    }

    pub async fn update(&self, id: i32, input: ActorInput) -> Result<Option<actor::Model>> {
        let Some(existing) = self.get(id).await? else {
            return Ok(None);
        };

        let mut active: actor::ActiveModel = existing.into();
        active.name = Set(input.name);
        active.photo_url = Set(input.photo_url);
        active.nationality = Set(input.nationality);
        active.birth_date = Set(input.birth_date);

        let updated = active
            .update(&self.conn)
            .await
            .context("Failed to update actor")?;

        Ok(Some(updated))
    }

    /// Returns the pre-deletion snapshot, or `None` when the id is unknown.
    pub async fn remove(&self, id: i32) -> Result<Option<actor::Model>> {
        let Some(existing) = self.get(id).await? else {
            return Ok(None);
        };

        Actor::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete actor")?;

        info!("Removed actor: {}", existing.name);
        Ok(Some(existing))
    }
}
