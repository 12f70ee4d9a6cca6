use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::info;

use crate::entities::{
    genre, prelude::*, review, review_title, title, title_actor, title_director, title_genre,
    user_review, user_title,
};

/// Field set accepted by title create and update.
#[derive(Debug, Clone)]
pub struct TitleInput {
    pub name: String,
    pub description: Option<String>,
    pub release_date: Option<String>,
    pub image_url: Option<String>,
    pub seasons: Option<i32>,
}

pub struct TitleRepository {
    conn: DatabaseConnection,
}

impl TitleRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list_with_genres(&self) -> Result<Vec<(title::Model, Vec<genre::Model>)>> {
        Title::find()
            .find_with_related(Genre)
            .order_by_desc(title::Column::ReleaseDate)
            .all(&self.conn)
            .await
            .context("Failed to list titles")
    }

    pub async fn get_with_genres(
        &self,
        id: i32,
    ) -> Result<Option<(title::Model, Vec<genre::Model>)>> {
        let mut rows = Title::find_by_id(id)
            .find_with_related(Genre)
            .all(&self.conn)
            .await
            .context("Failed to query title by ID")?;

        Ok(if rows.is_empty() {
            None
        } else {
            Some(rows.remove(0))
        })
    }

    pub async fn get(&self, id: i32) -> Result<Option<title::Model>> {
        Title::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query title by ID")
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<title::Model>> {
        Title::find()
            .filter(title::Column::Name.eq(name))
            .one(&self.conn)
            .await
            .context("Failed to query title by name")
    }

    pub async fn insert(&self, input: TitleInput) -> Result<title::Model> {
        let active = title::ActiveModel {
            name: Set(input.name),
            description: Set(input.description),
            release_date: Set(input.release_date),
            image_url: Set(input.image_url),
            seasons: Set(input.seasons),
            ..Default::default()
        };

        let created = active
            .insert(&self.conn)
            .await
            .context("Failed to insert title")?;

        info!("Added title: {}", created.name);
        Ok(created)
    }

    pub async fn update(&self, id: i32, input: TitleInput) -> Result<Option<title::Model>> {
        let Some(existing) = self.get(id).await? else {
            return Ok(None);
        };

        let mut active: title::ActiveModel = existing.into();
        active.name = Set(input.name);
        active.description = Set(input.description);
        active.release_date = Set(input.release_date);
        active.image_url = Set(input.image_url);
        active.seasons = Set(input.seasons);

        let updated = active
            .update(&self.conn)
            .await
            .context("Failed to update title")?;

        Ok(Some(updated))
    }

    /// Removes a title together with every row that references it, or leaves
    /// the database untouched.
    ///
    /// The existence check runs before any transaction is opened; the deletes
    /// all run inside a single transaction. Link rows go first, then reviews
    /// (which are two hops away via `review_title` and `user_review`), then
    /// the title row itself. Any failed step drops the open transaction,
    /// which rolls everything back.
    ///
    /// Returns the pre-deletion snapshot of the title.
    pub async fn remove(&self, id: i32) -> Result<Option<title::Model>> {
        let Some(existing) = self.get(id).await? else {
            return Ok(None);
        };

        let txn = self
            .conn
            .begin()
            .await
            .context("Failed to open delete transaction")?;

        title_genre::Entity::delete_many()
            .filter(title_genre::Column::TitleId.eq(id))
            .exec(&txn)
            .await?;

        title_actor::Entity::delete_many()
            .filter(title_actor::Column::TitleId.eq(id))
            .exec(&txn)
            .await?;

        title_director::Entity::delete_many()
            .filter(title_director::Column::TitleId.eq(id))
            .exec(&txn)
            .await?;

        user_title::Entity::delete_many()
            .filter(user_title::Column::TitleId.eq(id))
            .exec(&txn)
            .await?;

        let review_ids: Vec<i32> = review_title::Entity::find()
            .filter(review_title::Column::TitleId.eq(id))
            .all(&txn)
            .await?
            .into_iter()
            .map(|link| link.review_id)
            .collect();

        if !review_ids.is_empty() {
            user_review::Entity::delete_many()
                .filter(user_review::Column::ReviewId.is_in(review_ids.clone()))
                .exec(&txn)
                .await?;

            review_title::Entity::delete_many()
                .filter(review_title::Column::TitleId.eq(id))
                .exec(&txn)
                .await?;

            review::Entity::delete_many()
                .filter(review::Column::Id.is_in(review_ids))
                .exec(&txn)
                .await?;
        }

        Title::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;

        info!("Removed title {} and all its relations", existing.name);
        Ok(Some(existing))
    }
}
