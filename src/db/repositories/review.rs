use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::info;

use crate::entities::{prelude::*, review, review_title, user_review};

/// Field set accepted by review creation. Likes start at zero and the date is
/// stamped at insert time.
#[derive(Debug, Clone)]
pub struct ReviewInput {
    pub title_id: i32,
    pub user_id: i32,
    pub comment: Option<String>,
    pub rating: i32,
    pub spoiler: bool,
}

/// Full-row update for an existing review.
#[derive(Debug, Clone)]
pub struct ReviewUpdate {
    pub comment: Option<String>,
    pub rating: i32,
    pub likes: i32,
    pub date: String,
    pub spoiler: bool,
}

pub struct ReviewRepository {
    conn: DatabaseConnection,
}

impl ReviewRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self) -> Result<Vec<review::Model>> {
        Review::find()
            .order_by_desc(review::Column::Date)
            .all(&self.conn)
            .await
            .context("Failed to list reviews")
    }

    pub async fn get(&self, id: i32) -> Result<Option<review::Model>> {
        Review::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query review by ID")
    }

    /// The review a user holds for a title, if any. A review belongs to a
    /// title through `review_title` and to a user through `user_review`, so
    /// both link tables are consulted.
    pub async fn find_by_user_and_title(
        &self,
        user_id: i32,
        title_id: i32,
    ) -> Result<Option<review::Model>> {
        let review_ids: Vec<i32> = review_title::Entity::find()
            .filter(review_title::Column::TitleId.eq(title_id))
            .all(&self.conn)
            .await
            .context("Failed to query review links for title")?
            .into_iter()
            .map(|link| link.review_id)
            .collect();

        if review_ids.is_empty() {
            return Ok(None);
        }

        let Some(link) = user_review::Entity::find()
            .filter(user_review::Column::UserId.eq(user_id))
            .filter(user_review::Column::ReviewId.is_in(review_ids))
            .one(&self.conn)
            .await
            .context("Failed to query user review link")?
        else {
            return Ok(None);
        };

        self.get(link.review_id).await
    }

    /// Inserts the review row and both of its link rows in one transaction.
    /// A review without its title and user links is never visible.
    pub async fn create(&self, input: ReviewInput) -> Result<review::Model> {
        let today = chrono::Utc::now().date_naive().to_string();

        let txn = self
            .conn
            .begin()
            .await
            .context("Failed to open review transaction")?;

        let created = review::ActiveModel {
            comment: Set(input.comment),
            rating: Set(input.rating),
            likes: Set(0),
            date: Set(today),
            spoiler: Set(input.spoiler),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        review_title::ActiveModel {
            review_id: Set(created.id),
            title_id: Set(input.title_id),
        }
        .insert(&txn)
        .await?;

        user_review::ActiveModel {
            user_id: Set(input.user_id),
            review_id: Set(created.id),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        info!(
            "Added review {} for title {} by user {}",
            created.id, input.title_id, input.user_id
        );
        Ok(created)
    }

    pub async fn update(&self, id: i32, update: ReviewUpdate) -> Result<Option<review::Model>> {
        let Some(existing) = self.get(id).await? else {
            return Ok(None);
        };

        let mut active: review::ActiveModel = existing.into();
        active.comment = Set(update.comment);
        active.rating = Set(update.rating);
        active.likes = Set(update.likes);
        active.date = Set(update.date);
        active.spoiler = Set(update.spoiler);

        let updated = active
            .update(&self.conn)
            .await
            .context("Failed to update review")?;

        Ok(Some(updated))
    }

    pub async fn update_comment(&self, id: i32, comment: String) -> Result<Option<review::Model>> {
        let Some(existing) = self.get(id).await? else {
            return Ok(None);
        };

        let mut active: review::ActiveModel = existing.into();
        active.comment = Set(Some(comment));

        let updated = active
            .update(&self.conn)
            .await
            .context("Failed to update review comment")?;

        Ok(Some(updated))
    }

    /// Removes the review together with its user and title link rows.
    pub async fn remove(&self, id: i32) -> Result<Option<review::Model>> {
        let Some(existing) = self.get(id).await? else {
            return Ok(None);
        };

        let txn = self
            .conn
            .begin()
            .await
            .context("Failed to open review delete transaction")?;

        user_review::Entity::delete_many()
            .filter(user_review::Column::ReviewId.eq(id))
            .exec(&txn)
            .await?;

        review_title::Entity::delete_many()
            .filter(review_title::Column::ReviewId.eq(id))
            .exec(&txn)
            .await?;

        Review::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;

        info!("Removed review {}", id);
        Ok(Some(existing))
    }
}
