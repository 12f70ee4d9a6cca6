use sea_orm_migration::prelude::*;

/// The cascade path reads every link table by title id and `user_review` by
/// review id; without these indexes each step is a full table scan.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_title_genre_title")
                    .table(TitleGenre::Table)
                    .col(TitleGenre::TitleId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_title_actor_title")
                    .table(TitleActor::Table)
                    .col(TitleActor::TitleId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_title_director_title")
                    .table(TitleDirector::Table)
                    .col(TitleDirector::TitleId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_user_title_title")
                    .table(UserTitle::Table)
                    .col(UserTitle::TitleId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_review_title_title")
                    .table(ReviewTitle::Table)
                    .col(ReviewTitle::TitleId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_user_review_review")
                    .table(UserReview::Table)
                    .col(UserReview::ReviewId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_user_review_review")
                    .table(UserReview::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_review_title_title")
                    .table(ReviewTitle::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_user_title_title")
                    .table(UserTitle::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_title_director_title")
                    .table(TitleDirector::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_title_actor_title")
                    .table(TitleActor::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_title_genre_title")
                    .table(TitleGenre::Table)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum TitleGenre {
    Table,
    TitleId,
}

#[derive(DeriveIden)]
enum TitleActor {
    Table,
    TitleId,
}

#[derive(DeriveIden)]
enum TitleDirector {
    Table,
    TitleId,
}

#[derive(DeriveIden)]
enum UserTitle {
    Table,
    TitleId,
}

#[derive(DeriveIden)]
enum ReviewTitle {
    Table,
    TitleId,
}

#[derive(DeriveIden)]
enum UserReview {
    Table,
    ReviewId,
}
