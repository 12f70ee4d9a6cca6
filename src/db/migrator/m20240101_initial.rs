use crate::entities::prelude::*;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Schema;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        manager
            .create_table(
                schema
                    .create_table_from_entity(Genre)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Actor)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Director)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(User)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Title)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Review)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(TitleGenre)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(TitleActor)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(TitleDirector)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(UserTitle)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(ReviewTitle)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(UserReview)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserReview).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ReviewTitle).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserTitle).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TitleDirector).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TitleActor).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TitleGenre).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Review).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Title).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(User).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Director).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Actor).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Genre).to_owned())
            .await?;

        Ok(())
    }
}
