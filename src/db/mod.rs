use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::SecurityConfig;
use crate::entities::{actor, director, genre, review, title};

pub mod migrator;
pub mod repositories;

pub use repositories::actor::ActorInput;
pub use repositories::director::DirectorPatch;
pub use repositories::review::{ReviewInput, ReviewUpdate};
pub use repositories::title::TitleInput;
pub use repositories::user::{CredentialError, NewUser, User};

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let in_memory = db_url.contains(":memory:");

        if !in_memory {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        // An in-memory sqlite database exists per connection; more than one
        // pooled connection would each see an empty schema.
        let max_connections = if in_memory { 1 } else { max_connections };
        let min_connections = min_connections.min(max_connections);

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn title_repo(&self) -> repositories::title::TitleRepository {
        repositories::title::TitleRepository::new(self.conn.clone())
    }

    fn actor_repo(&self) -> repositories::actor::ActorRepository {
        repositories::actor::ActorRepository::new(self.conn.clone())
    }

    fn director_repo(&self) -> repositories::director::DirectorRepository {
        repositories::director::DirectorRepository::new(self.conn.clone())
    }

    fn genre_repo(&self) -> repositories::genre::GenreRepository {
        repositories::genre::GenreRepository::new(self.conn.clone())
    }

    fn review_repo(&self) -> repositories::review::ReviewRepository {
        repositories::review::ReviewRepository::new(self.conn.clone())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    pub async fn list_titles(&self) -> Result<Vec<(title::Model, Vec<genre::Model>)>> {
        self.title_repo().list_with_genres().await
    }

    pub async fn get_title(&self, id: i32) -> Result<Option<title::Model>> {
        self.title_repo().get(id).await
    }

    pub async fn get_title_with_genres(
        &self,
        id: i32,
    ) -> Result<Option<(title::Model, Vec<genre::Model>)>> {
        self.title_repo().get_with_genres(id).await
    }

    pub async fn find_title_by_name(&self, name: &str) -> Result<Option<title::Model>> {
        self.title_repo().find_by_name(name).await
    }

    pub async fn insert_title(&self, input: TitleInput) -> Result<title::Model> {
        self.title_repo().insert(input).await
    }

    pub async fn update_title(&self, id: i32, input: TitleInput) -> Result<Option<title::Model>> {
        self.title_repo().update(id, input).await
    }

    pub async fn remove_title(&self, id: i32) -> Result<Option<title::Model>> {
        self.title_repo().remove(id).await
    }

    pub async fn list_actors(&self) -> Result<Vec<actor::Model>> {
        self.actor_repo().list().await
    }

    pub async fn get_actor(&self, id: i32) -> Result<Option<actor::Model>> {
        self.actor_repo().get(id).await
    }

    pub async fn insert_actor(&self, input: ActorInput) -> Result<actor::Model> {
        self.actor_repo().insert(input).await
    }

    pub async fn update_actor(&self, id: i32, input: ActorInput) -> Result<Option<actor::Model>> {
        self.actor_repo().update(id, input).await
    }

    pub async fn remove_actor(&self, id: i32) -> Result<Option<actor::Model>> {
        self.actor_repo().remove(id).await
    }

    pub async fn list_directors(&self) -> Result<Vec<director::Model>> {
        self.director_repo().list().await
    }

    pub async fn get_director(&self, id: i32) -> Result<Option<director::Model>> {
        self.director_repo().get(id).await
    }

    pub async fn patch_director(
        &self,
        id: i32,
        patch: DirectorPatch,
    ) -> Result<Option<director::Model>> {
        self.director_repo().apply_patch(id, patch).await
    }

    pub async fn director_titles(&self, director: &director::Model) -> Result<Vec<title::Model>> {
        self.director_repo().titles_for(director).await
    }

    pub async fn get_genre(&self, id: i32) -> Result<Option<genre::Model>> {
        self.genre_repo().get(id).await
    }

    pub async fn find_genre_by_name(&self, name: &str) -> Result<Option<genre::Model>> {
        self.genre_repo().find_by_name(name).await
    }

    pub async fn insert_genre(&self, name: String) -> Result<genre::Model> {
        self.genre_repo().insert(name).await
    }

    pub async fn genre_link_count(&self, id: i32) -> Result<u64> {
        self.genre_repo().link_count(id).await
    }

    pub async fn remove_genre(&self, id: i32) -> Result<Option<genre::Model>> {
        self.genre_repo().remove(id).await
    }

    pub async fn list_reviews(&self) -> Result<Vec<review::Model>> {
        self.review_repo().list().await
    }

    pub async fn get_review(&self, id: i32) -> Result<Option<review::Model>> {
        self.review_repo().get(id).await
    }

    pub async fn find_review_by_user_and_title(
        &self,
        user_id: i32,
        title_id: i32,
    ) -> Result<Option<review::Model>> {
        self.review_repo()
            .find_by_user_and_title(user_id, title_id)
            .await
    }

    pub async fn create_review(&self, input: ReviewInput) -> Result<review::Model> {
        self.review_repo().create(input).await
    }

    pub async fn update_review(
        &self,
        id: i32,
        update: ReviewUpdate,
    ) -> Result<Option<review::Model>> {
        self.review_repo().update(id, update).await
    }

    pub async fn update_review_comment(
        &self,
        id: i32,
        comment: String,
    ) -> Result<Option<review::Model>> {
        self.review_repo().update_comment(id, comment).await
    }

    pub async fn remove_review(&self, id: i32) -> Result<Option<review::Model>> {
        self.review_repo().remove(id).await
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.user_repo().list().await
    }

    pub async fn get_user(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get(id).await
    }

    pub async fn find_user_by_alias_or_email(
        &self,
        alias: &str,
        email: &str,
    ) -> Result<Option<User>> {
        self.user_repo().find_by_alias_or_email(alias, email).await
    }

    pub async fn find_user_by_alias(&self, alias: &str) -> Result<Option<User>> {
        self.user_repo().find_by_alias(alias).await
    }

    pub async fn register_user(&self, new_user: NewUser, config: &SecurityConfig) -> Result<User> {
        self.user_repo().register(new_user, config).await
    }

    pub async fn update_user_profile(
        &self,
        id: i32,
        role: String,
        avatar_url: Option<String>,
        name: String,
    ) -> Result<Option<User>> {
        self.user_repo()
            .update_profile(id, role, avatar_url, name)
            .await
    }

    pub async fn update_user_alias(&self, id: i32, alias: String) -> Result<Option<User>> {
        self.user_repo().update_alias(id, alias).await
    }

    pub async fn change_password(
        &self,
        id: i32,
        current: &str,
        new_password: &str,
        config: &SecurityConfig,
    ) -> Result<(), CredentialError> {
        self.user_repo()
            .change_password(id, current, new_password, config)
            .await
    }
}
