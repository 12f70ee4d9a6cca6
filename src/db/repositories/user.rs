use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use thiserror::Error;
use tokio::task;
use tracing::info;

use crate::config::SecurityConfig;
use crate::entities::user;

/// User data returned from the repository (without the password hash)
#[derive(Debug, Clone)]
pub struct User {
    pub id: i32,
    pub role: String,
    pub avatar_url: Option<String>,
    pub name: String,
    pub alias: String,
    pub email: String,
    pub registered_at: String,
}

impl From<user::Model> for User {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            role: model.role,
            avatar_url: model.avatar_url,
            name: model.name,
            alias: model.alias,
            email: model.email,
            registered_at: model.registered_at,
        }
    }
}

/// Field set accepted by registration. The password arrives in the clear and
/// is hashed before it touches the database.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub role: String,
    pub avatar_url: Option<String>,
    pub name: String,
    pub alias: String,
    pub email: String,
    pub password: String,
}

/// Errors raised by the password-change flow.
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("User not found")]
    UserNotFound,

    #[error("Current password is incorrect")]
    WrongPassword,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self) -> Result<Vec<User>> {
        let users = user::Entity::find()
            .order_by_asc(user::Column::Alias)
            .all(&self.conn)
            .await
            .context("Failed to list users")?;

        Ok(users.into_iter().map(User::from).collect())
    }

    pub async fn get(&self, id: i32) -> Result<Option<User>> {
        let found = user::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user by ID")?;

        Ok(found.map(User::from))
    }

    /// Existence probe used by registration: alias and email must both be
    /// free before a row is inserted.
    pub async fn find_by_alias_or_email(&self, alias: &str, email: &str) -> Result<Option<User>> {
        let found = user::Entity::find()
            .filter(
                Condition::any()
                    .add(user::Column::Alias.eq(alias))
                    .add(user::Column::Email.eq(email)),
            )
            .one(&self.conn)
            .await
            .context("Failed to query user by alias or email")?;

        Ok(found.map(User::from))
    }

    pub async fn find_by_alias(&self, alias: &str) -> Result<Option<User>> {
        let found = user::Entity::find()
            .filter(user::Column::Alias.eq(alias))
            .one(&self.conn)
            .await
            .context("Failed to query user by alias")?;

        Ok(found.map(User::from))
    }

    pub async fn register(&self, new_user: NewUser, config: &SecurityConfig) -> Result<User> {
        let password = new_user.password;
        let config = config.clone();
        let password_hash = task::spawn_blocking(move || hash_password(&password, Some(&config)))
            .await
            .context("Password hashing task panicked")??;

        let today = chrono::Utc::now().date_naive().to_string();

        let created = user::ActiveModel {
            role: Set(new_user.role),
            avatar_url: Set(new_user.avatar_url),
            name: Set(new_user.name),
            alias: Set(new_user.alias),
            email: Set(new_user.email),
            password_hash: Set(password_hash),
            registered_at: Set(today),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .context("Failed to insert user")?;

        info!("Registered user: {}", created.alias);
        Ok(User::from(created))
    }

    pub async fn update_profile(
        &self,
        id: i32,
        role: String,
        avatar_url: Option<String>,
        name: String,
    ) -> Result<Option<User>> {
        let Some(existing) = user::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user for profile update")?
        else {
            return Ok(None);
        };

        let mut active: user::ActiveModel = existing.into();
        active.role = Set(role);
        active.avatar_url = Set(avatar_url);
        active.name = Set(name);

        let updated = active
            .update(&self.conn)
            .await
            .context("Failed to update user profile")?;

        Ok(Some(User::from(updated)))
    }

    pub async fn update_alias(&self, id: i32, alias: String) -> Result<Option<User>> {
        let Some(existing) = user::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user for alias update")?
        else {
            return Ok(None);
        };

        let mut active: user::ActiveModel = existing.into();
        active.alias = Set(alias);

        let updated = active
            .update(&self.conn)
            .await
            .context("Failed to update user alias")?;

        info!("Updated alias for user {}", updated.id);
        Ok(Some(User::from(updated)))
    }

    /// Verifies the current password against the stored hash before writing a
    /// hash of the new one. A failed verification leaves the stored hash
    /// unchanged.
    ///
    /// Note: hashing and verification run under `spawn_blocking` because
    /// Argon2 is CPU-intensive and would stall the async runtime.
    pub async fn change_password(
        &self,
        id: i32,
        current: &str,
        new_password: &str,
        config: &SecurityConfig,
    ) -> Result<(), CredentialError> {
        let user = user::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .map_err(|e| CredentialError::Database(e.to_string()))?
            .ok_or(CredentialError::UserNotFound)?;

        let stored_hash = user.password_hash.clone();
        let current = current.to_string();

        let is_valid = task::spawn_blocking(move || {
            let parsed_hash = PasswordHash::new(&stored_hash)
                .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

            let argon2 = Argon2::default();
            Ok::<bool, anyhow::Error>(
                argon2
                    .verify_password(current.as_bytes(), &parsed_hash)
                    .is_ok(),
            )
        })
        .await
        .map_err(|e| CredentialError::Internal(format!("Verification task panicked: {e}")))?
        .map_err(|e| CredentialError::Internal(e.to_string()))?;

        if !is_valid {
            return Err(CredentialError::WrongPassword);
        }

        let password = new_password.to_string();
        let config = config.clone();
        let new_hash = task::spawn_blocking(move || hash_password(&password, Some(&config)))
            .await
            .map_err(|e| CredentialError::Internal(format!("Hashing task panicked: {e}")))?
            .map_err(|e| CredentialError::Internal(e.to_string()))?;

        let mut active: user::ActiveModel = user.into();
        active.password_hash = Set(new_hash);
        active
            .update(&self.conn)
            .await
            .map_err(|e| CredentialError::Database(e.to_string()))?;

        info!("Updated password for user {}", id);
        Ok(())
    }
}

/// Hash a password using Argon2id with optional custom params.
/// If config is None, uses default params.
pub fn hash_password(password: &str, config: Option<&SecurityConfig>) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let argon2 = if let Some(cfg) = config {
        let params = Params::new(
            cfg.argon2_memory_cost_kib,
            cfg.argon2_time_cost,
            cfg.argon2_parallelism,
            None,
        )
        .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
    } else {
        Argon2::default()
    };

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}
