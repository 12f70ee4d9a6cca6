use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, UserDto};
use crate::api::validation::{require, validate_id, validate_name};
use crate::db::{CredentialError, NewUser};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub role: Option<String>,
    pub avatar_url: Option<String>,
    pub name: Option<String>,
    pub alias: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub role: Option<String>,
    pub avatar_url: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PasswordChangeRequest {
    pub current: Option<String>,
    #[serde(rename = "new")]
    pub new_password: Option<String>,
    pub confirm: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AliasRequest {
    pub alias: Option<String>,
}

pub async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<UserDto>>>, ApiError> {
    let users = state.store().list_users().await?;

    Ok(Json(ApiResponse::success(
        "Users retrieved successfully",
        users.into_iter().map(UserDto::from).collect::<Vec<_>>(),
    )))
}

pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    validate_id(id)?;

    let Some(user) = state.store().get_user(id).await? else {
        return Err(ApiError::not_found("User", id));
    };

    Ok(Json(ApiResponse::success(
        "User retrieved successfully",
        UserDto::from(user),
    )))
}

pub async fn register_user(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserDto>>), ApiError> {
    let role = require(req.role, "role")?;
    let name = require(req.name, "name")?;
    let alias = require(req.alias, "alias")?;
    let email = require(req.email, "email")?;
    let password = require(req.password, "password")?;

    validate_name(&name)?;
    validate_name(&alias)?;

    if state
        .store()
        .find_user_by_alias_or_email(&alias, &email)
        .await?
        .is_some()
    {
        return Err(ApiError::conflict("Alias or email already registered"));
    }

    let security = state.config().read().await.security.clone();

    let created = state
        .store()
        .register_user(
            NewUser {
                role,
                avatar_url: req.avatar_url,
                name,
                alias,
                email,
                password,
            },
            &security,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            "User registered successfully",
            UserDto::from(created),
        )),
    ))
}

pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    validate_id(id)?;

    let role = require(req.role, "role")?;
    let name = require(req.name, "name")?;
    validate_name(&name)?;

    let Some(updated) = state
        .store()
        .update_user_profile(id, role, req.avatar_url, name)
        .await?
    else {
        return Err(ApiError::not_found("User", id));
    };

    Ok(Json(ApiResponse::success(
        "User updated successfully",
        UserDto::from(updated),
    )))
}

/// Verifies the current password before any write; a mismatch leaves the
/// stored hash untouched.
pub async fn change_password(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(req): Json<PasswordChangeRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    validate_id(id)?;

    let current = require(req.current, "current")?;
    let new_password = require(req.new_password, "new")?;
    let confirm = require(req.confirm, "confirm")?;

    if new_password != confirm {
        return Err(ApiError::validation("New passwords do not match"));
    }

    let security = state.config().read().await.security.clone();

    state
        .store()
        .change_password(id, &current, &new_password, &security)
        .await
        .map_err(|e| match e {
            CredentialError::UserNotFound => ApiError::not_found("User", id),
            CredentialError::WrongPassword => {
                ApiError::unauthorized("Current password is incorrect")
            }
            CredentialError::Database(msg) => ApiError::DatabaseError(msg),
            CredentialError::Internal(msg) => ApiError::internal(msg),
        })?;

    Ok(Json(ApiResponse::message("Password updated successfully")))
}

pub async fn change_alias(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(req): Json<AliasRequest>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    validate_id(id)?;

    let alias = require(req.alias, "alias")?;
    validate_name(&alias)?;

    if let Some(existing) = state.store().find_user_by_alias(&alias).await?
        && existing.id != id
    {
        return Err(ApiError::conflict("Alias already registered"));
    }

    let Some(updated) = state.store().update_user_alias(id, alias).await? else {
        return Err(ApiError::not_found("User", id));
    };

    Ok(Json(ApiResponse::success(
        "Alias updated successfully",
        UserDto::from(updated),
    )))
}
