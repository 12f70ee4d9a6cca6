use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, GenreDto};
use crate::api::validation::{require, validate_id, validate_name};

#[derive(Debug, Deserialize)]
pub struct GenreRequest {
    pub name: Option<String>,
}

pub async fn create_genre(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GenreRequest>,
) -> Result<(StatusCode, Json<ApiResponse<GenreDto>>), ApiError> {
    let name = require(req.name, "name")?;
    let name = validate_name(&name)?.to_string();

    if state.store().find_genre_by_name(&name).await?.is_some() {
        return Err(ApiError::conflict(format!(
            "Genre '{}' already exists",
            name
        )));
    }

    let created = state.store().insert_genre(name).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            "Genre created successfully",
            GenreDto::from(created),
        )),
    ))
}

pub async fn delete_genre(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<GenreDto>>, ApiError> {
    validate_id(id)?;

    if state.store().get_genre(id).await?.is_none() {
        return Err(ApiError::not_found("Genre", id));
    }

    let links = state.store().genre_link_count(id).await?;
    if links > 0 {
        return Err(ApiError::conflict(
            "Genre is still linked to one or more titles",
        ));
    }

    let Some(removed) = state.store().remove_genre(id).await? else {
        return Err(ApiError::not_found("Genre", id));
    };

    Ok(Json(ApiResponse::success(
        "Genre deleted successfully",
        GenreDto::from(removed),
    )))
}
