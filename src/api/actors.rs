use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ActorDto, ApiError, ApiResponse, AppState};
use crate::api::validation::{require, validate_id, validate_name};
use crate::db::ActorInput;

#[derive(Debug, Deserialize)]
pub struct ActorRequest {
    pub name: Option<String>,
    pub photo_url: Option<String>,
    pub nationality: Option<String>,
    pub birth_date: Option<String>,
}

impl ActorRequest {
    fn into_input(self) -> Result<ActorInput, ApiError> {
        let name = require(self.name, "name")?;
        validate_name(&name)?;

        Ok(ActorInput {
            name,
            photo_url: self.photo_url,
            nationality: self.nationality,
            birth_date: self.birth_date,
        })
    }
}

pub async fn list_actors(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<ActorDto>>>, ApiError> {
    let actors = state.store().list_actors().await?;

    Ok(Json(ApiResponse::success(
        "Actors retrieved successfully",
        actors.into_iter().map(ActorDto::from).collect::<Vec<_>>(),
    )))
}

pub async fn get_actor(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<ActorDto>>, ApiError> {
    validate_id(id)?;

    let Some(actor) = state.store().get_actor(id).await? else {
        return Err(ApiError::not_found("Actor", id));
    };

    Ok(Json(ApiResponse::success(
        "Actor retrieved successfully",
        ActorDto::from(actor),
    )))
}

pub async fn create_actor(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ActorRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ActorDto>>), ApiError> {
    let input = req.into_input()?;
    let created = state.store().insert_actor(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            "Actor created successfully",
            ActorDto::from(created),
        )),
    ))
}

pub async fn update_actor(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(req): Json<ActorRequest>,
) -> Result<Json<ApiResponse<ActorDto>>, ApiError> {
    validate_id(id)?;
    let input = req.into_input()?;

    let Some(updated) = state.store().update_actor(id, input).await? else {
        return Err(ApiError::not_found("Actor", id));
    };

    Ok(Json(ApiResponse::success(
        "Actor updated successfully",
        ActorDto::from(updated),
    )))
}

pub async fn delete_actor(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<ActorDto>>, ApiError> {
    validate_id(id)?;

    let Some(removed) = state.store().remove_actor(id).await? else {
        return Err(ApiError::not_found("Actor", id));
    };

    Ok(Json(ApiResponse::success(
        "Actor deleted successfully",
        ActorDto::from(removed),
    )))
}
