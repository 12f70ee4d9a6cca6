use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, TitleDto, TitleSummaryDto};
use crate::api::validation::{require, validate_id, validate_name};
use crate::db::TitleInput;

#[derive(Debug, Deserialize)]
pub struct TitleRequest {
    pub id: Option<i32>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub release_date: Option<String>,
    pub image_url: Option<String>,
    pub seasons: Option<i32>,
}

impl TitleRequest {
    fn into_input(self) -> Result<TitleInput, ApiError> {
        let name = require(self.name, "name")?;
        validate_name(&name)?;

        Ok(TitleInput {
            name,
            description: self.description,
            release_date: self.release_date,
            image_url: self.image_url,
            seasons: self.seasons,
        })
    }
}

pub async fn list_titles(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<TitleDto>>>, ApiError> {
    let rows = state.store().list_titles().await?;

    let titles: Vec<TitleDto> = rows
        .into_iter()
        .map(|(title, genres)| TitleDto::from_parts(title, genres))
        .collect();

    Ok(Json(ApiResponse::success(
        "Titles retrieved successfully",
        titles,
    )))
}

pub async fn get_title(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<TitleDto>>, ApiError> {
    validate_id(id)?;

    let Some((title, genres)) = state.store().get_title_with_genres(id).await? else {
        return Err(ApiError::not_found("Title", id));
    };

    Ok(Json(ApiResponse::success(
        "Title retrieved successfully",
        TitleDto::from_parts(title, genres),
    )))
}

pub async fn create_title(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TitleRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TitleDto>>), ApiError> {
    let input = req.into_input()?;

    if state
        .store()
        .find_title_by_name(&input.name)
        .await?
        .is_some()
    {
        return Err(ApiError::conflict(format!(
            "Title '{}' already exists",
            input.name
        )));
    }

    let created = state.store().insert_title(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            "Title created successfully",
            TitleDto::from_parts(created, Vec::new()),
        )),
    ))
}

/// Create-or-update: a body carrying an `id` selects update, otherwise the
/// request behaves like a create.
pub async fn upsert_title(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TitleRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TitleDto>>), ApiError> {
    match req.id {
        Some(id) => {
            validate_id(id)?;
            let input = req.into_input()?;

            let Some(updated) = state.store().update_title(id, input).await? else {
                return Err(ApiError::not_found("Title", id));
            };

            let genres = state
                .store()
                .get_title_with_genres(id)
                .await?
                .map(|(_, genres)| genres)
                .unwrap_or_default();

            Ok((
                StatusCode::OK,
                Json(ApiResponse::success(
                    "Title updated successfully",
                    TitleDto::from_parts(updated, genres),
                )),
            ))
        }
        None => create_title(State(state), Json(req)).await,
    }
}

pub async fn delete_title(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<TitleSummaryDto>>, ApiError> {
    validate_id(id)?;

    let Some(removed) = state.store().remove_title(id).await? else {
        return Err(ApiError::not_found("Title", id));
    };

    let message = format!("{} deleted along with all its relations", removed.name);
    Ok(Json(ApiResponse::success(
        message,
        TitleSummaryDto::from(removed),
    )))
}
