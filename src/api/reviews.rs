use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, ReviewDto};
use crate::api::validation::{require, validate_id, validate_rating};
use crate::db::{ReviewInput, ReviewUpdate};

#[derive(Debug, Deserialize)]
pub struct CreateReviewRequest {
    pub title_id: Option<i32>,
    pub user_id: Option<i32>,
    pub rating: Option<i32>,
    pub comment: Option<String>,
    pub spoiler: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateReviewRequest {
    pub comment: Option<String>,
    pub rating: Option<i32>,
    pub likes: Option<i32>,
    pub date: Option<String>,
    pub spoiler: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub comment: Option<String>,
}

pub async fn list_reviews(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<ReviewDto>>>, ApiError> {
    let reviews = state.store().list_reviews().await?;

    Ok(Json(ApiResponse::success(
        "Reviews retrieved successfully",
        reviews.into_iter().map(ReviewDto::from).collect::<Vec<_>>(),
    )))
}

pub async fn get_review(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<ReviewDto>>, ApiError> {
    validate_id(id)?;

    let Some(review) = state.store().get_review(id).await? else {
        return Err(ApiError::not_found("Review", id));
    };

    Ok(Json(ApiResponse::success(
        "Review retrieved successfully",
        ReviewDto::from(review),
    )))
}

/// A review only exists for a known title and user, and a user holds at most
/// one review per title. All checks run before the insert transaction opens.
pub async fn create_review(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateReviewRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ReviewDto>>), ApiError> {
    let title_id = validate_id(require(req.title_id, "title_id")?)?;
    let user_id = validate_id(require(req.user_id, "user_id")?)?;
    let rating = validate_rating(require(req.rating, "rating")?)?;

    if state.store().get_title(title_id).await?.is_none() {
        return Err(ApiError::not_found("Title", title_id));
    }

    if state.store().get_user(user_id).await?.is_none() {
        return Err(ApiError::not_found("User", user_id));
    }

    if state
        .store()
        .find_review_by_user_and_title(user_id, title_id)
        .await?
        .is_some()
    {
        return Err(ApiError::conflict("User already reviewed this title"));
    }

    let created = state
        .store()
        .create_review(ReviewInput {
            title_id,
            user_id,
            comment: req.comment,
            rating,
            spoiler: req.spoiler.unwrap_or(false),
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            "Review created successfully",
            ReviewDto::from(created),
        )),
    ))
}

pub async fn update_review(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(req): Json<UpdateReviewRequest>,
) -> Result<Json<ApiResponse<ReviewDto>>, ApiError> {
    validate_id(id)?;

    let rating = validate_rating(require(req.rating, "rating")?)?;
    let likes = require(req.likes, "likes")?;
    let date = require(req.date, "date")?;
    let spoiler = require(req.spoiler, "spoiler")?;

    let update = ReviewUpdate {
        comment: req.comment,
        rating,
        likes,
        date,
        spoiler,
    };

    let Some(updated) = state.store().update_review(id, update).await? else {
        return Err(ApiError::not_found("Review", id));
    };

    Ok(Json(ApiResponse::success(
        "Review updated successfully",
        ReviewDto::from(updated),
    )))
}

pub async fn update_review_comment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(req): Json<CommentRequest>,
) -> Result<Json<ApiResponse<ReviewDto>>, ApiError> {
    validate_id(id)?;
    let comment = require(req.comment, "comment")?;

    let Some(updated) = state.store().update_review_comment(id, comment).await? else {
        return Err(ApiError::not_found("Review", id));
    };

    Ok(Json(ApiResponse::success(
        "Review comment updated successfully",
        ReviewDto::from(updated),
    )))
}

pub async fn delete_review(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<ReviewDto>>, ApiError> {
    validate_id(id)?;

    let Some(removed) = state.store().remove_review(id).await? else {
        return Err(ApiError::not_found("Review", id));
    };

    Ok(Json(ApiResponse::success(
        "Review deleted successfully",
        ReviewDto::from(removed),
    )))
}
