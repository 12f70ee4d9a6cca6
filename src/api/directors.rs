use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::{Map, Value};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, DirectorDto, DirectorPatchDto, DirectorTitlesDto};
use crate::api::validation::{validate_id, validate_name};
use crate::db::DirectorPatch;

/// Fields a PATCH request may touch; anything else in the body is ignored.
const ALLOWED_FIELDS: [&str; 4] = ["name", "photo_url", "nationality", "birth_date"];

pub async fn list_directors(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<DirectorDto>>>, ApiError> {
    let directors = state.store().list_directors().await?;

    Ok(Json(ApiResponse::success(
        "Directors retrieved successfully",
        directors
            .into_iter()
            .map(DirectorDto::from)
            .collect::<Vec<_>>(),
    )))
}

pub async fn get_director(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<DirectorDto>>, ApiError> {
    validate_id(id)?;

    let Some(director) = state.store().get_director(id).await? else {
        return Err(ApiError::not_found("Director", id));
    };

    Ok(Json(ApiResponse::success(
        "Director retrieved successfully",
        DirectorDto::from(director),
    )))
}

pub async fn update_director(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(body): Json<Map<String, Value>>,
) -> Result<Json<ApiResponse<DirectorPatchDto>>, ApiError> {
    validate_id(id)?;

    if body.is_empty() {
        return Err(ApiError::validation("No fields to update"));
    }

    let (patch, fields_updated) = build_patch(&body)?;

    if fields_updated.is_empty() {
        return Err(ApiError::validation(format!(
            "No valid fields to update. Allowed fields: {}",
            ALLOWED_FIELDS.join(", ")
        )));
    }

    let Some(updated) = state.store().patch_director(id, patch).await? else {
        return Err(ApiError::not_found("Director", id));
    };

    Ok(Json(ApiResponse::success(
        "Director updated successfully",
        DirectorPatchDto {
            director: DirectorDto::from(updated),
            fields_updated,
        },
    )))
}

pub async fn director_titles(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<DirectorTitlesDto>>, ApiError> {
    validate_id(id)?;

    let Some(director) = state.store().get_director(id).await? else {
        return Err(ApiError::not_found("Director", id));
    };

    let titles = state.store().director_titles(&director).await?;

    let message = if titles.is_empty() {
        "Director has no linked titles"
    } else {
        "Director titles retrieved successfully"
    };

    Ok(Json(ApiResponse::success(
        message,
        DirectorTitlesDto {
            director: director.name,
            count: titles.len(),
            titles: titles.into_iter().map(Into::into).collect(),
        },
    )))
}

/// Intersects the request body with the allow-list and builds the patch from
/// the surviving fields. Unknown keys are skipped, not rejected.
fn build_patch(body: &Map<String, Value>) -> Result<(DirectorPatch, Vec<String>), ApiError> {
    let mut patch = DirectorPatch::default();
    let mut fields_updated = Vec::new();

    for (key, value) in body {
        match key.as_str() {
            "name" => {
                let name = value
                    .as_str()
                    .ok_or_else(|| ApiError::validation("Field 'name' must be a string"))?;
                validate_name(name)?;
                patch.name = Some(name.to_string());
            }
            "photo_url" => patch.photo_url = Some(nullable_string(key, value)?),
            "nationality" => patch.nationality = Some(nullable_string(key, value)?),
            "birth_date" => patch.birth_date = Some(nullable_string(key, value)?),
            _ => continue,
        }
        fields_updated.push(key.clone());
    }

    Ok((patch, fields_updated))
}

fn nullable_string(field: &str, value: &Value) -> Result<Option<String>, ApiError> {
    if value.is_null() {
        return Ok(None);
    }
    value
        .as_str()
        .map(|s| Some(s.to_string()))
        .ok_or_else(|| ApiError::validation(format!("Field '{field}' must be a string or null")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_patch_skips_unknown_fields() {
        let body: Map<String, Value> = serde_json::from_str(
            r#"{"name": "Denis Villeneuve", "hair_color": "brown", "nationality": "Canadian"}"#,
        )
        .unwrap();

        let (patch, fields) = build_patch(&body).unwrap();
        assert_eq!(patch.name.as_deref(), Some("Denis Villeneuve"));
        assert_eq!(patch.nationality, Some(Some("Canadian".to_string())));
        assert!(patch.photo_url.is_none());
        assert_eq!(fields, vec!["name", "nationality"]);
    }

    #[test]
    fn test_build_patch_null_clears_nullable_field() {
        let body: Map<String, Value> = serde_json::from_str(r#"{"photo_url": null}"#).unwrap();

        let (patch, fields) = build_patch(&body).unwrap();
        assert_eq!(patch.photo_url, Some(None));
        assert_eq!(fields, vec!["photo_url"]);
    }

    #[test]
    fn test_build_patch_rejects_non_string_name() {
        let body: Map<String, Value> = serde_json::from_str(r#"{"name": 7}"#).unwrap();
        assert!(build_patch(&body).is_err());
    }

    #[test]
    fn test_build_patch_only_unknown_fields() {
        let body: Map<String, Value> = serde_json::from_str(r#"{"oscars": 2}"#).unwrap();
        let (_, fields) = build_patch(&body).unwrap();
        assert!(fields.is_empty());
    }
}
