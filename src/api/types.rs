use serde::Serialize;

use crate::db::User;
use crate::entities::{actor, director, genre, review, title};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            error: None,
        }
    }

    /// Success without a payload.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>, error: Option<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            error,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TitleDto {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub release_date: Option<String>,
    pub image_url: Option<String>,
    pub seasons: i32,
    pub kind: String,
    pub genres: Vec<String>,
}

impl TitleDto {
    #[must_use]
    pub fn from_parts(title: title::Model, genres: Vec<genre::Model>) -> Self {
        let seasons = title.seasons.unwrap_or(0);
        Self {
            id: title.id,
            name: title.name,
            description: title.description,
            release_date: title.release_date,
            image_url: title.image_url,
            seasons,
            kind: kind_for(seasons).to_string(),
            genres: genres.into_iter().map(|g| g.name).collect(),
        }
    }
}

/// Title row without its genre links, used where the links are not loaded
/// (deletion snapshots, per-director listings).
#[derive(Debug, Serialize)]
pub struct TitleSummaryDto {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub release_date: Option<String>,
    pub image_url: Option<String>,
    pub seasons: i32,
    pub kind: String,
}

impl From<title::Model> for TitleSummaryDto {
    fn from(model: title::Model) -> Self {
        let seasons = model.seasons.unwrap_or(0);
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            release_date: model.release_date,
            image_url: model.image_url,
            seasons,
            kind: kind_for(seasons).to_string(),
        }
    }
}

const fn kind_for(seasons: i32) -> &'static str {
    if seasons > 0 { "series" } else { "movie" }
}

#[derive(Debug, Serialize)]
pub struct ActorDto {
    pub id: i32,
    pub name: String,
    pub photo_url: Option<String>,
    pub nationality: Option<String>,
    pub birth_date: Option<String>,
}

impl From<actor::Model> for ActorDto {
    fn from(model: actor::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            photo_url: model.photo_url,
            nationality: model.nationality,
            birth_date: model.birth_date,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DirectorDto {
    pub id: i32,
    pub name: String,
    pub photo_url: Option<String>,
    pub nationality: Option<String>,
    pub birth_date: Option<String>,
}

impl From<director::Model> for DirectorDto {
    fn from(model: director::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            photo_url: model.photo_url,
            nationality: model.nationality,
            birth_date: model.birth_date,
        }
    }
}

/// Result of a director partial update: the updated row plus which of the
/// requested fields were actually applied.
#[derive(Debug, Serialize)]
pub struct DirectorPatchDto {
    pub director: DirectorDto,
    pub fields_updated: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct DirectorTitlesDto {
    pub director: String,
    pub count: usize,
    pub titles: Vec<TitleSummaryDto>,
}

#[derive(Debug, Serialize)]
pub struct GenreDto {
    pub id: i32,
    pub name: String,
}

impl From<genre::Model> for GenreDto {
    fn from(model: genre::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReviewDto {
    pub id: i32,
    pub comment: Option<String>,
    pub rating: i32,
    pub likes: i32,
    pub date: String,
    pub spoiler: bool,
}

impl From<review::Model> for ReviewDto {
    fn from(model: review::Model) -> Self {
        Self {
            id: model.id,
            comment: model.comment,
            rating: model.rating,
            likes: model.likes,
            date: model.date,
            spoiler: model.spoiler,
        }
    }
}

/// User profile as exposed over the API. The password hash never leaves the
/// repository layer.
#[derive(Debug, Serialize)]
pub struct UserDto {
    pub id: i32,
    pub role: String,
    pub avatar_url: Option<String>,
    pub name: String,
    pub alias: String,
    pub email: String,
    pub registered_at: String,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            role: user.role,
            avatar_url: user.avatar_url,
            name: user.name,
            alias: user.alias,
            email: user.email,
            registered_at: user.registered_at,
        }
    }
}
