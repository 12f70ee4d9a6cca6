use axum::{
    Router,
    http::HeaderValue,
    routing::{delete, get, patch, post, put},
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::state::SharedState;

mod actors;
mod directors;
mod error;
mod genres;
mod reviews;
mod titles;
mod types;
mod users;
mod validation;

pub use error::ApiError;
pub use types::*;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Arc<RwLock<Config>> {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }
}

pub async fn create_app_state(shared: Arc<SharedState>) -> anyhow::Result<Arc<AppState>> {
    Ok(Arc::new(AppState { shared }))
}

pub async fn create_app_state_from_config(config: Config) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    create_app_state(shared).await
}

pub async fn router(state: Arc<AppState>) -> Router {
    let cors_origins = {
        let config = state.config().read().await;
        config.server.cors_allowed_origins.clone()
    };

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .route("/movies", get(titles::list_titles))
        .route("/movies", post(titles::create_title))
        .route("/movies", put(titles::upsert_title))
        .route("/movies/{id}", get(titles::get_title))
        .route("/movies/{id}", delete(titles::delete_title))
        .route("/actors", get(actors::list_actors))
        .route("/actors", post(actors::create_actor))
        .route("/actors/{id}", get(actors::get_actor))
        .route("/actors/{id}", put(actors::update_actor))
        .route("/actors/{id}", delete(actors::delete_actor))
        .route("/directors", get(directors::list_directors))
        .route("/directors/{id}", get(directors::get_director))
        .route("/directors/{id}", patch(directors::update_director))
        .route("/directors/{id}/movies", get(directors::director_titles))
        .route("/genres", post(genres::create_genre))
        .route("/genres/{id}", delete(genres::delete_genre))
        .route("/reviews", get(reviews::list_reviews))
        .route("/reviews", post(reviews::create_review))
        .route("/reviews/{id}", get(reviews::get_review))
        .route("/reviews/{id}", put(reviews::update_review))
        .route("/reviews/{id}", delete(reviews::delete_review))
        .route(
            "/reviews/{id}/comentario",
            patch(reviews::update_review_comment),
        )
        .route("/usuarios", get(users::list_users))
        .route("/usuarios/register", post(users::register_user))
        .route("/usuarios/{id}", get(users::get_user))
        .route("/usuarios/{id}", put(users::update_user))
        .route("/usuarios/{id}/password", patch(users::change_password))
        .route("/usuarios/{id}/alias", patch(users::change_alias))
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
