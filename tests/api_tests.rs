use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use sea_orm::{ActiveModelTrait, Set};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

use cinelog::config::Config;
use cinelog::db::Store;
use cinelog::entities::{director, title_genre};
use cinelog::state::SharedState;

async fn spawn_app() -> (Router, Store) {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();

    let shared = Arc::new(
        SharedState::new(config)
            .await
            .expect("Failed to create shared state"),
    );
    let store = shared.store.clone();

    let state = cinelog::api::create_app_state(shared)
        .await
        .expect("Failed to create app state");

    (cinelog::api::router(state).await, store)
}

async fn request(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);

    let request = if let Some(body) = body {
        builder = builder.header("Content-Type", mime::APPLICATION_JSON.as_ref());
        builder
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap()
    } else {
        builder.body(Body::empty()).unwrap()
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();

    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, body)
}

async fn register_user(app: &Router, alias: &str) -> i64 {
    let (status, body) = request(
        app,
        "POST",
        "/usuarios/register",
        Some(json!({
            "role": "member",
            "name": "Test User",
            "alias": alias,
            "email": format!("{alias}@example.com"),
            "password": "hunter2!",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    body["data"]["id"].as_i64().unwrap()
}

async fn create_title(app: &Router, name: &str) -> i64 {
    let (status, body) = request(
        app,
        "POST",
        "/movies",
        Some(json!({"name": name, "seasons": 0})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    body["data"]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_title_crud_and_duplicate_name() {
    let (app, _) = spawn_app().await;

    let (status, _) = request(
        &app,
        "POST",
        "/movies",
        Some(json!({"description": "no name"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let id = create_title(&app, "X").await;

    let (status, body) = request(&app, "POST", "/movies", Some(json!({"name": "X"}))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);

    let (status, body) = request(&app, "GET", "/movies", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.iter().filter(|t| t["name"] == "X").count(), 1);
    assert_eq!(data[0]["kind"], "movie");
    assert_eq!(data[0]["seasons"], 0);

    let (status, body) = request(
        &app,
        "PUT",
        "/movies",
        Some(json!({"id": id, "name": "X", "seasons": 3})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["kind"], "series");

    let (status, body) = request(&app, "GET", &format!("/movies/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["seasons"], 3);

    let (status, body) = request(&app, "PUT", "/movies", Some(json!({"name": "Y"}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["name"], "Y");

    let (status, _) = request(
        &app,
        "PUT",
        "/movies",
        Some(json!({"id": 9999, "name": "Z"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = request(&app, "DELETE", &format!("/movies/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "X");

    let (status, _) = request(&app, "GET", &format!("/movies/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_missing_title_is_not_found() {
    let (app, _) = spawn_app().await;

    let (status, body) = request(&app, "DELETE", "/movies/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_review_flow() {
    let (app, _) = spawn_app().await;

    let user_id = register_user(&app, "reviewer").await;
    let title_id = create_title(&app, "Dune").await;

    for bad_rating in [11, -1] {
        let (status, _) = request(
            &app,
            "POST",
            "/reviews",
            Some(json!({"title_id": title_id, "user_id": user_id, "rating": bad_rating})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    let (status, _) = request(
        &app,
        "POST",
        "/reviews",
        Some(json!({"title_id": title_id, "user_id": user_id})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = request(
        &app,
        "POST",
        "/reviews",
        Some(json!({"title_id": 9999, "user_id": user_id, "rating": 8})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = request(
        &app,
        "POST",
        "/reviews",
        Some(json!({"title_id": title_id, "user_id": 9999, "rating": 8})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = request(
        &app,
        "POST",
        "/reviews",
        Some(json!({"title_id": title_id, "user_id": user_id, "rating": 8, "comment": "Great"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["likes"], 0);
    assert_eq!(body["data"]["spoiler"], false);
    let review_id = body["data"]["id"].as_i64().unwrap();

    let (status, _) = request(
        &app,
        "POST",
        "/reviews",
        Some(json!({"title_id": title_id, "user_id": user_id, "rating": 5})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = request(
        &app,
        "PATCH",
        &format!("/reviews/{review_id}/comentario"),
        Some(json!({"comment": "Even better on rewatch"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["comment"], "Even better on rewatch");

    let (status, body) = request(
        &app,
        "PUT",
        &format!("/reviews/{review_id}"),
        Some(json!({
            "comment": "Rewritten",
            "rating": 9,
            "likes": 4,
            "date": "2024-05-01",
            "spoiler": true,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["rating"], 9);
    assert_eq!(body["data"]["spoiler"], true);

    let (status, _) = request(&app, "DELETE", &format!("/reviews/{review_id}"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = request(&app, "GET", &format!("/reviews/{review_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_deleting_title_removes_its_reviews() {
    let (app, _) = spawn_app().await;

    let user_id = register_user(&app, "cascade").await;
    let title_id = create_title(&app, "Blade Runner").await;

    let (status, body) = request(
        &app,
        "POST",
        "/reviews",
        Some(json!({"title_id": title_id, "user_id": user_id, "rating": 10})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let review_id = body["data"]["id"].as_i64().unwrap();

    let (status, _) = request(&app, "DELETE", &format!("/movies/{title_id}"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = request(&app, "GET", &format!("/reviews/{review_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = request(&app, "GET", "/reviews", None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_password_change_flow() {
    let (app, _) = spawn_app().await;

    let user_id = register_user(&app, "locksmith").await;
    let uri = format!("/usuarios/{user_id}/password");

    let (status, _) = request(
        &app,
        "PATCH",
        &uri,
        Some(json!({"current": "wrong", "new": "secret9", "confirm": "secret9"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = request(
        &app,
        "PATCH",
        &uri,
        Some(json!({"current": "hunter2!", "new": "secret9", "confirm": "other"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = request(
        &app,
        "PATCH",
        &uri,
        Some(json!({"current": "hunter2!", "new": "secret9"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = request(
        &app,
        "PATCH",
        &uri,
        Some(json!({"current": "hunter2!", "new": "secret9", "confirm": "secret9"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    // The old password no longer verifies; the new one does.
    let (status, _) = request(
        &app,
        "PATCH",
        &uri,
        Some(json!({"current": "hunter2!", "new": "again", "confirm": "again"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = request(
        &app,
        "PATCH",
        &uri,
        Some(json!({"current": "secret9", "new": "again", "confirm": "again"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = request(
        &app,
        "PATCH",
        "/usuarios/999/password",
        Some(json!({"current": "a", "new": "b", "confirm": "b"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_director_patch_allow_list() {
    let (app, store) = spawn_app().await;

    let seeded = director::ActiveModel {
        name: Set("Ridley Scott".to_string()),
        nationality: Set(Some("British".to_string())),
        ..Default::default()
    }
    .insert(&store.conn)
    .await
    .unwrap();
    let uri = format!("/directors/{}", seeded.id);

    let (status, body) = request(&app, "PATCH", &uri, Some(json!({"oscars": 2}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("Allowed fields"));

    let (status, body) = request(
        &app,
        "PATCH",
        &uri,
        Some(json!({"name": "Sir Ridley Scott", "oscars": 2})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["fields_updated"], json!(["name"]));
    assert_eq!(body["data"]["director"]["name"], "Sir Ridley Scott");
    assert_eq!(body["data"]["director"]["nationality"], "British");

    let (status, body) = request(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Sir Ridley Scott");

    let (status, _) = request(&app, "PATCH", "/directors/999", Some(json!({"name": "x"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = request(&app, "GET", "/directors/999/movies", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = request(&app, "GET", &format!("{uri}/movies"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["count"], 0);
}

#[tokio::test]
async fn test_genre_create_and_delete() {
    let (app, store) = spawn_app().await;

    let (status, _) = request(&app, "POST", "/genres", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = request(&app, "POST", "/genres", Some(json!({"name": "Sci-Fi"}))).await;
    assert_eq!(status, StatusCode::CREATED);
    let genre_id = body["data"]["id"].as_i64().unwrap();

    let (status, _) = request(&app, "POST", "/genres", Some(json!({"name": "Sci-Fi"}))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let title_id = create_title(&app, "Arrival").await;
    title_genre::ActiveModel {
        title_id: Set(i32::try_from(title_id).unwrap()),
        genre_id: Set(i32::try_from(genre_id).unwrap()),
    }
    .insert(&store.conn)
    .await
    .unwrap();

    let (status, body) = request(&app, "GET", &format!("/movies/{title_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["genres"], json!(["Sci-Fi"]));

    let (status, _) = request(&app, "DELETE", &format!("/genres/{genre_id}"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Removing the title also removes the link, freeing the genre.
    let (status, _) = request(&app, "DELETE", &format!("/movies/{title_id}"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = request(&app, "DELETE", &format!("/genres/{genre_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Sci-Fi");

    let (status, _) = request(&app, "DELETE", &format!("/genres/{genre_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_actor_crud() {
    let (app, _) = spawn_app().await;

    let (status, _) = request(&app, "POST", "/actors", Some(json!({"photo_url": "x"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = request(
        &app,
        "POST",
        "/actors",
        Some(json!({"name": "Rebecca Ferguson", "nationality": "Swedish"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = request(&app, "GET", "/actors", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, body) = request(
        &app,
        "PUT",
        &format!("/actors/{id}"),
        Some(json!({"name": "Rebecca Ferguson", "nationality": "Swedish", "birth_date": "1983-10-19"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["birth_date"], "1983-10-19");

    let (status, _) = request(
        &app,
        "PUT",
        "/actors/999",
        Some(json!({"name": "Nobody"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = request(&app, "DELETE", &format!("/actors/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Rebecca Ferguson");

    let (status, _) = request(&app, "DELETE", &format!("/actors/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_user_registration_and_alias() {
    let (app, _) = spawn_app().await;

    let first = register_user(&app, "first").await;
    let second = register_user(&app, "second").await;

    // Same alias, different email still conflicts.
    let (status, _) = request(
        &app,
        "POST",
        "/usuarios/register",
        Some(json!({
            "role": "member",
            "name": "Impostor",
            "alias": "first",
            "email": "impostor@example.com",
            "password": "pw",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = request(&app, "GET", "/usuarios", None).await;
    assert_eq!(status, StatusCode::OK);
    let users = body["data"].as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert!(users.iter().all(|u| u.get("password_hash").is_none()));

    let (status, _) = request(
        &app,
        "PATCH",
        &format!("/usuarios/{second}/alias"),
        Some(json!({"alias": "first"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = request(
        &app,
        "PATCH",
        &format!("/usuarios/{second}/alias"),
        Some(json!({"alias": "renamed"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["alias"], "renamed");

    let (status, body) = request(
        &app,
        "PUT",
        &format!("/usuarios/{first}"),
        Some(json!({"role": "admin", "name": "First User", "avatar_url": "http://img"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["role"], "admin");

    let (status, body) = request(&app, "GET", &format!("/usuarios/{first}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "First User");
    assert_eq!(body["message"], "User retrieved successfully");
}
