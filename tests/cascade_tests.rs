use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, Set};

use cinelog::config::SecurityConfig;
use cinelog::db::{NewUser, ReviewInput, Store, TitleInput, User};
use cinelog::entities::prelude::*;
use cinelog::entities::{title, title_actor, title_director, title_genre, user_title};

async fn store() -> Store {
    Store::new("sqlite::memory:")
        .await
        .expect("Failed to create store")
}

async fn seed_user(store: &Store, alias: &str) -> User {
    store
        .register_user(
            NewUser {
                role: "member".to_string(),
                avatar_url: None,
                name: alias.to_string(),
                alias: alias.to_string(),
                email: format!("{alias}@example.com"),
                password: "hunter2!".to_string(),
            },
            &SecurityConfig::default(),
        )
        .await
        .expect("Failed to seed user")
}

async fn seed_title(store: &Store, name: &str) -> title::Model {
    store
        .insert_title(TitleInput {
            name: name.to_string(),
            description: None,
            release_date: Some("2021-10-22".to_string()),
            image_url: None,
            seasons: None,
        })
        .await
        .expect("Failed to seed title")
}

/// Links one genre, one actor, one director, and one library entry to the
/// title.
async fn seed_links(store: &Store, title_id: i32, user_id: i32) {
    let genre = store
        .insert_genre(format!("genre-for-{title_id}"))
        .await
        .unwrap();

    let actor = store
        .insert_actor(cinelog::db::ActorInput {
            name: format!("actor-for-{title_id}"),
            photo_url: None,
            nationality: None,
            birth_date: None,
        })
        .await
        .unwrap();

    let director = cinelog::entities::director::ActiveModel {
        name: Set(format!("director-for-{title_id}")),
        ..Default::default()
    }
    .insert(&store.conn)
    .await
    .unwrap();

    title_genre::ActiveModel {
        title_id: Set(title_id),
        genre_id: Set(genre.id),
    }
    .insert(&store.conn)
    .await
    .unwrap();

    title_actor::ActiveModel {
        title_id: Set(title_id),
        actor_id: Set(actor.id),
    }
    .insert(&store.conn)
    .await
    .unwrap();

    title_director::ActiveModel {
        title_id: Set(title_id),
        director_id: Set(director.id),
    }
    .insert(&store.conn)
    .await
    .unwrap();

    user_title::ActiveModel {
        user_id: Set(user_id),
        title_id: Set(title_id),
    }
    .insert(&store.conn)
    .await
    .unwrap();
}

struct TableCounts {
    titles: u64,
    genres: u64,
    reviews: u64,
    title_genre: u64,
    title_actor: u64,
    title_director: u64,
    user_title: u64,
    review_title: u64,
    user_review: u64,
}

async fn table_counts(store: &Store) -> TableCounts {
    TableCounts {
        titles: Title::find().count(&store.conn).await.unwrap(),
        genres: Genre::find().count(&store.conn).await.unwrap(),
        reviews: Review::find().count(&store.conn).await.unwrap(),
        title_genre: TitleGenre::find().count(&store.conn).await.unwrap(),
        title_actor: TitleActor::find().count(&store.conn).await.unwrap(),
        title_director: TitleDirector::find().count(&store.conn).await.unwrap(),
        user_title: UserTitle::find().count(&store.conn).await.unwrap(),
        review_title: ReviewTitle::find().count(&store.conn).await.unwrap(),
        user_review: UserReview::find().count(&store.conn).await.unwrap(),
    }
}

#[tokio::test]
async fn test_remove_title_cascades_exactly_once() {
    let store = store().await;

    let user = seed_user(&store, "keeper").await;
    let doomed = seed_title(&store, "Doomed").await;
    let survivor = seed_title(&store, "Survivor").await;

    seed_links(&store, doomed.id, user.id).await;
    seed_links(&store, survivor.id, user.id).await;

    store
        .create_review(ReviewInput {
            title_id: doomed.id,
            user_id: user.id,
            comment: Some("short-lived".to_string()),
            rating: 3,
            spoiler: false,
        })
        .await
        .unwrap();

    store
        .create_review(ReviewInput {
            title_id: survivor.id,
            user_id: user.id,
            comment: None,
            rating: 9,
            spoiler: false,
        })
        .await
        .unwrap();

    let before = table_counts(&store).await;
    assert_eq!(before.titles, 2);
    assert_eq!(before.reviews, 2);
    assert_eq!(before.title_genre, 2);

    let removed = store.remove_title(doomed.id).await.unwrap();
    assert_eq!(removed.map(|t| t.name), Some("Doomed".to_string()));

    let after = table_counts(&store).await;
    assert_eq!(after.titles, 1);
    assert_eq!(after.reviews, 1);
    assert_eq!(after.title_genre, 1);
    assert_eq!(after.title_actor, 1);
    assert_eq!(after.title_director, 1);
    assert_eq!(after.user_title, 1);
    assert_eq!(after.review_title, 1);
    assert_eq!(after.user_review, 1);

    // Genres themselves are not part of the cascade, only the link rows.
    assert_eq!(after.genres, before.genres);

    let kept = store.get_title_with_genres(survivor.id).await.unwrap();
    let (kept_title, kept_genres) = kept.unwrap();
    assert_eq!(kept_title.name, "Survivor");
    assert_eq!(kept_genres.len(), 1);

    let kept_review = store
        .find_review_by_user_and_title(user.id, survivor.id)
        .await
        .unwrap();
    assert_eq!(kept_review.map(|r| r.rating), Some(9));
}

#[tokio::test]
async fn test_remove_missing_title_changes_nothing() {
    let store = store().await;

    let user = seed_user(&store, "bystander").await;
    let title = seed_title(&store, "Untouched").await;
    seed_links(&store, title.id, user.id).await;

    let before = table_counts(&store).await;

    let removed = store.remove_title(9999).await.unwrap();
    assert!(removed.is_none());

    let after = table_counts(&store).await;
    assert_eq!(after.titles, before.titles);
    assert_eq!(after.title_genre, before.title_genre);
    assert_eq!(after.title_actor, before.title_actor);
    assert_eq!(after.title_director, before.title_director);
    assert_eq!(after.user_title, before.user_title);
    assert_eq!(after.reviews, before.reviews);
}

#[tokio::test]
async fn test_create_review_links_atomically() {
    let store = store().await;

    let user = seed_user(&store, "writer").await;
    let title = seed_title(&store, "Reviewed").await;

    assert!(
        store
            .find_review_by_user_and_title(user.id, title.id)
            .await
            .unwrap()
            .is_none()
    );

    let created = store
        .create_review(ReviewInput {
            title_id: title.id,
            user_id: user.id,
            comment: None,
            rating: 7,
            spoiler: true,
        })
        .await
        .unwrap();

    assert_eq!(created.likes, 0);
    assert!(created.spoiler);

    let counts = table_counts(&store).await;
    assert_eq!(counts.reviews, 1);
    assert_eq!(counts.review_title, 1);
    assert_eq!(counts.user_review, 1);

    let found = store
        .find_review_by_user_and_title(user.id, title.id)
        .await
        .unwrap();
    assert_eq!(found.map(|r| r.id), Some(created.id));
}

#[tokio::test]
async fn test_create_review_rolls_back_on_failed_link() {
    let store = store().await;

    let user = seed_user(&store, "unlucky").await;
    seed_title(&store, "Exists").await;

    let before = table_counts(&store).await;

    // The title link insert violates its foreign key, after the review row
    // was already written inside the transaction.
    let result = store
        .create_review(ReviewInput {
            title_id: 9999,
            user_id: user.id,
            comment: None,
            rating: 5,
            spoiler: false,
        })
        .await;
    assert!(result.is_err());

    let after = table_counts(&store).await;
    assert_eq!(after.reviews, before.reviews);
    assert_eq!(after.review_title, before.review_title);
    assert_eq!(after.user_review, before.user_review);
}
