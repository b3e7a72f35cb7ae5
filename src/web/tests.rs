use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::{DateTime, Duration, Utc};
use tower::ServiceExt;

use crate::{
    models::{Category, Location, Post, User},
    repository::MemoryRepository,
    web::{app, AppState, INDEX_POST_COUNT},
};

const TRAVEL: i64 = 1;
const HIDDEN: i64 = 2;
const EMPTY: i64 = 3;

fn category(id: i64, slug: &str, is_published: bool) -> Category {
    Category {
        id,
        title: format!("Category {}", slug),
        description: format!("All about {}", slug),
        slug: slug.to_string(),
        is_published,
        created_at: Utc::now() - Duration::days(30),
    }
}

fn post(id: i64, title: &str, category_id: Option<i64>, pub_date: DateTime<Utc>) -> Post {
    Post {
        id,
        title: title.to_string(),
        text: format!("{} body text", title),
        pub_date,
        author_id: 1,
        location_id: None,
        category_id,
        is_published: true,
        created_at: pub_date,
    }
}

fn create_test_app() -> Router {
    let now = Utc::now();
    let yesterday = now - Duration::days(1);
    let mut repo = MemoryRepository::new();

    repo.add_user(User {
        id: 1,
        username: "leo".to_string(),
        first_name: "Leo".to_string(),
        last_name: "Tolstoy".to_string(),
    })
    .add_category(category(TRAVEL, "travel", true))
    .add_category(category(HIDDEN, "hidden", false))
    .add_category(category(EMPTY, "empty", true))
    .add_location(Location {
        id: 1,
        name: "Lisbon".to_string(),
        is_published: true,
        created_at: now,
    })
    .add_location(Location {
        id: 2,
        name: "Secret Base".to_string(),
        is_published: false,
        created_at: now,
    });

    let mut visible = post(1, "Visible yesterday", Some(TRAVEL), yesterday);
    visible.location_id = Some(1);
    let mut draft = post(3, "Draft post", Some(TRAVEL), yesterday);
    draft.is_published = false;

    repo.add_post(visible)
        .add_post(post(2, "Future post", Some(TRAVEL), now + Duration::days(1)))
        .add_post(draft)
        .add_post(post(4, "Hidden category post", Some(HIDDEN), yesterday))
        .add_post(post(5, "Uncategorized post", None, yesterday));

    for days in 2..=7 {
        let mut archived = post(
            days + 4,
            &format!("Archive entry {}", days),
            Some(TRAVEL),
            now - Duration::days(days),
        );
        if days == 2 {
            archived.location_id = Some(2);
        }
        repo.add_post(archived);
    }

    app(AppState::new(repo), "static")
}

async fn get(app: &Router, uri: &str) -> (StatusCode, String) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    (status, String::from_utf8(body.to_vec()).unwrap())
}

fn assert_hidden_posts_absent(body: &str) {
    for title in [
        "Future post",
        "Draft post",
        "Hidden category post",
        "Uncategorized post",
    ] {
        assert!(!body.contains(title), "{} should not be listed", title);
    }
}

#[tokio::test]
async fn test_index_lists_five_newest_visible_posts() {
    let app = create_test_app();

    let (status, body) = get(&app, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body.matches("class=\"post-card\"").count(),
        INDEX_POST_COUNT as usize
    );
    assert_hidden_posts_absent(&body);

    let positions: Vec<usize> = [
        "Visible yesterday",
        "Archive entry 2",
        "Archive entry 3",
        "Archive entry 4",
        "Archive entry 5",
    ]
    .iter()
    .map(|title| body.find(title).unwrap())
    .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
    assert!(!body.contains("Archive entry 6"));
}

#[tokio::test]
async fn test_index_renders_post_card_details() {
    let app = create_test_app();

    let (_, body) = get(&app, "/").await;

    assert!(body.contains("Leo Tolstoy"));
    assert!(body.contains("Lisbon"));
    assert!(body.contains("Planet Earth"));
    assert!(body.contains("href=\"/posts/1/\""));
    assert!(body.contains("href=\"/category/travel/\""));
}

#[tokio::test]
async fn test_post_detail_for_visible_post() {
    let app = create_test_app();

    let (status, body) = get(&app, "/posts/1/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Visible yesterday body text"));
    assert!(body.contains("Category travel"));
}

#[tokio::test]
async fn test_post_detail_hides_invisible_posts() {
    let app = create_test_app();

    for id in [2, 3, 4, 5, 999] {
        let (status, _) = get(&app, &format!("/posts/{}/", id)).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "post {}", id);
    }
}

#[tokio::test]
async fn test_post_detail_with_malformed_id() {
    let app = create_test_app();

    for uri in ["/posts/abc/", "/posts/-1/", "/posts/1.5/"] {
        let (status, _) = get(&app, uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
    }
}

#[tokio::test]
async fn test_category_lists_all_visible_posts_in_category() {
    let app = create_test_app();

    let (status, body) = get(&app, "/category/travel/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("All about travel"));
    assert_eq!(body.matches("class=\"post-card\"").count(), 7);
    assert!(body.contains("Visible yesterday"));
    assert!(body.contains("Archive entry 7"));
    assert_hidden_posts_absent(&body);
}

#[tokio::test]
async fn test_category_without_posts() {
    let app = create_test_app();

    let (status, body) = get(&app, "/category/empty/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("No posts in this category yet."));
    assert_eq!(body.matches("class=\"post-card\"").count(), 0);
}

#[tokio::test]
async fn test_category_not_found() {
    let app = create_test_app();

    for uri in [
        "/category/hidden/",
        "/category/missing/",
        "/category/bad%20slug/",
    ] {
        let (status, _) = get(&app, uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
    }
}

#[tokio::test]
async fn test_api_lists_every_visible_post() {
    let app = create_test_app();

    let (status, body) = get(&app, "/api/posts").await;

    assert_eq!(status, StatusCode::OK);
    let posts: Vec<serde_json::Value> = serde_json::from_str(&body).unwrap();
    let ids: Vec<i64> = posts.iter().map(|p| p["id"].as_i64().unwrap()).collect();
    assert_eq!(ids, vec![1, 6, 7, 8, 9, 10, 11]);
    assert_eq!(posts[0]["category"]["slug"], "travel");
    assert_eq!(posts[0]["location"]["name"], "Lisbon");
}

#[tokio::test]
async fn test_unpublished_location_is_hidden_everywhere() {
    let app = create_test_app();

    let (_, html) = get(&app, "/posts/6/").await;
    assert!(html.contains("Planet Earth"));
    assert!(!html.contains("Secret Base"));

    let (_, json) = get(&app, "/api/posts").await;
    assert!(!json.contains("Secret Base"));
    let posts: Vec<serde_json::Value> = serde_json::from_str(&json).unwrap();
    assert_eq!(posts[1]["id"], 6);
    assert!(posts[1]["location"].is_null());
}

#[tokio::test]
async fn test_api_allows_cross_origin_requests() {
    let app = create_test_app();
    let request = Request::builder()
        .uri("/api/posts")
        .header("origin", "https://reader.example")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "*"
    );
}

#[tokio::test]
async fn test_missing_trailing_slash_redirects() {
    let app = create_test_app();

    for (uri, target) in [
        ("/posts/1", "/posts/1/"),
        ("/posts/2", "/posts/2/"),
        ("/category/travel", "/category/travel/"),
    ] {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = app.clone().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::PERMANENT_REDIRECT, "{}", uri);
        assert_eq!(response.headers()["location"], target);
    }

    for uri in ["/posts/abc", "/category/bad%20slug"] {
        assert_eq!(get(&app, uri).await.0, StatusCode::NOT_FOUND, "{}", uri);
    }
}

#[tokio::test]
async fn test_health_and_unknown_routes() {
    let app = create_test_app();

    assert_eq!(get(&app, "/health").await, (StatusCode::OK, "OK".to_string()));
    assert_eq!(get(&app, "/nope").await.0, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_static_files_are_served() {
    let app = create_test_app();

    let (status, body) = get(&app, "/static/css/style.css").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(".post-card"));
}
