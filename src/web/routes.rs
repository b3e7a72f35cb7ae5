use axum::{routing::get, Router};
use std::sync::Arc;

use super::{handlers, AppState};

pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(handlers::index))
        .route("/posts/:post_id", get(handlers::post_detail_redirect))
        .route("/posts/:post_id/", get(handlers::post_detail))
        .route("/category/:category_slug", get(handlers::category_posts_redirect))
        .route("/category/:category_slug/", get(handlers::category_posts))
        .route("/api/posts", get(handlers::api_list_posts))
        .route("/health", get(handlers::health))
}
