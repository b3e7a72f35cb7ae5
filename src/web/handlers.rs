use askama::Template;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use chrono::Utc;
use std::sync::Arc;

use crate::{
    filter::PostFilter,
    models::{is_valid_slug, Category, PostDetail},
    Error, Result,
};

use super::AppState;

pub const INDEX_POST_COUNT: i64 = 5;

#[derive(Template)]
#[template(path = "blog/index.html")]
struct IndexTemplate {
    post_list: Vec<PostDetail>,
}

#[derive(Template)]
#[template(path = "blog/detail.html")]
struct DetailTemplate {
    post: PostDetail,
}

#[derive(Template)]
#[template(path = "blog/category.html")]
struct CategoryTemplate {
    category: Category,
    post_list: Vec<PostDetail>,
}

fn render(template: impl Template) -> Result<Response> {
    Ok(Html(template.render()?).into_response())
}

/// Post ids in URLs are plain decimal digits; anything else is not a route.
fn parse_post_id(raw: &str) -> Option<i64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

pub async fn index(State(state): State<Arc<AppState>>) -> Result<Response> {
    let filter = PostFilter::visible_at(Utc::now()).limit(INDEX_POST_COUNT);
    let post_list = state.repo.filter_posts(&filter).await?;

    tracing::debug!(count = post_list.len(), "Rendering index");
    render(IndexTemplate { post_list })
}

pub async fn post_detail(
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<String>,
) -> Result<Response> {
    let post_id = parse_post_id(&post_id).ok_or(Error::NotFound)?;
    let post = state
        .repo
        .visible_post(Utc::now(), post_id)
        .await?
        .ok_or(Error::NotFound)?;

    tracing::debug!(%post, "Rendering post detail");
    render(DetailTemplate { post })
}

pub async fn category_posts(
    State(state): State<Arc<AppState>>,
    Path(category_slug): Path<String>,
) -> Result<Response> {
    if !is_valid_slug(&category_slug) {
        return Err(Error::NotFound);
    }

    let category = state
        .repo
        .published_category(&category_slug)
        .await?
        .ok_or(Error::NotFound)?;

    let filter = PostFilter::visible_at(Utc::now()).in_category(category.id);
    let post_list = state.repo.filter_posts(&filter).await?;

    tracing::debug!(%category, count = post_list.len(), "Rendering category");
    render(CategoryTemplate {
        category,
        post_list,
    })
}

pub async fn post_detail_redirect(Path(post_id): Path<String>) -> Result<Redirect> {
    let post_id = parse_post_id(&post_id).ok_or(Error::NotFound)?;
    Ok(Redirect::permanent(&format!("/posts/{}/", post_id)))
}

pub async fn category_posts_redirect(Path(category_slug): Path<String>) -> Result<Redirect> {
    if !is_valid_slug(&category_slug) {
        return Err(Error::NotFound);
    }
    Ok(Redirect::permanent(&format!("/category/{}/", category_slug)))
}

pub async fn api_list_posts(State(state): State<Arc<AppState>>) -> Result<Json<Vec<PostDetail>>> {
    let posts = state
        .repo
        .filter_posts(&PostFilter::visible_at(Utc::now()))
        .await?;

    Ok(Json(posts))
}

pub async fn health() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}

pub async fn not_found() -> Error {
    Error::NotFound
}
