use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::BlogRepository;
use crate::{
    filter::PostFilter,
    models::{Category, Location, PostDetail, User},
    Result,
};

// Categories are inner-joined: a post with a NULL category never matches.
const SELECT_POSTS: &str = r#"
SELECT
    p.id, p.title, p.text, p.pub_date, p.is_published, p.created_at,
    u.id AS author_id, u.username AS author_username,
    u.first_name AS author_first_name, u.last_name AS author_last_name,
    c.id AS category_id, c.title AS category_title,
    c.description AS category_description, c.slug AS category_slug,
    c.is_published AS category_is_published, c.created_at AS category_created_at,
    l.id AS location_id, l.name AS location_name,
    l.is_published AS location_is_published, l.created_at AS location_created_at
FROM posts p
JOIN users u ON u.id = p.author_id
JOIN categories c ON c.id = p.category_id
LEFT JOIN locations l ON l.id = p.location_id
"#;

#[derive(Debug, sqlx::FromRow)]
struct PostRow {
    id: i64,
    title: String,
    text: String,
    pub_date: DateTime<Utc>,
    is_published: bool,
    created_at: DateTime<Utc>,
    author_id: i64,
    author_username: String,
    author_first_name: String,
    author_last_name: String,
    category_id: i64,
    category_title: String,
    category_description: String,
    category_slug: String,
    category_is_published: bool,
    category_created_at: DateTime<Utc>,
    location_id: Option<i64>,
    location_name: Option<String>,
    location_is_published: Option<bool>,
    location_created_at: Option<DateTime<Utc>>,
}

impl From<PostRow> for PostDetail {
    fn from(row: PostRow) -> Self {
        let location = match (
            row.location_id,
            row.location_name,
            row.location_is_published,
            row.location_created_at,
        ) {
            (Some(id), Some(name), Some(is_published), Some(created_at)) => Some(Location {
                id,
                name,
                is_published,
                created_at,
            }),
            _ => None,
        };

        PostDetail {
            id: row.id,
            title: row.title,
            text: row.text,
            pub_date: row.pub_date,
            is_published: row.is_published,
            created_at: row.created_at,
            author: User {
                id: row.author_id,
                username: row.author_username,
                first_name: row.author_first_name,
                last_name: row.author_last_name,
            },
            category: Category {
                id: row.category_id,
                title: row.category_title,
                description: row.category_description,
                slug: row.category_slug,
                is_published: row.category_is_published,
                created_at: row.category_created_at,
            },
            location,
        }
    }
}

#[derive(Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BlogRepository for PgRepository {
    async fn filter_posts(&self, filter: &PostFilter) -> Result<Vec<PostDetail>> {
        let mut query = QueryBuilder::<Postgres>::new(SELECT_POSTS);
        query
            .push(" WHERE p.pub_date <= ")
            .push_bind(filter.now)
            .push(" AND p.is_published = TRUE AND c.is_published = TRUE");

        if let Some(post_id) = filter.post_id {
            query.push(" AND p.id = ").push_bind(post_id);
        }
        if let Some(category_id) = filter.category_id {
            query.push(" AND p.category_id = ").push_bind(category_id);
        }

        query.push(" ORDER BY p.pub_date DESC, p.id DESC");
        if let Some(limit) = filter.limit {
            query.push(" LIMIT ").push_bind(limit);
        }

        let rows = query
            .build_query_as::<PostRow>()
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!(rows = rows.len(), ?filter, "filtered posts");
        Ok(rows.into_iter().map(PostDetail::from).collect())
    }

    async fn published_category(&self, slug: &str) -> Result<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, title, description, slug, is_published, created_at \
             FROM categories WHERE slug = $1 AND is_published = TRUE",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }
}
