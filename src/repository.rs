mod memory;
mod postgres;

pub use memory::MemoryRepository;
pub use postgres::PgRepository;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
    filter::PostFilter,
    models::{Category, PostDetail},
    Result,
};

#[async_trait]
pub trait BlogRepository: Send + Sync {
    async fn filter_posts(&self, filter: &PostFilter) -> Result<Vec<PostDetail>>;

    async fn published_category(&self, slug: &str) -> Result<Option<Category>>;

    async fn visible_post(&self, now: DateTime<Utc>, post_id: i64) -> Result<Option<PostDetail>> {
        let filter = PostFilter::visible_at(now).with_id(post_id).limit(1);
        Ok(self.filter_posts(&filter).await?.into_iter().next())
    }
}
