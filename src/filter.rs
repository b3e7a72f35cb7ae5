use chrono::{DateTime, Utc};

use crate::models::{Category, Post};

/// Published, already dated posts whose category is published too.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostFilter {
    pub now: DateTime<Utc>,
    pub post_id: Option<i64>,
    pub category_id: Option<i64>,
    pub limit: Option<i64>,
}

impl PostFilter {
    pub fn visible_at(now: DateTime<Utc>) -> Self {
        Self {
            now,
            post_id: None,
            category_id: None,
            limit: None,
        }
    }

    pub fn with_id(mut self, post_id: i64) -> Self {
        self.post_id = Some(post_id);
        self
    }

    pub fn in_category(mut self, category_id: i64) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn admits(&self, post: &Post, category: Option<&Category>) -> bool {
        let Some(category) = category else {
            return false;
        };

        post.category_id == Some(category.id)
            && post.pub_date <= self.now
            && post.is_published
            && category.is_published
            && self.post_id.map_or(true, |id| id == post.id)
            && self.category_id.map_or(true, |id| id == category.id)
    }
}
