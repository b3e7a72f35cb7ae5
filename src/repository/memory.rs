use async_trait::async_trait;
use std::collections::BTreeMap;

use super::BlogRepository;
use crate::{
    filter::PostFilter,
    models::{Category, Location, Post, PostDetail, User},
    Error, Result,
};

#[derive(Debug, Default)]
pub struct MemoryRepository {
    users: BTreeMap<i64, User>,
    categories: BTreeMap<i64, Category>,
    locations: BTreeMap<i64, Location>,
    posts: Vec<Post>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&mut self, user: User) -> &mut Self {
        self.users.insert(user.id, user);
        self
    }

    pub fn add_category(&mut self, category: Category) -> &mut Self {
        self.categories.insert(category.id, category);
        self
    }

    pub fn add_location(&mut self, location: Location) -> &mut Self {
        self.locations.insert(location.id, location);
        self
    }

    pub fn add_post(&mut self, post: Post) -> &mut Self {
        self.posts.retain(|p| p.id != post.id);
        self.posts.push(post);
        self
    }

    fn detail(&self, post: &Post, category: &Category) -> Result<PostDetail> {
        let author = self.users.get(&post.author_id).cloned().ok_or_else(|| {
            Error::Internal(format!("post {} references missing author {}", post.id, post.author_id))
        })?;
        let location = post
            .location_id
            .and_then(|id| self.locations.get(&id))
            .cloned();

        Ok(PostDetail::new(post.clone(), author, category.clone(), location))
    }
}

#[async_trait]
impl BlogRepository for MemoryRepository {
    async fn filter_posts(&self, filter: &PostFilter) -> Result<Vec<PostDetail>> {
        let mut posts = Vec::new();
        for post in &self.posts {
            let Some(category) = post.category_id.and_then(|id| self.categories.get(&id)) else {
                continue;
            };
            if filter.admits(post, Some(category)) {
                posts.push(self.detail(post, category)?);
            }
        }

        posts.sort_by(|a, b| b.pub_date.cmp(&a.pub_date).then(b.id.cmp(&a.id)));
        if let Some(limit) = filter.limit {
            posts.truncate(usize::try_from(limit).unwrap_or(0));
        }

        Ok(posts)
    }

    async fn published_category(&self, slug: &str) -> Result<Option<Category>> {
        Ok(self
            .categories
            .values()
            .find(|c| c.is_published && c.slug == slug)
            .cloned())
    }
}
