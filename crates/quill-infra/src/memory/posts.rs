use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use quill_core::domain::{PageWindow, Post, PostQuery, listing_order};
use quill_core::error::RepoError;
use quill_core::ports::PostRepository;

use super::{SharedTables, Tables};

/// In-memory post store. Counter updates happen under the write lock, so
/// concurrent increments are never lost.
pub struct InMemoryPostRepository {
    tables: SharedTables,
}

impl InMemoryPostRepository {
    pub(super) fn new(tables: SharedTables) -> Self {
        Self { tables }
    }
}

impl Tables {
    /// Enforce the constraints the SQL schema declares.
    fn check_post(&self, post: &Post) -> Result<(), RepoError> {
        for other in self.posts.values().filter(|p| p.id != post.id) {
            if other.title == post.title {
                return Err(RepoError::DuplicateTitle);
            }
            if other.slug == post.slug {
                return Err(RepoError::DuplicateSlug);
            }
        }
        if !self.categories.contains_key(&post.category_id) {
            return Err(RepoError::Constraint(format!(
                "category {} does not exist",
                post.category_id
            )));
        }
        if let Some(tag) = post.tag_ids.iter().find(|t| !self.tags.contains_key(t)) {
            return Err(RepoError::Constraint(format!("tag {tag} does not exist")));
        }
        Ok(())
    }

    fn matches(&self, post: &Post, query: &PostQuery) -> bool {
        if query.status.is_some_and(|s| s != post.status) {
            return false;
        }
        if query.author_id.is_some_and(|a| a != post.author_id) {
            return false;
        }
        if let Some(slug) = &query.category_slug {
            let in_category = self
                .categories
                .get(&post.category_id)
                .is_some_and(|c| &c.slug == slug);
            if !in_category {
                return false;
            }
        }
        if let Some(slug) = &query.tag_slug {
            let tagged = post
                .tag_ids
                .iter()
                .filter_map(|id| self.tags.get(id))
                .any(|t| &t.slug == slug);
            if !tagged {
                return false;
            }
        }
        true
    }

    fn post_mut(&mut self, id: Uuid) -> Result<&mut Post, RepoError> {
        self.posts.get_mut(&id).ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.tables.read().await.posts.get(&id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.posts.values().find(|p| p.slug == slug).cloned())
    }

    async fn insert(&self, mut post: Post) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.posts.contains_key(&post.id) {
            return Err(RepoError::Duplicate("post id".to_string()));
        }

        post.prepare_save(true, Utc::now());
        tables.check_post(&post)?;
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update(&self, mut post: Post) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        let stored = tables.posts.get(&post.id).ok_or(RepoError::NotFound)?;

        // Columns a full save never writes.
        post.author_id = stored.author_id;
        post.created_time = stored.created_time;
        post.views = stored.views;
        post.likenum = stored.likenum;

        post.prepare_save(false, Utc::now());
        tables.check_post(&post)?;
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn mark_published(&self, id: Uuid, at: DateTime<Utc>) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        let post = tables.post_mut(id)?;
        post.publish(at);
        Ok(post.clone())
    }

    async fn increment_views(&self, id: Uuid) -> Result<u64, RepoError> {
        let mut tables = self.tables.write().await;
        let post = tables.post_mut(id)?;
        post.viewed();
        Ok(post.views)
    }

    async fn increment_likes(&self, id: Uuid) -> Result<u64, RepoError> {
        let mut tables = self.tables.write().await;
        let post = tables.post_mut(id)?;
        post.like();
        Ok(post.likenum)
    }

    async fn count(&self, query: &PostQuery) -> Result<u64, RepoError> {
        let tables = self.tables.read().await;
        let count = tables
            .posts
            .values()
            .filter(|p| tables.matches(p, query))
            .count();
        Ok(count as u64)
    }

    async fn list(
        &self,
        query: &PostQuery,
        window: Option<PageWindow>,
    ) -> Result<Vec<Post>, RepoError> {
        let tables = self.tables.read().await;
        let mut posts: Vec<Post> = tables
            .posts
            .values()
            .filter(|p| tables.matches(p, query))
            .cloned()
            .collect();
        posts.sort_by(listing_order);

        Ok(match window {
            Some(w) => posts
                .into_iter()
                .skip(w.offset as usize)
                .take(w.limit as usize)
                .collect(),
            None => posts,
        })
    }
}
