//! Post authoring, lifecycle transitions and listings.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::slug::slugify;
use crate::domain::{Page, PageRequest, Paginator, Post, PostQuery, PostStatus};
use crate::error::{DomainError, RepoError};
use crate::ports::{CategoryRepository, PostRepository, TagRepository};

/// Longest accepted title, in characters.
pub const MAX_TITLE_LEN: usize = 200;

/// Author-editable fields of a post, as submitted.
#[derive(Debug, Clone, Default)]
pub struct PostInput {
    pub title: String,
    pub body: String,
    pub status: PostStatus,
    pub category_id: Option<Uuid>,
    pub tag_ids: Vec<Uuid>,
}

impl PostInput {
    /// Check the input and return the category it points at.
    pub fn validate(&self) -> Result<Uuid, DomainError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(DomainError::Validation("Title is required".to_string()));
        }
        if title.chars().count() > MAX_TITLE_LEN {
            return Err(DomainError::Validation(format!(
                "Title must be at most {MAX_TITLE_LEN} characters"
            )));
        }
        if slugify(title).is_empty() {
            return Err(DomainError::Validation(
                "Title must contain at least one letter or digit".to_string(),
            ));
        }
        self.category_id.ok_or(DomainError::MissingCategory)
    }
}

/// Post store operations exposed to the outside world.
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    categories: Arc<dyn CategoryRepository>,
    tags: Arc<dyn TagRepository>,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        categories: Arc<dyn CategoryRepository>,
        tags: Arc<dyn TagRepository>,
    ) -> Self {
        Self {
            posts,
            categories,
            tags,
        }
    }

    /// Create a post owned by `author_id`.
    pub async fn create(&self, author_id: Uuid, input: PostInput) -> Result<Post, DomainError> {
        let category_id = input.validate()?;
        self.ensure_category(category_id).await?;
        let tag_ids = self.resolve_tags(&input.tag_ids).await?;

        let post = Post::new(
            author_id,
            input.title.trim().to_string(),
            input.body,
            input.status,
            category_id,
            tag_ids,
        );
        let saved = self.posts.insert(post).await?;

        tracing::info!(
            post_id = %saved.id,
            author_id = %author_id,
            slug = %saved.slug,
            status = %saved.status,
            "Post created"
        );
        Ok(saved)
    }

    /// Edit a post. Only its author may do so; the slug is left as is.
    pub async fn update(
        &self,
        actor: Uuid,
        id: Uuid,
        input: PostInput,
    ) -> Result<Post, DomainError> {
        let mut post = self.get(id).await?;
        if !post.is_authored_by(actor) {
            tracing::warn!(post_id = %id, actor = %actor, "Rejected edit by non-author");
            return Err(DomainError::Forbidden);
        }

        let category_id = input.validate()?;
        self.ensure_category(category_id).await?;
        post.tag_ids = self.resolve_tags(&input.tag_ids).await?;
        post.title = input.title.trim().to_string();
        post.body = input.body;
        post.status = input.status;
        post.category_id = category_id;

        let saved = self
            .posts
            .update(post)
            .await
            .map_err(|e| post_error(e, id))?;

        tracing::info!(post_id = %id, status = %saved.status, "Post updated");
        Ok(saved)
    }

    /// Publish a post on behalf of its author.
    pub async fn publish(&self, actor: Uuid, id: Uuid) -> Result<Post, DomainError> {
        let post = self.get(id).await?;
        if !post.is_authored_by(actor) {
            return Err(DomainError::Forbidden);
        }

        let published = self
            .posts
            .mark_published(id, Utc::now())
            .await
            .map_err(|e| post_error(e, id))?;

        tracing::info!(post_id = %id, "Post published");
        Ok(published)
    }

    pub async fn get(&self, id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", id))
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Post, DomainError> {
        self.posts
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::not_found("post", slug))
    }

    /// Fetch a post for display, counting the view.
    pub async fn view(&self, id: Uuid) -> Result<Post, DomainError> {
        let views = self
            .posts
            .increment_views(id)
            .await
            .map_err(|e| post_error(e, id))?;

        let mut post = self.get(id).await?;
        post.views = post.views.max(views);
        Ok(post)
    }

    /// Record a like and return the new total.
    pub async fn like(&self, id: Uuid) -> Result<u64, DomainError> {
        self.posts
            .increment_likes(id)
            .await
            .map_err(|e| post_error(e, id))
    }

    /// One page of `query`, clamping the requested page into range.
    pub async fn list(
        &self,
        query: &PostQuery,
        paginator: Paginator,
        request: PageRequest,
    ) -> Result<Page<Post>, DomainError> {
        let total = self.posts.count(query).await?;
        let window = paginator.window(total, request);
        let items = self.posts.list(query, Some(window)).await?;

        Ok(Page::new(items, window, total, paginator.per_page()))
    }

    /// Every post matching `query`, unpaged.
    pub async fn all(&self, query: &PostQuery) -> Result<Vec<Post>, DomainError> {
        Ok(self.posts.list(query, None).await?)
    }

    async fn ensure_category(&self, id: Uuid) -> Result<(), DomainError> {
        match self.categories.find_by_id(id).await? {
            Some(_) => Ok(()),
            None => Err(DomainError::not_found("category", id)),
        }
    }

    async fn resolve_tags(&self, ids: &[Uuid]) -> Result<BTreeSet<Uuid>, DomainError> {
        let wanted: BTreeSet<Uuid> = ids.iter().copied().collect();
        if wanted.is_empty() {
            return Ok(wanted);
        }

        let ids: Vec<Uuid> = wanted.iter().copied().collect();
        let found: BTreeSet<Uuid> = self
            .tags
            .find_many(&ids)
            .await?
            .into_iter()
            .map(|t| t.id)
            .collect();

        match wanted.difference(&found).next() {
            Some(missing) => Err(DomainError::not_found("tag", missing)),
            None => Ok(wanted),
        }
    }
}

fn post_error(err: RepoError, id: Uuid) -> DomainError {
    match err {
        RepoError::NotFound => DomainError::not_found("post", id),
        other => other.into(),
    }
}
