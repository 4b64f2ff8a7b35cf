use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Category, Comment, PageWindow, Post, PostQuery, Tag, UserProfile};
use crate::error::RepoError;

/// Generic repository trait for plain records.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Persist a new entity.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Overwrite an existing entity. `RepoError::NotFound` if it is missing.
    async fn update(&self, entity: T) -> Result<T, RepoError>;
}

/// The post store.
///
/// Implementations run [`Post::prepare_save`] on every full save, so the
/// status/publish-time invariant and slug derivation hold no matter which
/// caller saved. Unique title and slug violations surface as
/// `RepoError::DuplicateTitle` / `RepoError::DuplicateSlug`.
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError>;

    /// First save of a post.
    async fn insert(&self, post: Post) -> Result<Post, RepoError>;

    /// Later save of a post, replacing its editable fields and tag set.
    async fn update(&self, post: Post) -> Result<Post, RepoError>;

    /// Set status and publish time, writing only those two columns.
    async fn mark_published(&self, id: Uuid, at: DateTime<Utc>) -> Result<Post, RepoError>;

    /// Atomically add one view and return the new count.
    async fn increment_views(&self, id: Uuid) -> Result<u64, RepoError>;

    /// Atomically add one like and return the new count.
    async fn increment_likes(&self, id: Uuid) -> Result<u64, RepoError>;

    async fn count(&self, query: &PostQuery) -> Result<u64, RepoError>;

    /// Matching posts in listing order; `window` limits to one page.
    async fn list(
        &self,
        query: &PostQuery,
        window: Option<PageWindow>,
    ) -> Result<Vec<Post>, RepoError>;
}

/// Category repository.
#[async_trait]
pub trait CategoryRepository: BaseRepository<Category, Uuid> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError>;

    /// All categories ordered by name.
    async fn list(&self) -> Result<Vec<Category>, RepoError>;

    async fn children(&self, parent_id: Uuid) -> Result<Vec<Category>, RepoError>;
}

/// Tag repository.
#[async_trait]
pub trait TagRepository: BaseRepository<Tag, Uuid> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, RepoError>;

    /// Tags with the given ids; unknown ids are skipped.
    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Tag>, RepoError>;

    /// All tags, oldest first.
    async fn list(&self) -> Result<Vec<Tag>, RepoError>;
}

/// User profile repository, keyed by user id.
pub trait ProfileRepository: BaseRepository<UserProfile, Uuid> {}

impl<T> ProfileRepository for T where T: BaseRepository<UserProfile, Uuid> {}

/// Comment repository. Inserting a comment for a missing post fails with
/// `RepoError::Constraint`.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, Uuid> {
    /// Active comments on `post_id`, newest first.
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError>;
}
