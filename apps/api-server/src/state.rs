//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::ports::{
    CategoryRepository, CommentRepository, PostRepository, ProfileRepository, TagRepository,
};
use quill_core::services::{CommentService, PostService, ProfileService, TaxonomyService};
use quill_infra::InMemoryStore;

#[cfg(feature = "postgres")]
use quill_infra::{
    DatabaseConfig, PostgresCategoryRepository, PostgresCommentRepository,
    PostgresPostRepository, PostgresProfileRepository, PostgresTagRepository,
};

use crate::config::ListingConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<PostService>,
    pub taxonomy: Arc<TaxonomyService>,
    pub profiles: Arc<ProfileService>,
    pub comments: Arc<CommentService>,
    pub listings: ListingConfig,
    /// Which store backs the repositories.
    pub storage: &'static str,
}

/// One set of repositories, all backed by the same store.
struct Repositories {
    posts: Arc<dyn PostRepository>,
    categories: Arc<dyn CategoryRepository>,
    tags: Arc<dyn TagRepository>,
    profiles: Arc<dyn ProfileRepository>,
    comments: Arc<dyn CommentRepository>,
    kind: &'static str,
}

impl Repositories {
    fn in_memory() -> Self {
        let store = InMemoryStore::new();
        Self {
            posts: Arc::new(store.posts()),
            categories: Arc::new(store.categories()),
            tags: Arc::new(store.tags()),
            profiles: Arc::new(store.profiles()),
            comments: Arc::new(store.comments()),
            kind: "memory",
        }
    }

    #[cfg(feature = "postgres")]
    async fn connect(config: Option<&DatabaseConfig>) -> Self {
        let Some(config) = config else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return Self::in_memory();
        };

        match quill_infra::database::connect(config).await {
            Ok(db) => {
                let db = Arc::new(db);
                Self {
                    posts: Arc::new(PostgresPostRepository::new(db.clone())),
                    categories: Arc::new(PostgresCategoryRepository::new(db.clone())),
                    tags: Arc::new(PostgresTagRepository::new(db.clone())),
                    profiles: Arc::new(PostgresProfileRepository::new(db.clone())),
                    comments: Arc::new(PostgresCommentRepository::new(db)),
                    kind: "postgres",
                }
            }
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                Self::in_memory()
            }
        }
    }
}

impl AppState {
    /// Build the application state with appropriate implementations.
    #[cfg(feature = "postgres")]
    pub async fn new(db_config: Option<&DatabaseConfig>, listings: ListingConfig) -> Self {
        Self::from_repositories(Repositories::connect(db_config).await, listings)
    }

    #[cfg(not(feature = "postgres"))]
    pub async fn new(listings: ListingConfig) -> Self {
        tracing::info!("Running without postgres feature - using in-memory repositories");
        Self::from_repositories(Repositories::in_memory(), listings)
    }

    /// State over a fresh in-memory store.
    #[cfg(test)]
    pub fn in_memory(listings: ListingConfig) -> Self {
        Self::from_repositories(Repositories::in_memory(), listings)
    }

    fn from_repositories(repos: Repositories, listings: ListingConfig) -> Self {
        let comments = CommentService::new(repos.comments, repos.posts.clone());
        let posts = PostService::new(repos.posts, repos.categories.clone(), repos.tags.clone());
        let taxonomy = TaxonomyService::new(repos.categories, repos.tags);
        let profiles = ProfileService::new(repos.profiles);

        tracing::info!(storage = repos.kind, "Application state initialized");

        Self {
            posts: Arc::new(posts),
            taxonomy: Arc::new(taxonomy),
            profiles: Arc::new(profiles),
            comments: Arc::new(comments),
            listings,
            storage: repos.kind,
        }
    }
}
