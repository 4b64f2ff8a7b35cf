//! In-memory store - used when no database is configured, and in tests.
//!
//! All handles created from one [`InMemoryStore`] share the same tables, so
//! post queries can filter on category and tag slugs like the SQL store does.
//! Data is lost on process restart.

mod comments;
mod posts;
mod profiles;
mod taxonomy;


use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::{Category, Comment, Post, Tag, UserProfile};

pub use comments::InMemoryCommentRepository;
pub use posts::InMemoryPostRepository;
pub use profiles::InMemoryProfileRepository;
pub use taxonomy::{InMemoryCategoryRepository, InMemoryTagRepository};

#[derive(Default)]
struct Tables {
    posts: HashMap<Uuid, Post>,
    categories: HashMap<Uuid, Category>,
    tags: HashMap<Uuid, Tag>,
    profiles: HashMap<Uuid, UserProfile>,
    comments: HashMap<Uuid, Comment>,
}

type SharedTables = Arc<RwLock<Tables>>;

/// Shared in-memory tables.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: SharedTables,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn posts(&self) -> InMemoryPostRepository {
        InMemoryPostRepository::new(self.tables.clone())
    }

    pub fn categories(&self) -> InMemoryCategoryRepository {
        InMemoryCategoryRepository::new(self.tables.clone())
    }

    pub fn tags(&self) -> InMemoryTagRepository {
        InMemoryTagRepository::new(self.tables.clone())
    }

    pub fn profiles(&self) -> InMemoryProfileRepository {
        InMemoryProfileRepository::new(self.tables.clone())
    }

    pub fn comments(&self) -> InMemoryCommentRepository {
        InMemoryCommentRepository::new(self.tables.clone())
    }
}
