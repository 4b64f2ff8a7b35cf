//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`.
//!
//! ## Feature Flags
//!
//! - `postgres` (default) - PostgreSQL store via SeaORM
//!
//! Without `postgres` only the in-memory store is available.

pub mod auth;
pub mod memory;

#[cfg(feature = "postgres")]
pub mod database;

pub use auth::{JwtConfig, JwtTokenService};
pub use memory::InMemoryStore;

#[cfg(feature = "postgres")]
pub use database::{
    DatabaseConfig, PostgresCategoryRepository, PostgresCommentRepository,
    PostgresPostRepository, PostgresProfileRepository, PostgresTagRepository,
};
