//! # Quill Core
//!
//! The domain layer of the Quill blog service.
//! Posts, their lifecycle, the category/tag taxonomy, pagination and the
//! services that tie them together. No infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::{DomainError, RepoError};
