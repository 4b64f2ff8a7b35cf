//! Domain-level error types.

use thiserror::Error;

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {entity_type} {key}")]
    NotFound {
        entity_type: &'static str,
        key: String,
    },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("A post must belong to a category")]
    MissingCategory,

    #[error("A post with this title already exists")]
    DuplicateTitle,

    #[error("A post with this slug already exists")]
    DuplicateSlug,

    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    #[error("Only the author may modify this post")]
    Forbidden,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(entity_type: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            key: key.to_string(),
        }
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Unique constraint violated on post title")]
    DuplicateTitle,

    #[error("Unique constraint violated on post slug")]
    DuplicateSlug,

    /// Unique constraint on a category, tag or profile column.
    #[error("Unique constraint violated on {0}")]
    Duplicate(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

impl From<RepoError> for DomainError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::DuplicateTitle => DomainError::DuplicateTitle,
            RepoError::DuplicateSlug => DomainError::DuplicateSlug,
            RepoError::Duplicate(field) => DomainError::Duplicate(field),
            RepoError::Constraint(msg) => DomainError::Validation(msg),
            // Services resolve NotFound against the key they looked up;
            // reaching this arm means a row vanished mid-operation.
            RepoError::NotFound => DomainError::Internal("row disappeared".to_string()),
            RepoError::Connection(msg) | RepoError::Query(msg) => DomainError::Internal(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicates_keep_their_kind() {
        assert!(matches!(
            DomainError::from(RepoError::DuplicateSlug),
            DomainError::DuplicateSlug
        ));
        assert!(matches!(
            DomainError::from(RepoError::DuplicateTitle),
            DomainError::DuplicateTitle
        ));
        assert!(matches!(
            DomainError::from(RepoError::Duplicate("tag name".into())),
            DomainError::Duplicate(field) if field == "tag name"
        ));
    }

    #[test]
    fn test_not_found_message() {
        let err = DomainError::not_found("post", "abc");
        assert_eq!(err.to_string(), "Entity not found: post abc");
    }
}
