//! Reader comments and their moderation.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::Comment;
use crate::error::{DomainError, RepoError};
use crate::ports::{CommentRepository, PostRepository};

pub const MAX_COMMENTER_NAME_LEN: usize = 80;

pub struct CommentService {
    comments: Arc<dyn CommentRepository>,
    posts: Arc<dyn PostRepository>,
}

impl CommentService {
    pub fn new(comments: Arc<dyn CommentRepository>, posts: Arc<dyn PostRepository>) -> Self {
        Self { comments, posts }
    }

    /// Leave a comment on a post. Anyone may comment; no account is needed.
    pub async fn add(&self, post_id: Uuid, name: &str, body: &str) -> Result<Comment, DomainError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::Validation("name must not be empty".to_string()));
        }
        if name.chars().count() > MAX_COMMENTER_NAME_LEN {
            return Err(DomainError::Validation(format!(
                "name must be at most {MAX_COMMENTER_NAME_LEN} characters"
            )));
        }
        if body.trim().is_empty() {
            return Err(DomainError::Validation("body must not be empty".to_string()));
        }

        if self.posts.find_by_id(post_id).await?.is_none() {
            return Err(DomainError::not_found("post", post_id));
        }

        let comment = self
            .comments
            .insert(Comment::new(post_id, name.to_string(), body.to_string()))
            .await
            .map_err(|e| match e {
                // The post was deleted between the check and the insert.
                RepoError::Constraint(_) => DomainError::not_found("post", post_id),
                other => other.into(),
            })?;

        tracing::info!(comment_id = %comment.id, post_id = %post_id, "Comment added");
        Ok(comment)
    }

    /// Visible comments on a post, newest first.
    pub async fn for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, DomainError> {
        if self.posts.find_by_id(post_id).await?.is_none() {
            return Err(DomainError::not_found("post", post_id));
        }

        Ok(self.comments.list_for_post(post_id).await?)
    }

    /// Show or hide a comment. Only the author of the commented post may.
    pub async fn moderate(
        &self,
        actor: Uuid,
        comment_id: Uuid,
        active: bool,
    ) -> Result<Comment, DomainError> {
        let mut comment = self
            .comments
            .find_by_id(comment_id)
            .await?
            .ok_or_else(|| DomainError::not_found("comment", comment_id))?;

        let post = self
            .posts
            .find_by_id(comment.post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", comment.post_id))?;
        if !post.is_authored_by(actor) {
            return Err(DomainError::Forbidden);
        }

        comment.set_active(active, Utc::now());
        let saved = self.comments.update(comment).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::not_found("comment", comment_id),
            other => other.into(),
        })?;

        tracing::info!(comment_id = %comment_id, active, "Comment moderated");
        Ok(saved)
    }
}
