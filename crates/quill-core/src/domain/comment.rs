use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A reader's comment on a post. Inactive comments are hidden from readers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub name: String,
    pub body: String,
    pub created_time: DateTime<Utc>,
    pub updated_time: DateTime<Utc>,
    pub active: bool,
}

impl Comment {
    /// New comments are visible straight away.
    pub fn new(post_id: Uuid, name: String, body: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            post_id,
            name,
            body,
            created_time: now,
            updated_time: now,
            active: true,
        }
    }

    pub fn set_active(&mut self, active: bool, now: DateTime<Utc>) {
        self.active = active;
        self.updated_time = now;
    }
}

/// Newest first, ties broken by id.
pub fn comment_order(a: &Comment, b: &Comment) -> std::cmp::Ordering {
    b.created_time
        .cmp(&a.created_time)
        .then_with(|| a.id.cmp(&b.id))
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn test_new_comment_is_active() {
        let comment = Comment::new(Uuid::new_v4(), "ann".into(), "Nice post".into());
        assert!(comment.active);
        assert_eq!(comment.created_time, comment.updated_time);
    }

    #[test]
    fn test_hiding_touches_updated_time() {
        let mut comment = Comment::new(Uuid::new_v4(), "ann".into(), "Nice post".into());
        let later = comment.created_time + Duration::minutes(5);

        comment.set_active(false, later);

        assert!(!comment.active);
        assert_eq!(comment.updated_time, later);
        assert!(comment.created_time < later);
    }

    #[test]
    fn test_newest_comment_first() {
        let post_id = Uuid::new_v4();
        let old = Comment::new(post_id, "a".into(), "first".into());
        let mut new = Comment::new(post_id, "b".into(), "second".into());
        new.created_time = old.created_time + Duration::seconds(1);

        let mut comments = vec![old.clone(), new.clone()];
        comments.sort_by(comment_order);

        assert_eq!(comments, vec![new, old]);
    }
}
