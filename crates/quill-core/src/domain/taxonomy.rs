use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::slug::slugify;

/// Category - a node in the classification tree. Every post has one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub parent_id: Option<Uuid>,
}

impl Category {
    /// Create a category; the slug falls back to the transliterated name.
    pub fn new(name: String, slug: Option<String>, parent_id: Option<Uuid>) -> Self {
        let slug = slug.unwrap_or_else(|| slugify(&name));
        Self {
            id: Uuid::new_v4(),
            name,
            slug,
            parent_id,
        }
    }
}

/// Tag - a flat label attached to any number of posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub created_time: DateTime<Utc>,
}

impl Tag {
    pub fn new(name: String, slug: Option<String>) -> Self {
        let slug = slug.unwrap_or_else(|| slugify(&name));
        Self {
            id: Uuid::new_v4(),
            name,
            slug,
            created_time: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_slug_defaults_to_name() {
        let category = Category::new("Systems Programming".into(), None, None);
        assert_eq!(category.slug, "systems-programming");
        assert_eq!(category.parent_id, None);
    }

    #[test]
    fn test_tag_keeps_explicit_slug() {
        let tag = Tag::new("Web Development".into(), Some("web-dev".into()));
        assert_eq!(tag.slug, "web-dev");
    }
}
