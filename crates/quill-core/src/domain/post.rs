use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::slug::slugify;

/// Lifecycle state of a post. A post saved without one is published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    #[default]
    Published,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(PostStatus::Draft),
            "published" => Ok(PostStatus::Published),
            other => Err(format!("unknown post status '{other}'")),
        }
    }
}

/// Post entity - a blog article with its lifecycle state.
///
/// `published_time` is `Some` exactly when `status` is `Published`; every
/// store re-establishes this through [`Post::prepare_save`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    /// Empty until the first save derives it.
    pub slug: String,
    pub body: String,
    pub status: PostStatus,
    pub published_time: Option<DateTime<Utc>>,
    pub created_time: DateTime<Utc>,
    pub updated_time: DateTime<Utc>,
    pub category_id: Uuid,
    pub tag_ids: BTreeSet<Uuid>,
    pub views: u64,
    pub likenum: u64,
}

impl Post {
    /// Create an unsaved post owned by `author_id`.
    pub fn new(
        author_id: Uuid,
        title: String,
        body: String,
        status: PostStatus,
        category_id: Uuid,
        tag_ids: BTreeSet<Uuid>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            author_id,
            title,
            slug: String::new(),
            body,
            status,
            published_time: None,
            created_time: now,
            updated_time: now,
            category_id,
            tag_ids,
            views: 0,
            likenum: 0,
        }
    }

    /// Run the save-time lifecycle: slug derivation, status normalization and
    /// the `updated_time` refresh. `first_save` is true when the post has
    /// never been persisted.
    pub fn prepare_save(&mut self, first_save: bool, now: DateTime<Utc>) {
        self.derive_slug(first_save);
        self.normalize_status(now);
        self.updated_time = now;
    }

    /// Derive the slug from the title on first save, or whenever it is
    /// missing. An existing slug on a saved post survives title edits.
    pub fn derive_slug(&mut self, first_save: bool) {
        if first_save || self.slug.is_empty() {
            self.slug = slugify(&self.title);
        }
    }

    /// Make `published_time` agree with `status`.
    pub fn normalize_status(&mut self, now: DateTime<Utc>) {
        match (self.status, self.published_time) {
            (PostStatus::Draft, Some(_)) => self.published_time = None,
            (PostStatus::Published, None) => self.published_time = Some(now),
            _ => {}
        }
    }

    /// Explicit publish transition. Re-publishing moves `published_time`
    /// forward.
    pub fn publish(&mut self, now: DateTime<Utc>) {
        self.status = PostStatus::Published;
        self.published_time = Some(now);
    }

    pub fn viewed(&mut self) {
        self.views = self.views.saturating_add(1);
    }

    pub fn like(&mut self) {
        self.likenum = self.likenum.saturating_add(1);
    }

    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Published
    }

    pub fn is_authored_by(&self, user_id: Uuid) -> bool {
        self.author_id == user_id
    }
}

/// Composable filter over the post store.
///
/// `all()` and `published()` are the two base views; the `by_*` methods
/// narrow either of them. Results are ordered by `published_time`
/// descending with drafts last, then `created_time` descending, then id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostQuery {
    pub status: Option<PostStatus>,
    pub author_id: Option<Uuid>,
    pub category_slug: Option<String>,
    pub tag_slug: Option<String>,
}

impl PostQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn published() -> Self {
        Self::default().by_status(PostStatus::Published)
    }

    pub fn by_author(mut self, author_id: Uuid) -> Self {
        self.author_id = Some(author_id);
        self
    }

    pub fn by_status(mut self, status: PostStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn by_category(mut self, slug: impl Into<String>) -> Self {
        self.category_slug = Some(slug.into());
        self
    }

    pub fn by_tag(mut self, slug: impl Into<String>) -> Self {
        self.tag_slug = Some(slug.into());
        self
    }
}

/// Listing order shared by every store.
pub fn listing_order(a: &Post, b: &Post) -> std::cmp::Ordering {
    // None < Some for Option, so reversing puts drafts last.
    b.published_time
        .cmp(&a.published_time)
        .then_with(|| b.created_time.cmp(&a.created_time))
        .then_with(|| a.id.cmp(&b.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn draft(title: &str) -> Post {
        Post::new(
            Uuid::new_v4(),
            title.to_string(),
            "body".to_string(),
            PostStatus::Draft,
            Uuid::new_v4(),
            BTreeSet::new(),
        )
    }

    #[test]
    fn test_first_save_derives_slug() {
        let mut post = draft("Hello World");
        post.prepare_save(true, Utc::now());

        assert_eq!(post.slug, "hello-world");
        assert_eq!(post.published_time, None);
    }

    #[test]
    fn test_slug_is_stable_after_title_edit() {
        let mut post = draft("Hello World");
        post.prepare_save(true, Utc::now());

        post.title = "Goodbye World".to_string();
        post.prepare_save(false, Utc::now());

        assert_eq!(post.slug, "hello-world");
    }

    #[test]
    fn test_missing_slug_is_rederived() {
        let mut post = draft("Hello World");
        post.prepare_save(true, Utc::now());

        post.slug.clear();
        post.title = "Second Title".to_string();
        post.prepare_save(false, Utc::now());

        assert_eq!(post.slug, "second-title");
    }

    #[test]
    fn test_first_save_replaces_preset_slug() {
        let mut post = draft("Hello World");
        post.slug = "custom".to_string();
        post.prepare_save(true, Utc::now());

        assert_eq!(post.slug, "hello-world");
    }

    #[test]
    fn test_normalize_clears_time_on_draft() {
        let mut post = draft("Draft");
        post.published_time = Some(Utc::now());
        post.prepare_save(false, Utc::now());

        assert_eq!(post.status, PostStatus::Draft);
        assert_eq!(post.published_time, None);
    }

    #[test]
    fn test_normalize_sets_time_on_published() {
        let now = Utc::now();
        let mut post = draft("Published");
        post.status = PostStatus::Published;
        post.prepare_save(true, now);

        assert_eq!(post.published_time, Some(now));
    }

    #[test]
    fn test_normalize_keeps_existing_publish_time() {
        let earlier = Utc::now() - Duration::days(3);
        let mut post = draft("Published");
        post.status = PostStatus::Published;
        post.published_time = Some(earlier);
        post.prepare_save(false, Utc::now());

        assert_eq!(post.published_time, Some(earlier));
    }

    #[test]
    fn test_publish_advances_time() {
        let mut post = draft("Hello World");
        let created = post.created_time;
        let first = created + Duration::seconds(1);
        let second = first + Duration::seconds(1);

        post.publish(first);
        assert!(post.is_published());
        assert_eq!(post.published_time, Some(first));
        assert!(first >= created);

        post.publish(second);
        assert_eq!(post.published_time, Some(second));
    }

    #[test]
    fn test_counters_touch_only_their_field() {
        let mut post = draft("Counters");
        let before = post.clone();

        post.viewed();
        assert_eq!(post.views, before.views + 1);
        assert_eq!(post.likenum, before.likenum);

        post.like();
        assert_eq!(post.likenum, before.likenum + 1);
        assert_eq!(
            Post {
                views: before.views,
                likenum: before.likenum,
                ..post
            },
            before
        );
    }

    #[test]
    fn test_listing_order_puts_drafts_last() {
        let now = Utc::now();
        let mut old = draft("Old");
        old.publish(now - Duration::days(1));
        let mut new = draft("New");
        new.publish(now);
        let unpublished = draft("Unpublished");

        let mut posts = vec![unpublished.clone(), old.clone(), new.clone()];
        posts.sort_by(listing_order);

        let titles: Vec<_> = posts.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["New", "Old", "Unpublished"]);
    }

    #[test]
    fn test_status_serde() {
        assert_eq!(
            serde_json::to_string(&PostStatus::Published).unwrap(),
            "\"published\""
        );
        assert_eq!("draft".parse::<PostStatus>().unwrap(), PostStatus::Draft);
        assert!("p".parse::<PostStatus>().is_err());
    }

    #[test]
    fn test_unspecified_status_is_published() {
        assert_eq!(PostStatus::default(), PostStatus::Published);
    }

    #[test]
    fn test_query_composes() {
        let author = Uuid::new_v4();
        let query = PostQuery::published().by_author(author).by_tag("rust");

        assert_eq!(query.status, Some(PostStatus::Published));
        assert_eq!(query.author_id, Some(author));
        assert_eq!(query.tag_slug.as_deref(), Some("rust"));
        assert_eq!(query.category_slug, None);
    }
}
