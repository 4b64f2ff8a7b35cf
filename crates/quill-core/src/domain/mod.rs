//! Domain entities - the core business objects.

mod comment;
mod pagination;
mod post;
mod profile;
pub mod slug;
mod taxonomy;

pub use comment::{Comment, comment_order};
pub use pagination::{Page, PageRequest, PageWindow, Paginator};
pub use post::{Post, PostQuery, PostStatus, listing_order};
pub use profile::UserProfile;
pub use taxonomy::{Category, Tag};
