//! Application services - the operations handlers call.

mod comments;
mod posts;
mod profiles;
mod taxonomy;

pub use comments::{CommentService, MAX_COMMENTER_NAME_LEN};
pub use posts::{MAX_TITLE_LEN, PostInput, PostService};
pub use profiles::ProfileService;
pub use taxonomy::TaxonomyService;
