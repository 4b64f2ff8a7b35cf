//! Post entity for SeaORM.

use std::collections::BTreeSet;

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use quill_core::domain::PostStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum Status {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "published")]
    Published,
}

impl From<Status> for PostStatus {
    fn from(status: Status) -> Self {
        match status {
            Status::Draft => PostStatus::Draft,
            Status::Published => PostStatus::Published,
        }
    }
}

impl From<PostStatus> for Status {
    fn from(status: PostStatus) -> Self {
        match status {
            PostStatus::Draft => Status::Draft,
            PostStatus::Published => Status::Published,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub author_id: Uuid,
    #[sea_orm(unique)]
    pub title: String,
    #[sea_orm(unique)]
    pub slug: String,
    #[sea_orm(column_type = "Text")]
    pub body: String,
    pub status: Status,
    pub published_time: Option<DateTimeWithTimeZone>,
    pub created_time: DateTimeWithTimeZone,
    pub updated_time: DateTimeWithTimeZone,
    pub category_id: Uuid,
    pub views: i64,
    pub likenum: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    Category,
    #[sea_orm(has_many = "super::post_tag::Entity")]
    PostTag,
    #[sea_orm(has_many = "super::comment::Entity")]
    Comment,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comment.def()
    }
}

impl Related<super::tag::Entity> for Entity {
    fn to() -> RelationDef {
        super::post_tag::Relation::Tag.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::post_tag::Relation::Post.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Conversion from SeaORM Model to Domain Post; tags live in `post_tags`.
    pub fn into_post(self, tag_ids: BTreeSet<Uuid>) -> quill_core::domain::Post {
        quill_core::domain::Post {
            id: self.id,
            author_id: self.author_id,
            title: self.title,
            slug: self.slug,
            body: self.body,
            status: self.status.into(),
            published_time: self.published_time.map(Into::into),
            created_time: self.created_time.into(),
            updated_time: self.updated_time.into(),
            category_id: self.category_id,
            tag_ids,
            views: self.views.max(0) as u64,
            likenum: self.likenum.max(0) as u64,
        }
    }
}

/// Every column, for the first save.
impl From<&quill_core::domain::Post> for ActiveModel {
    fn from(post: &quill_core::domain::Post) -> Self {
        Self {
            id: Set(post.id),
            author_id: Set(post.author_id),
            title: Set(post.title.clone()),
            slug: Set(post.slug.clone()),
            body: Set(post.body.clone()),
            status: Set(post.status.into()),
            published_time: Set(post.published_time.map(Into::into)),
            created_time: Set(post.created_time.into()),
            updated_time: Set(post.updated_time.into()),
            category_id: Set(post.category_id),
            views: Set(post.views as i64),
            likenum: Set(post.likenum as i64),
        }
    }
}

/// Only the columns a full save may change. Author, creation time and the
/// counters stay untouched so a stale copy cannot roll them back.
pub fn editable_columns(post: &quill_core::domain::Post) -> ActiveModel {
    ActiveModel {
        id: sea_orm::Unchanged(post.id),
        title: Set(post.title.clone()),
        slug: Set(post.slug.clone()),
        body: Set(post.body.clone()),
        status: Set(post.status.into()),
        published_time: Set(post.published_time.map(Into::into)),
        updated_time: Set(post.updated_time.into()),
        category_id: Set(post.category_id),
        ..Default::default()
    }
}
