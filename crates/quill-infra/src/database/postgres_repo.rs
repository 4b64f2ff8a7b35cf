//! PostgreSQL repository implementations.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, NullOrdering, Order, Query};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbConn, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, Set, TransactionTrait,
};
use uuid::Uuid;

use quill_core::domain::{Category, Comment, PageWindow, Post, PostQuery, Tag};
use quill_core::error::RepoError;
use quill_core::ports::{CategoryRepository, CommentRepository, PostRepository, TagRepository};

use super::entity::category::{self, Entity as CategoryEntity};
use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::post_tag::{self, Entity as PostTagEntity};
use super::entity::tag::{self, Entity as TagEntity};
use super::entity::user_profile::Entity as UserProfileEntity;
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL category repository.
pub type PostgresCategoryRepository = PostgresBaseRepository<CategoryEntity>;

/// PostgreSQL tag repository.
pub type PostgresTagRepository = PostgresBaseRepository<TagEntity>;

/// PostgreSQL profile repository.
pub type PostgresProfileRepository = PostgresBaseRepository<UserProfileEntity>;

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let result = CategoryEntity::find()
            .filter(category::Column::Slug.eq(slug))
            .one(&*self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn list(&self) -> Result<Vec<Category>, RepoError> {
        let result = CategoryEntity::find()
            .order_by_asc(category::Column::Name)
            .all(&*self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn children(&self, parent_id: Uuid) -> Result<Vec<Category>, RepoError> {
        let result = CategoryEntity::find()
            .filter(category::Column::ParentId.eq(parent_id))
            .order_by_asc(category::Column::Name)
            .all(&*self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl TagRepository for PostgresTagRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, RepoError> {
        let result = TagEntity::find()
            .filter(tag::Column::Slug.eq(slug))
            .one(&*self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Tag>, RepoError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = TagEntity::find()
            .filter(tag::Column::Id.is_in(ids.iter().copied()))
            .all(&*self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn list(&self) -> Result<Vec<Tag>, RepoError> {
        let result = TagEntity::find()
            .order_by_asc(tag::Column::CreatedTime)
            .order_by_asc(tag::Column::Id)
            .all(&*self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let result = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .filter(comment::Column::Active.eq(true))
            .order_by_desc(comment::Column::CreatedTime)
            .order_by_asc(comment::Column::Id)
            .all(&*self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

/// PostgreSQL post repository. Tag sets live in `post_tags`.
pub struct PostgresPostRepository {
    db: Arc<DbConn>,
}

impl PostgresPostRepository {
    pub fn new(db: Arc<DbConn>) -> Self {
        Self { db }
    }

    /// Build the filtered select for `query`. `None` means an unknown
    /// category or tag slug, i.e. nothing can match.
    async fn select(&self, query: &PostQuery) -> Result<Option<Select<PostEntity>>, RepoError> {
        let mut select = PostEntity::find();

        if let Some(status) = query.status {
            select = select.filter(post::Column::Status.eq(post::Status::from(status)));
        }
        if let Some(author_id) = query.author_id {
            select = select.filter(post::Column::AuthorId.eq(author_id));
        }
        if let Some(slug) = &query.category_slug {
            let Some(category) = CategoryEntity::find()
                .filter(category::Column::Slug.eq(slug.as_str()))
                .one(&*self.db)
                .await
                .map_err(map_db_err)?
            else {
                return Ok(None);
            };
            select = select.filter(post::Column::CategoryId.eq(category.id));
        }
        if let Some(slug) = &query.tag_slug {
            let Some(tag) = TagEntity::find()
                .filter(tag::Column::Slug.eq(slug.as_str()))
                .one(&*self.db)
                .await
                .map_err(map_db_err)?
            else {
                return Ok(None);
            };
            select = select.filter(
                post::Column::Id.in_subquery(
                    Query::select()
                        .column(post_tag::Column::PostId)
                        .from(PostTagEntity)
                        .and_where(post_tag::Column::TagId.eq(tag.id))
                        .to_owned(),
                ),
            );
        }

        Ok(Some(select))
    }

    /// Attach tag sets to freshly loaded rows.
    async fn with_tags<C>(&self, db: &C, models: Vec<post::Model>) -> Result<Vec<Post>, RepoError>
    where
        C: ConnectionTrait,
    {
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
        let links = PostTagEntity::find()
            .filter(post_tag::Column::PostId.is_in(ids))
            .all(db)
            .await
            .map_err(map_db_err)?;

        let mut tags: HashMap<Uuid, BTreeSet<Uuid>> = HashMap::new();
        for link in links {
            tags.entry(link.post_id).or_default().insert(link.tag_id);
        }

        Ok(models
            .into_iter()
            .map(|m| {
                let tag_ids = tags.remove(&m.id).unwrap_or_default();
                m.into_post(tag_ids)
            })
            .collect())
    }

    async fn with_tags_one<C>(&self, db: &C, model: post::Model) -> Result<Post, RepoError>
    where
        C: ConnectionTrait,
    {
        self.with_tags(db, vec![model])
            .await?
            .pop()
            .ok_or(RepoError::NotFound)
    }

    async fn replace_tags<C>(&self, db: &C, post_id: Uuid, tag_ids: &BTreeSet<Uuid>) -> Result<(), RepoError>
    where
        C: ConnectionTrait,
    {
        PostTagEntity::delete_many()
            .filter(post_tag::Column::PostId.eq(post_id))
            .exec(db)
            .await
            .map_err(map_db_err)?;

        if tag_ids.is_empty() {
            return Ok(());
        }

        let links = tag_ids.iter().map(|tag_id| post_tag::ActiveModel {
            post_id: Set(post_id),
            tag_id: Set(*tag_id),
        });
        PostTagEntity::insert_many(links)
            .exec(db)
            .await
            .map_err(map_db_err)?;

        Ok(())
    }

    /// Apply a single-column update and return the new row.
    async fn update_returning(
        &self,
        id: Uuid,
        update: sea_orm::UpdateMany<PostEntity>,
    ) -> Result<post::Model, RepoError> {
        update
            .filter(post::Column::Id.eq(id))
            .exec_with_returning(&*self.db)
            .await
            .map_err(map_db_err)?
            .pop()
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        tracing::debug!(post_id = %id, "Finding post by id");

        match PostEntity::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(map_db_err)?
        {
            Some(model) => Ok(Some(self.with_tags_one(&*self.db, model).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        tracing::debug!(slug = %slug, "Finding post by slug");

        match PostEntity::find()
            .filter(post::Column::Slug.eq(slug))
            .one(&*self.db)
            .await
            .map_err(map_db_err)?
        {
            Some(model) => Ok(Some(self.with_tags_one(&*self.db, model).await?)),
            None => Ok(None),
        }
    }

    async fn insert(&self, mut post: Post) -> Result<Post, RepoError> {
        post.prepare_save(true, Utc::now());

        let txn = self.db.begin().await.map_err(map_db_err)?;
        let model = post::ActiveModel::from(&post)
            .insert(&txn)
            .await
            .map_err(map_db_err)?;
        self.replace_tags(&txn, post.id, &post.tag_ids).await?;
        txn.commit().await.map_err(map_db_err)?;

        tracing::debug!(post_id = %model.id, slug = %model.slug, "Post inserted");
        Ok(model.into_post(post.tag_ids))
    }

    async fn update(&self, mut post: Post) -> Result<Post, RepoError> {
        post.prepare_save(false, Utc::now());

        let txn = self.db.begin().await.map_err(map_db_err)?;
        let model = post::editable_columns(&post)
            .update(&txn)
            .await
            .map_err(map_db_err)?;
        self.replace_tags(&txn, post.id, &post.tag_ids).await?;
        txn.commit().await.map_err(map_db_err)?;

        tracing::debug!(post_id = %model.id, "Post updated");
        Ok(model.into_post(post.tag_ids))
    }

    async fn mark_published(&self, id: Uuid, at: DateTime<Utc>) -> Result<Post, RepoError> {
        let update = PostEntity::update_many().set(post::ActiveModel {
            status: Set(post::Status::Published),
            published_time: Set(Some(at.into())),
            ..Default::default()
        });
        let model = self.update_returning(id, update).await?;

        self.with_tags_one(&*self.db, model).await
    }

    async fn increment_views(&self, id: Uuid) -> Result<u64, RepoError> {
        let update = PostEntity::update_many()
            .col_expr(post::Column::Views, Expr::col(post::Column::Views).add(1));
        let model = self.update_returning(id, update).await?;

        Ok(model.views.max(0) as u64)
    }

    async fn increment_likes(&self, id: Uuid) -> Result<u64, RepoError> {
        let update = PostEntity::update_many()
            .col_expr(post::Column::Likenum, Expr::col(post::Column::Likenum).add(1));
        let model = self.update_returning(id, update).await?;

        Ok(model.likenum.max(0) as u64)
    }

    async fn count(&self, query: &PostQuery) -> Result<u64, RepoError> {
        match self.select(query).await? {
            Some(select) => select.count(&*self.db).await.map_err(map_db_err),
            None => Ok(0),
        }
    }

    async fn list(
        &self,
        query: &PostQuery,
        window: Option<PageWindow>,
    ) -> Result<Vec<Post>, RepoError> {
        let Some(select) = self.select(query).await? else {
            return Ok(Vec::new());
        };

        let mut select = select
            .order_by_with_nulls(post::Column::PublishedTime, Order::Desc, NullOrdering::Last)
            .order_by_desc(post::Column::CreatedTime)
            .order_by_asc(post::Column::Id);
        if let Some(window) = window {
            select = select.offset(window.offset).limit(window.limit);
        }

        let models = select.all(&*self.db).await.map_err(map_db_err)?;
        self.with_tags(&*self.db, models).await
    }
}
