use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, DbConn, DbErr, EntityTrait, IntoActiveModel,
    PrimaryKeyTrait, SqlErr,
};

use quill_core::error::RepoError;
use quill_core::ports::BaseRepository;

/// Generic PostgreSQL repository implementation.
pub struct PostgresBaseRepository<E>
where
    E: EntityTrait,
{
    pub(crate) db: Arc<DbConn>,
    _entity: PhantomData<E>,
}

impl<E> PostgresBaseRepository<E>
where
    E: EntityTrait,
{
    pub fn new(db: Arc<DbConn>) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }
}

/// Translate a SeaORM error into the repository error vocabulary.
pub(crate) fn map_db_err(err: DbErr) -> RepoError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) => classify_unique_violation(&msg),
        Some(SqlErr::ForeignKeyConstraintViolation(msg)) => RepoError::Constraint(msg),
        _ => match err {
            DbErr::RecordNotFound(_) | DbErr::RecordNotUpdated => RepoError::NotFound,
            DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => RepoError::Connection(err.to_string()),
            other => RepoError::Query(other.to_string()),
        },
    }
}

/// Unique indexes are named `uq_<table>_<column>` by the migration.
pub(crate) fn classify_unique_violation(msg: &str) -> RepoError {
    if msg.contains("uq_posts_title") {
        RepoError::DuplicateTitle
    } else if msg.contains("uq_posts_slug") {
        RepoError::DuplicateSlug
    } else if let Some(name) = msg.split('"').nth(1) {
        RepoError::Duplicate(name.trim_start_matches("uq_").replace('_', " "))
    } else {
        RepoError::Duplicate(msg.to_string())
    }
}

#[async_trait]
impl<E, T, ID> BaseRepository<T, ID> for PostgresBaseRepository<E>
where
    E: EntityTrait,
    E::Model: IntoActiveModel<E::ActiveModel> + Sync + Send,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send + Sync,
    E::PrimaryKey: PrimaryKeyTrait<ValueType = ID>,
    ID: Send + Sync + Into<sea_orm::Value> + Clone + Copy + 'static,
    T: From<E::Model> + Into<E::ActiveModel> + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError> {
        let result = E::find_by_id(id).one(&*self.db).await.map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn insert(&self, entity: T) -> Result<T, RepoError> {
        let active_model: E::ActiveModel = entity.into();
        let model = active_model.insert(&*self.db).await.map_err(map_db_err)?;

        Ok(model.into())
    }

    async fn update(&self, entity: T) -> Result<T, RepoError> {
        let active_model: E::ActiveModel = entity.into();
        let model = active_model.update(&*self.db).await.map_err(map_db_err)?;

        Ok(model.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_post_constraints() {
        let title = r#"duplicate key value violates unique constraint "uq_posts_title""#;
        let slug = r#"duplicate key value violates unique constraint "uq_posts_slug""#;

        assert!(matches!(classify_unique_violation(title), RepoError::DuplicateTitle));
        assert!(matches!(classify_unique_violation(slug), RepoError::DuplicateSlug));
    }

    #[test]
    fn test_classify_other_constraints() {
        let msg = r#"duplicate key value violates unique constraint "uq_tags_name""#;
        assert!(matches!(
            classify_unique_violation(msg),
            RepoError::Duplicate(field) if field == "tags name"
        ));
    }

    #[test]
    fn test_record_not_updated_is_not_found() {
        assert!(matches!(map_db_err(DbErr::RecordNotUpdated), RepoError::NotFound));
        assert!(matches!(
            map_db_err(DbErr::Custom("boom".into())),
            RepoError::Query(_)
        ));
    }
}
