use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;
use sea_orm::{DatabaseBackend, DbConn, MockDatabase, MockExecResult};
use uuid::Uuid;

use quill_core::domain::{PageWindow, Post, PostQuery, PostStatus};
use quill_core::error::RepoError;
use quill_core::ports::{CommentRepository, PostRepository};

use crate::database::entity::{category, comment, post, post_tag};
use crate::database::postgres_repo::{PostgresCommentRepository, PostgresPostRepository};

fn post_row(id: Uuid, views: i64) -> post::Model {
    let now = Utc::now();
    post::Model {
        id,
        author_id: Uuid::new_v4(),
        title: "Test Post".to_owned(),
        slug: "test-post".to_owned(),
        body: "Content".to_owned(),
        status: post::Status::Draft,
        published_time: None,
        created_time: now.into(),
        updated_time: now.into(),
        category_id: Uuid::new_v4(),
        views,
        likenum: 0,
    }
}

fn done() -> MockExecResult {
    MockExecResult {
        last_insert_id: 0,
        rows_affected: 0,
    }
}

/// Every statement the mock saw, with bound values inlined.
/// Repositories sharing `db` must be dropped first.
fn sent_sql(db: Arc<DbConn>) -> Vec<String> {
    let db = Arc::try_unwrap(db).unwrap_or_else(|_| panic!("connection is still shared"));
    db.into_transaction_log()
        .iter()
        .flat_map(|txn| txn.statements().iter().map(ToString::to_string))
        .collect()
}

/// The `SET` list of an `UPDATE`.
fn set_clause(sql: &str) -> &str {
    let start = sql.find(" SET ").expect("not an UPDATE") + " SET ".len();
    let end = sql.find(" WHERE ").unwrap_or(sql.len());
    &sql[start..end]
}

#[tokio::test]
async fn test_find_post_by_id_loads_tags() {
    let post_id = Uuid::new_v4();
    let tag_a = Uuid::new_v4();
    let tag_b = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![post_row(post_id, 3)]])
        .append_query_results([vec![
            post_tag::Model { post_id, tag_id: tag_a },
            post_tag::Model { post_id, tag_id: tag_b },
        ]])
        .into_connection();

    let repo = PostgresPostRepository::new(Arc::new(db));
    let post = repo.find_by_id(post_id).await.unwrap().unwrap();

    assert_eq!(post.id, post_id);
    assert_eq!(post.title, "Test Post");
    assert_eq!(post.status, PostStatus::Draft);
    assert_eq!(post.views, 3);
    assert_eq!(post.tag_ids, BTreeSet::from([tag_a, tag_b]));
}

#[tokio::test]
async fn test_find_missing_post_is_none() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<post::Model>::new()])
        .into_connection();

    let repo = PostgresPostRepository::new(Arc::new(db));
    assert!(repo.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_increment_views_is_one_atomic_update() {
    let post_id = Uuid::new_v4();
    let db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![post_row(post_id, 8)]])
            .into_connection(),
    );

    let repo = PostgresPostRepository::new(db.clone());
    assert_eq!(repo.increment_views(post_id).await.unwrap(), 8);
    drop(repo);

    let sql = sent_sql(db);
    assert_eq!(sql.len(), 1);
    assert!(sql[0].starts_with(r#"UPDATE "posts""#));
    assert_eq!(set_clause(&sql[0]), r#""views" = "views" + 1"#);
    assert!(sql[0].contains(&post_id.to_string()));
    assert!(sql[0].contains(" RETURNING "));
}

#[tokio::test]
async fn test_increment_likes_touches_only_likenum() {
    let post_id = Uuid::new_v4();
    let mut row = post_row(post_id, 0);
    row.likenum = 5;
    let db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row]])
            .into_connection(),
    );

    let repo = PostgresPostRepository::new(db.clone());
    assert_eq!(repo.increment_likes(post_id).await.unwrap(), 5);
    drop(repo);

    let sql = sent_sql(db);
    assert_eq!(sql.len(), 1);
    assert_eq!(set_clause(&sql[0]), r#""likenum" = "likenum" + 1"#);
}

#[tokio::test]
async fn test_increment_on_missing_row_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<post::Model>::new()])
        .into_connection();

    let repo = PostgresPostRepository::new(Arc::new(db));
    let err = repo.increment_likes(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, RepoError::NotFound));
}

#[tokio::test]
async fn test_mark_published_sets_status_and_time_only() {
    let post_id = Uuid::new_v4();
    let at = Utc::now();
    let mut row = post_row(post_id, 0);
    row.status = post::Status::Published;
    row.published_time = Some(at.into());

    let db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row]])
            .append_query_results([Vec::<post_tag::Model>::new()])
            .into_connection(),
    );

    let repo = PostgresPostRepository::new(db.clone());
    let post = repo.mark_published(post_id, at).await.unwrap();
    drop(repo);

    assert!(post.is_published());
    assert_eq!(post.published_time, Some(at));
    assert!(post.tag_ids.is_empty());

    let sql = sent_sql(db);
    let set = set_clause(&sql[0]);
    assert!(set.contains(r#""status" = 'published'"#));
    assert!(set.contains(r#""published_time" = "#));
    assert!(!set.contains(r#""title""#));
    assert!(!set.contains(r#""views""#));
}

#[tokio::test]
async fn test_list_orders_unpublished_last_and_windows() {
    let db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<post::Model>::new()])
            .into_connection(),
    );
    let window = PageWindow {
        number: 2,
        num_pages: 2,
        offset: 3,
        limit: 3,
    };

    let repo = PostgresPostRepository::new(db.clone());
    assert!(repo.list(&PostQuery::all(), Some(window)).await.unwrap().is_empty());
    drop(repo);

    let sql = sent_sql(db);
    assert_eq!(sql.len(), 1);
    let select = &sql[0];

    let order = &select[select.find("ORDER BY").expect("unordered listing")..];
    let published = order.find(r#""published_time" DESC NULLS LAST"#).unwrap();
    let created = order.find(r#""created_time" DESC"#).unwrap();
    let id = order.find(r#""id" ASC"#).unwrap();
    assert!(published < created && created < id);

    assert!(select.contains("LIMIT 3"));
    assert!(select.contains("OFFSET 3"));
}

#[tokio::test]
async fn test_unknown_category_lists_nothing() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<category::Model>::new()])
        .append_query_results([Vec::<category::Model>::new()])
        .into_connection();

    let repo = PostgresPostRepository::new(Arc::new(db));
    let query = PostQuery::all().by_category("nowhere");

    assert!(repo.list(&query, None).await.unwrap().is_empty());
    assert_eq!(repo.count(&query).await.unwrap(), 0);
}

#[tokio::test]
async fn test_insert_writes_derived_slug() {
    let author = Uuid::new_v4();
    let category_id = Uuid::new_v4();
    let post = Post::new(
        author,
        "Hello World".to_owned(),
        "Body".to_owned(),
        PostStatus::Draft,
        category_id,
        BTreeSet::new(),
    );

    // The returned row deliberately disagrees so only the sent SQL can show the slug.
    let mut stored = post_row(post.id, 0);
    stored.author_id = author;
    stored.category_id = category_id;
    stored.slug = "stale".to_owned();

    let db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![stored]])
            .append_exec_results([done()])
            .into_connection(),
    );

    let repo = PostgresPostRepository::new(db.clone());
    let saved = repo.insert(post).await.unwrap();
    drop(repo);
    assert_eq!(saved.author_id, author);

    let sql = sent_sql(db);
    assert_eq!(sql.first().map(String::as_str), Some("BEGIN"));
    assert_eq!(sql.last().map(String::as_str), Some("COMMIT"));

    let insert = sql
        .iter()
        .find(|s| s.starts_with(r#"INSERT INTO "posts""#))
        .expect("no post insert");
    assert!(insert.contains("'hello-world'"));
    assert!(insert.contains("'draft'"));
}

#[tokio::test]
async fn test_update_writes_editable_columns_and_syncs_tags() {
    let post_id = Uuid::new_v4();
    let mut post = Post::new(
        Uuid::new_v4(),
        "Edited".to_owned(),
        "New body".to_owned(),
        PostStatus::Draft,
        Uuid::new_v4(),
        BTreeSet::new(),
    );
    post.id = post_id;
    post.slug = "edited".to_owned();
    post.views = 40;
    post.likenum = 7;

    let db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![post_row(post_id, 40)]])
            .append_exec_results([done()])
            .into_connection(),
    );

    let repo = PostgresPostRepository::new(db.clone());
    repo.update(post).await.unwrap();
    drop(repo);

    let sql = sent_sql(db);
    assert_eq!(sql.len(), 4, "{sql:#?}");
    assert_eq!(sql[0], "BEGIN");
    assert!(sql[2].starts_with(r#"DELETE FROM "post_tags""#));
    assert_eq!(sql[3], "COMMIT");

    let set = set_clause(&sql[1]);
    for column in [
        "title",
        "slug",
        "body",
        "status",
        "published_time",
        "updated_time",
        "category_id",
    ] {
        assert!(set.contains(&format!(r#""{column}" = "#)), "{column} missing from {set}");
    }
    for column in ["views", "likenum", "author_id", "created_time"] {
        assert!(!set.contains(&format!(r#""{column}""#)), "{column} overwritten in {set}");
    }
    assert!(set.contains("'edited'"));
}

#[tokio::test]
async fn test_comment_listing_hides_inactive() {
    let post_id = Uuid::new_v4();
    let now = Utc::now();
    let row = comment::Model {
        id: Uuid::new_v4(),
        post_id,
        name: "ann".to_owned(),
        body: "Nice".to_owned(),
        created_time: now.into(),
        updated_time: now.into(),
        active: true,
    };
    let db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row]])
            .into_connection(),
    );

    let repo = PostgresCommentRepository::new(db.clone());
    let comments = repo.list_for_post(post_id).await.unwrap();
    drop(repo);
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].name, "ann");

    let sql = sent_sql(db);
    assert!(sql[0].contains(&format!(r#""comments"."post_id" = '{post_id}'"#)));
    assert!(sql[0].contains(r#""comments"."active" = TRUE"#));
    assert!(sql[0].contains(r#"ORDER BY "comments"."created_time" DESC"#));
}
