use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use serde_json::{Value, json};
use uuid::Uuid;

use quill_core::ports::TokenService;
use quill_infra::{JwtConfig, JwtTokenService};

use crate::config::ListingConfig;
use crate::state::AppState;

fn token_service() -> Arc<dyn TokenService> {
    Arc::new(JwtTokenService::new(JwtConfig {
        secret: "handler-test-secret".to_string(),
        ..JwtConfig::default()
    }))
}

fn bearer(tokens: &Arc<dyn TokenService>, user_id: Uuid) -> (&'static str, String) {
    let token = tokens.issue_token(user_id, vec![]).unwrap();
    ("Authorization", format!("Bearer {token}"))
}

macro_rules! app {
    ($state:expr, $tokens:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state.clone()))
                .app_data(web::Data::new($tokens.clone()))
                .configure(super::configure_routes),
        )
        .await
    };
}

#[actix_web::test]
async fn test_post_lifecycle_over_http() {
    let state = AppState::in_memory(ListingConfig::default());
    let tokens = token_service();
    let app = app!(state, tokens);
    let author = Uuid::new_v4();

    let req = test::TestRequest::post()
        .uri("/api/categories")
        .insert_header(bearer(&tokens, author))
        .set_json(json!({ "name": "Rust" }))
        .to_request();
    let category: Value = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header(bearer(&tokens, author))
        .set_json(json!({
            "title": "Hello World",
            "body": "first",
            "status": "draft",
            "category_id": category["id"],
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let post: Value = test::read_body_json(resp).await;
    assert_eq!(post["slug"], "hello-world");
    assert_eq!(post["status"], "draft");
    assert!(post["published_time"].is_null());

    let req = test::TestRequest::post()
        .uri(&format!("/api/posts/{}/publish", post["id"].as_str().unwrap()))
        .insert_header(bearer(&tokens, author))
        .to_request();
    let published: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(published["status"], "published");
    assert!(!published["published_time"].is_null());

    let req = test::TestRequest::get()
        .uri(post["url"].as_str().unwrap())
        .to_request();
    let viewed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(viewed["views"], 1);
}

#[actix_web::test]
async fn test_protected_routes_require_token() {
    let state = AppState::in_memory(ListingConfig::default());
    let tokens = token_service();
    let app = app!(state, tokens);

    let req = test::TestRequest::get().uri("/api/posts/drafts").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get().uri("/api/posts?page=junk").to_request();
    let page: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(page["page"], 1);
    assert_eq!(page["num_pages"], 1);
}

#[actix_web::test]
async fn test_errors_render_problem_details() {
    let state = AppState::in_memory(ListingConfig::default());
    let tokens = token_service();
    let app = app!(state, tokens);
    let author = Uuid::new_v4();

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header(bearer(&tokens, author))
        .set_json(json!({ "title": "No category" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], 422);

    let req = test::TestRequest::post()
        .uri(&format!("/api/posts/{}/like", Uuid::new_v4()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

macro_rules! category {
    ($app:expr, $tokens:expr, $user:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/categories")
            .insert_header(bearer(&$tokens, $user))
            .set_json(json!({ "name": "Rust" }))
            .to_request();
        let category: Value = test::call_and_read_body_json(&$app, req).await;
        category
    }};
}

#[actix_web::test]
async fn test_omitted_status_publishes() {
    let state = AppState::in_memory(ListingConfig::default());
    let tokens = token_service();
    let app = app!(state, tokens);
    let author = Uuid::new_v4();
    let category = category!(app, tokens, author);

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header(bearer(&tokens, author))
        .set_json(json!({ "title": "Straight out", "category_id": category["id"] }))
        .to_request();
    let post: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(post["status"], "published");
    assert!(!post["published_time"].is_null());
}

#[actix_web::test]
async fn test_comments_over_http() {
    let state = AppState::in_memory(ListingConfig::default());
    let tokens = token_service();
    let app = app!(state, tokens);
    let author = Uuid::new_v4();
    let category = category!(app, tokens, author);

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header(bearer(&tokens, author))
        .set_json(json!({ "title": "Talk to me", "category_id": category["id"] }))
        .to_request();
    let post: Value = test::call_and_read_body_json(&app, req).await;
    let comments_uri = format!("/api/comments/post/{}", post["id"].as_str().unwrap());

    let req = test::TestRequest::post()
        .uri(&comments_uri)
        .set_json(json!({ "name": "ann", "body": "Great read" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let comment: Value = test::read_body_json(resp).await;
    assert_eq!(comment["active"], true);

    let req = test::TestRequest::post()
        .uri(&comments_uri)
        .set_json(json!({ "name": "", "body": "anonymous" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let hide_uri = format!("/api/comments/{}/active", comment["id"].as_str().unwrap());
    let req = test::TestRequest::put()
        .uri(&hide_uri)
        .insert_header(bearer(&tokens, Uuid::new_v4()))
        .set_json(json!({ "active": false }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::put()
        .uri(&hide_uri)
        .insert_header(bearer(&tokens, author))
        .set_json(json!({ "active": false }))
        .to_request();
    let hidden: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(hidden["active"], false);

    let req = test::TestRequest::get().uri(&comments_uri).to_request();
    let listed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listed, json!([]));

    let req = test::TestRequest::get()
        .uri(&format!("/api/comments/post/{}", Uuid::new_v4()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
