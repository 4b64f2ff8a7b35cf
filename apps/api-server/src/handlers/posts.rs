//! Post handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_core::domain::{PageRequest, Paginator, PostQuery, PostStatus};
use quill_core::services::PostInput;
use quill_shared::dto::{LikeResponse, ListQuery, PostRequest};

use super::{page_response, post_response};
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn post_input(req: PostRequest) -> AppResult<PostInput> {
    let status = match req.status.as_deref() {
        None => PostStatus::default(),
        Some(raw) => raw.parse().map_err(AppError::BadRequest)?,
    };

    Ok(PostInput {
        title: req.title,
        body: req.body,
        status,
        category_id: req.category_id,
        tag_ids: req.tag_ids,
    })
}

async fn listing(
    state: &AppState,
    query: PostQuery,
    paginator: Paginator,
    list: &ListQuery,
) -> AppResult<HttpResponse> {
    let request = PageRequest::parse(list.page.as_deref());
    let page = state.posts.list(&query, paginator, request).await?;

    Ok(HttpResponse::Ok().json(page_response(page)))
}

/// GET /api/
pub async fn index(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    list: web::Query<ListQuery>,
) -> AppResult<HttpResponse> {
    if let Some(identity) = &identity.0 {
        tracing::debug!(user_id = %identity.user_id, "Index requested");
    }
    listing(&state, PostQuery::all(), state.listings.index, &list).await
}

/// GET /api/posts
pub async fn list_posts(
    state: web::Data<AppState>,
    list: web::Query<ListQuery>,
) -> AppResult<HttpResponse> {
    listing(&state, PostQuery::all(), state.listings.lists, &list).await
}

/// GET /api/posts/published
pub async fn published_posts(
    state: web::Data<AppState>,
    _identity: Identity,
    list: web::Query<ListQuery>,
) -> AppResult<HttpResponse> {
    listing(&state, PostQuery::published(), state.listings.lists, &list).await
}

/// GET /api/posts/drafts
pub async fn draft_posts(
    state: web::Data<AppState>,
    identity: Identity,
    list: web::Query<ListQuery>,
) -> AppResult<HttpResponse> {
    let query = PostQuery::all()
        .by_author(identity.user_id)
        .by_status(PostStatus::Draft);
    listing(&state, query, state.listings.lists, &list).await
}

/// GET /api/posts/mine
pub async fn my_posts(
    state: web::Data<AppState>,
    identity: Identity,
    list: web::Query<ListQuery>,
) -> AppResult<HttpResponse> {
    let query = PostQuery::all().by_author(identity.user_id);
    listing(&state, query, state.listings.lists, &list).await
}

/// POST /api/posts
pub async fn create_post(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let input = post_input(body.into_inner())?;
    let post = state.posts.create(identity.user_id, input).await?;

    Ok(HttpResponse::Created().json(post_response(post)))
}

/// PUT /api/posts/{id}
pub async fn update_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let input = post_input(body.into_inner())?;
    let post = state
        .posts
        .update(identity.user_id, path.into_inner(), input)
        .await?;

    Ok(HttpResponse::Ok().json(post_response(post)))
}

/// POST /api/posts/{id}/publish
pub async fn publish_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = state
        .posts
        .publish(identity.user_id, path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(post_response(post)))
}

/// GET /api/posts/{id}/{slug} - records a view.
pub async fn post_detail(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, String)>,
) -> AppResult<HttpResponse> {
    let (id, slug) = path.into_inner();

    let post = state.posts.get(id).await?;
    if post.slug != slug {
        return Err(AppError::NotFound(format!("post {id}/{slug} not found")));
    }
    let post = state.posts.view(id).await?;

    Ok(HttpResponse::Ok().json(post_response(post)))
}

/// POST /api/posts/{id}/like
pub async fn like_post(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let likes = state.posts.like(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(LikeResponse { likes }))
}
