//! Category and tag handlers.

use actix_web::{HttpResponse, web};
use serde::Deserialize;
use uuid::Uuid;

use quill_core::domain::{PageRequest, PostQuery};
use quill_shared::dto::{
    CategoryDetailResponse, CategoryRequest, ListQuery, TagDetailResponse, TagRequest,
};

use super::{category_response, page_response, tag_response};
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// Body of a reparent request; `null` moves the category to the root.
#[derive(Debug, Deserialize)]
pub struct MoveCategoryRequest {
    pub parent_id: Option<Uuid>,
}

/// GET /api/categories
pub async fn list_categories(
    state: web::Data<AppState>,
    _identity: Identity,
) -> AppResult<HttpResponse> {
    let categories = state.taxonomy.categories().await?;
    let body: Vec<_> = categories.into_iter().map(category_response).collect();

    Ok(HttpResponse::Ok().json(body))
}

/// POST /api/categories
pub async fn create_category(
    state: web::Data<AppState>,
    _identity: Identity,
    body: web::Json<CategoryRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let category = state
        .taxonomy
        .create_category(&req.name, req.slug.as_deref(), req.parent_id)
        .await?;

    Ok(HttpResponse::Created().json(category_response(category)))
}

/// GET /api/categories/{slug}
pub async fn category_detail(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<String>,
    list: web::Query<ListQuery>,
) -> AppResult<HttpResponse> {
    let category = state.taxonomy.category_by_slug(&path).await?;
    let ancestry = state.taxonomy.category_path(category.id).await?;
    let children = state.taxonomy.children(category.id).await?;

    let query = PostQuery::all().by_category(category.slug.clone());
    let request = PageRequest::parse(list.page.as_deref());
    let posts = state
        .posts
        .list(&query, state.listings.lists, request)
        .await?;

    Ok(HttpResponse::Ok().json(CategoryDetailResponse {
        category: category_response(category),
        path: ancestry.into_iter().map(category_response).collect(),
        children: children.into_iter().map(category_response).collect(),
        posts: page_response(posts),
    }))
}

/// PUT /api/categories/{slug}/parent
pub async fn move_category(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<String>,
    body: web::Json<MoveCategoryRequest>,
) -> AppResult<HttpResponse> {
    let category = state.taxonomy.category_by_slug(&path).await?;
    let moved = state
        .taxonomy
        .set_parent(category.id, body.parent_id)
        .await?;

    Ok(HttpResponse::Ok().json(category_response(moved)))
}

/// GET /api/tags
pub async fn list_tags(state: web::Data<AppState>, _identity: Identity) -> AppResult<HttpResponse> {
    let tags = state.taxonomy.tags().await?;
    let body: Vec<_> = tags.into_iter().map(tag_response).collect();

    Ok(HttpResponse::Ok().json(body))
}

/// POST /api/tags
pub async fn create_tag(
    state: web::Data<AppState>,
    _identity: Identity,
    body: web::Json<TagRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let tag = state.taxonomy.create_tag(&req.name, req.slug.as_deref()).await?;

    Ok(HttpResponse::Created().json(tag_response(tag)))
}

/// GET /api/tags/{slug}
pub async fn tag_detail(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<String>,
    list: web::Query<ListQuery>,
) -> AppResult<HttpResponse> {
    let tag = state.taxonomy.tag_by_slug(&path).await?;

    let query = PostQuery::all().by_tag(tag.slug.clone());
    let request = PageRequest::parse(list.page.as_deref());
    let posts = state
        .posts
        .list(&query, state.listings.lists, request)
        .await?;

    Ok(HttpResponse::Ok().json(TagDetailResponse {
        tag: tag_response(tag),
        posts: page_response(posts),
    }))
}
