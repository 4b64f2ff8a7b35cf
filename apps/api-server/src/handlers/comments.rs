//! Comment handlers. Reading and writing comments needs no account;
//! hiding one is left to the post's author.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_shared::dto::{CommentRequest, ModerateCommentRequest};

use super::comment_response;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/comments/post/{post_id}
pub async fn list_comments(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let comments = state.comments.for_post(path.into_inner()).await?;

    let body: Vec<_> = comments.into_iter().map(comment_response).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// POST /api/comments/post/{post_id}
pub async fn add_comment(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let comment = state
        .comments
        .add(path.into_inner(), &req.name, &req.body)
        .await?;

    Ok(HttpResponse::Created().json(comment_response(comment)))
}

/// PUT /api/comments/{id}/active
pub async fn moderate_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<ModerateCommentRequest>,
) -> AppResult<HttpResponse> {
    let comment = state
        .comments
        .moderate(identity.user_id, path.into_inner(), body.active)
        .await?;

    Ok(HttpResponse::Ok().json(comment_response(comment)))
}
