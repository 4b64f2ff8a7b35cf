//! Profile handlers. Profiles are created on first access.

use actix_web::{HttpResponse, web};

use quill_shared::dto::ProfileRequest;

use super::profile_response;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/profile
pub async fn get_profile(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let profile = state.profiles.ensure(identity.user_id).await?;

    Ok(HttpResponse::Ok().json(profile_response(profile)))
}

/// PUT /api/profile
pub async fn update_profile(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<ProfileRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let profile = state
        .profiles
        .update(identity.user_id, req.org, req.telephone)
        .await?;

    Ok(HttpResponse::Ok().json(profile_response(profile)))
}
