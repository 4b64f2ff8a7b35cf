//! HTTP handlers and route configuration.

mod comments;
mod health;
mod posts;
mod profile;
mod taxonomy;

#[cfg(test)]
mod tests;

use actix_web::web;

use quill_core::domain::{Category, Comment, Page, Post, Tag, UserProfile};
use quill_shared::dto::{
    CategoryResponse, CommentResponse, PageResponse, PostResponse, ProfileResponse, TagResponse,
};

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .route("/", web::get().to(posts::index))
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::list_posts))
                    .route("", web::post().to(posts::create_post))
                    .route("/published", web::get().to(posts::published_posts))
                    .route("/drafts", web::get().to(posts::draft_posts))
                    .route("/mine", web::get().to(posts::my_posts))
                    .route("/{id}", web::put().to(posts::update_post))
                    .route("/{id}/publish", web::post().to(posts::publish_post))
                    .route("/{id}/like", web::post().to(posts::like_post))
                    .route("/{id}/{slug}", web::get().to(posts::post_detail)),
            )
            .service(
                web::scope("/categories")
                    .route("", web::get().to(taxonomy::list_categories))
                    .route("", web::post().to(taxonomy::create_category))
                    .route("/{slug}", web::get().to(taxonomy::category_detail))
                    .route("/{slug}/parent", web::put().to(taxonomy::move_category)),
            )
            .service(
                web::scope("/tags")
                    .route("", web::get().to(taxonomy::list_tags))
                    .route("", web::post().to(taxonomy::create_tag))
                    .route("/{slug}", web::get().to(taxonomy::tag_detail)),
            )
            .service(
                web::scope("/comments")
                    .route("/post/{post_id}", web::get().to(comments::list_comments))
                    .route("/post/{post_id}", web::post().to(comments::add_comment))
                    .route("/{id}/active", web::put().to(comments::moderate_comment)),
            )
            .service(
                web::resource("/profile")
                    .route(web::get().to(profile::get_profile))
                    .route(web::put().to(profile::update_profile)),
            ),
    );
}

pub(crate) fn post_response(post: Post) -> PostResponse {
    PostResponse {
        url: format!("/api/posts/{}/{}", post.id, post.slug),
        id: post.id,
        author_id: post.author_id,
        title: post.title,
        slug: post.slug,
        body: post.body,
        status: post.status.to_string(),
        published_time: post.published_time,
        created_time: post.created_time,
        updated_time: post.updated_time,
        category_id: post.category_id,
        tag_ids: post.tag_ids.into_iter().collect(),
        views: post.views,
        likenum: post.likenum,
    }
}

pub(crate) fn page_response(page: Page<Post>) -> PageResponse<PostResponse> {
    let has_next = page.has_next();
    let has_previous = page.has_previous();
    let page = page.map(post_response);

    PageResponse {
        items: page.items,
        page: page.number,
        num_pages: page.num_pages,
        total: page.total,
        per_page: page.per_page,
        has_next,
        has_previous,
    }
}

pub(crate) fn category_response(category: Category) -> CategoryResponse {
    CategoryResponse {
        id: category.id,
        name: category.name,
        slug: category.slug,
        parent_id: category.parent_id,
    }
}

pub(crate) fn tag_response(tag: Tag) -> TagResponse {
    TagResponse {
        id: tag.id,
        name: tag.name,
        slug: tag.slug,
        created_time: tag.created_time,
    }
}

pub(crate) fn profile_response(profile: UserProfile) -> ProfileResponse {
    ProfileResponse {
        user_id: profile.user_id,
        org: profile.org,
        telephone: profile.telephone,
        updated_time: profile.updated_time,
    }
}

pub(crate) fn comment_response(comment: Comment) -> CommentResponse {
    CommentResponse {
        id: comment.id,
        post_id: comment.post_id,
        name: comment.name,
        body: comment.body,
        created_time: comment.created_time,
        updated_time: comment.updated_time,
        active: comment.active,
    }
}
