//! Post CRUD handlers. Every operation is restricted to admin callers.
//!
//! Bodies arrive as raw bytes and are parsed only after the admin guard.

use crate::{
    error::ApiError,
    models::{ErrorDetail, Post, PostPath, PostRequest},
    services::{
        require_admin,
        validation::{validate_post, validate_post_changes},
    },
    state::AppState,
    utils::http::parse_json_body,
};
use actix_web::{Error, HttpRequest, HttpResponse, Result, web};
use paperclip::actix::api_v2_operation;
use tracing::info;

/// List every post
#[api_v2_operation(
    summary = "List posts",
    description = "Return all posts in ascending id order. Admin only.",
    tags("Posts"),
    responses(
        (status = 200, description = "All posts", body = Vec<Post>),
        (status = 401, description = "Missing or invalid credentials", body = ErrorDetail),
        (status = 403, description = "Caller is not an admin", body = ErrorDetail)
    )
)]
pub async fn list_posts(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<web::Json<Vec<Post>>, Error> {
    require_admin(&req, &state.tokens, &state.users)?;

    let posts = state.posts.list().map_err(ApiError::from)?;
    Ok(web::Json(posts))
}

/// Create a post
#[api_v2_operation(
    summary = "Create post",
    description = "Create a post from title, content and an optional is_published flag (default false). Admin only.",
    tags("Posts"),
    responses(
        (status = 201, description = "Post created", body = Post),
        (status = 400, description = "Validation failed; body maps field names to messages"),
        (status = 415, description = "Body is not JSON", body = ErrorDetail),
        (status = 401, description = "Missing or invalid credentials", body = ErrorDetail),
        (status = 403, description = "Caller is not an admin", body = ErrorDetail)
    )
)]
pub async fn create_post(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, Error> {
    let admin = require_admin(&req, &state.tokens, &state.users)?;

    let payload: PostRequest = parse_json_body(&req, &body)?;
    let fields = validate_post(&payload)?;
    let post = state.posts.create(fields).map_err(ApiError::from)?;

    info!(post_id = post.id, admin = %admin.username, "Post created");
    Ok(HttpResponse::Created().json(post))
}

/// Retrieve a single post
#[api_v2_operation(
    summary = "Get post",
    description = "Return one post by id. Admin only.",
    tags("Posts"),
    responses(
        (status = 200, description = "The post", body = Post),
        (status = 401, description = "Missing or invalid credentials", body = ErrorDetail),
        (status = 403, description = "Caller is not an admin", body = ErrorDetail),
        (status = 404, description = "No post with this id", body = ErrorDetail)
    )
)]
pub async fn get_post(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<PostPath>,
) -> Result<web::Json<Post>, Error> {
    require_admin(&req, &state.tokens, &state.users)?;

    let post = state
        .posts
        .get(path.id)
        .map_err(ApiError::from)?
        .ok_or(ApiError::NotFound)?;
    Ok(web::Json(post))
}

/// Replace a post
#[api_v2_operation(
    summary = "Replace post",
    description = "Replace title, content and is_published of an existing post. A missing is_published resets it to false. Admin only.",
    tags("Posts"),
    responses(
        (status = 200, description = "Updated post", body = Post),
        (status = 400, description = "Validation failed; body maps field names to messages"),
        (status = 415, description = "Body is not JSON", body = ErrorDetail),
        (status = 401, description = "Missing or invalid credentials", body = ErrorDetail),
        (status = 403, description = "Caller is not an admin", body = ErrorDetail),
        (status = 404, description = "No post with this id", body = ErrorDetail)
    )
)]
pub async fn replace_post(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<PostPath>,
    body: web::Bytes,
) -> Result<web::Json<Post>, Error> {
    let admin = require_admin(&req, &state.tokens, &state.users)?;

    // Unknown ids are reported before the body is parsed
    if state.posts.get(path.id).map_err(ApiError::from)?.is_none() {
        return Err(ApiError::NotFound.into());
    }

    let payload: PostRequest = parse_json_body(&req, &body)?;
    let fields = validate_post(&payload)?;
    let post = state
        .posts
        .replace(path.id, fields)
        .map_err(ApiError::from)?
        .ok_or(ApiError::NotFound)?;

    info!(post_id = post.id, admin = %admin.username, "Post replaced");
    Ok(web::Json(post))
}

/// Partially update a post
#[api_v2_operation(
    summary = "Update post",
    description = "Change any subset of title, content and is_published. Admin only.",
    tags("Posts"),
    responses(
        (status = 200, description = "Updated post", body = Post),
        (status = 400, description = "Validation failed; body maps field names to messages"),
        (status = 415, description = "Body is not JSON", body = ErrorDetail),
        (status = 401, description = "Missing or invalid credentials", body = ErrorDetail),
        (status = 403, description = "Caller is not an admin", body = ErrorDetail),
        (status = 404, description = "No post with this id", body = ErrorDetail)
    )
)]
pub async fn update_post(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<PostPath>,
    body: web::Bytes,
) -> Result<web::Json<Post>, Error> {
    let admin = require_admin(&req, &state.tokens, &state.users)?;

    if state.posts.get(path.id).map_err(ApiError::from)?.is_none() {
        return Err(ApiError::NotFound.into());
    }

    let payload: PostRequest = parse_json_body(&req, &body)?;
    let changes = validate_post_changes(&payload)?;
    let post = state
        .posts
        .update(path.id, changes)
        .map_err(ApiError::from)?
        .ok_or(ApiError::NotFound)?;

    info!(post_id = post.id, admin = %admin.username, "Post updated");
    Ok(web::Json(post))
}

/// Delete a post
#[api_v2_operation(
    summary = "Delete post",
    description = "Permanently remove a post. Admin only.",
    tags("Posts"),
    responses(
        (status = 204, description = "Post deleted"),
        (status = 401, description = "Missing or invalid credentials", body = ErrorDetail),
        (status = 403, description = "Caller is not an admin", body = ErrorDetail),
        (status = 404, description = "No post with this id", body = ErrorDetail)
    )
)]
pub async fn delete_post(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<PostPath>,
) -> Result<HttpResponse, Error> {
    let admin = require_admin(&req, &state.tokens, &state.users)?;

    if !state.posts.delete(path.id).map_err(ApiError::from)? {
        return Err(ApiError::NotFound.into());
    }

    info!(post_id = path.id, admin = %admin.username, "Post deleted");
    Ok(HttpResponse::NoContent().finish())
}
