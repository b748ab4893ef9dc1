//! Comment handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_core::domain::Comment;
use quill_core::error::RepoError;
use quill_shared::MessageResponse;
use quill_shared::dto::{CommentRequest, CommentResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn comment_not_found() -> AppError {
    AppError::NotFound("Comment not found".to_string())
}

fn blog_not_found() -> AppError {
    AppError::NotFound("Blog not found".to_string())
}

/// Expand a comment with its author for the response.
async fn expand(state: &AppState, comment: Comment) -> AppResult<CommentResponse> {
    let author = state
        .users
        .find_by_id(comment.user)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    Ok(CommentResponse::from_parts(comment, &author))
}

/// POST /api/comments/{blogId}
pub async fn add_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let blog_id = path.into_inner();
    let content = body.into_inner().content;

    if content.trim().is_empty() {
        return Err(AppError::BadRequest("Comment cannot be empty".to_string()));
    }

    state
        .blogs
        .find_by_id(blog_id)
        .await?
        .ok_or_else(blog_not_found)?;

    let comment = state
        .comments
        .save(Comment::new(blog_id, identity.user_id, content))
        .await?;
    state.blogs.link_comment(blog_id, comment.id).await?;

    Ok(HttpResponse::Created().json(expand(&state, comment).await?))
}

/// GET /api/comments/blog/{blogId}
pub async fn list_comments(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let mut expanded = Vec::new();
    for comment in state.comments.find_by_blog(path.into_inner()).await? {
        if let Some(author) = state.users.find_by_id(comment.user).await? {
            expanded.push(CommentResponse::from_parts(comment, &author));
        }
    }
    Ok(HttpResponse::Ok().json(expanded))
}

/// GET /api/comments/{commentId}
pub async fn get_comment(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let comment = state
        .comments
        .find_by_id(path.into_inner())
        .await?
        .ok_or_else(comment_not_found)?;
    Ok(HttpResponse::Ok().json(expand(&state, comment).await?))
}

/// PUT /api/comments/{commentId} - author or administrator.
pub async fn update_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let mut comment = state
        .comments
        .find_by_id(path.into_inner())
        .await?
        .ok_or_else(comment_not_found)?;

    if !comment.can_be_modified_by(identity.user_id, identity.is_admin) {
        return Err(AppError::Forbidden);
    }

    let content = body.into_inner().content;
    if !content.trim().is_empty() {
        comment.content = content;
    }
    comment.touch();

    let comment = state.comments.save(comment).await?;
    Ok(HttpResponse::Ok().json(expand(&state, comment).await?))
}

/// DELETE /api/comments/{commentId} - author or administrator. Also unlinks
/// the comment from its parent blog.
pub async fn delete_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let comment = state
        .comments
        .find_by_id(path.into_inner())
        .await?
        .ok_or_else(comment_not_found)?;

    if !comment.can_be_modified_by(identity.user_id, identity.is_admin) {
        return Err(AppError::Forbidden);
    }

    state.comments.delete(comment.id).await?;

    // The parent blog may already be gone; that is not an error here.
    match state.blogs.unlink_comment(comment.blog, comment.id).await {
        Ok(()) | Err(RepoError::NotFound) => {}
        Err(e) => return Err(e.into()),
    }

    Ok(HttpResponse::Ok().json(MessageResponse::new("Comment deleted successfully")))
}

/// DELETE /api/comments/blog/{blogId} - administrator only.
pub async fn delete_all_for_blog(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    identity.require_admin()?;

    let blog_id = path.into_inner();
    state
        .blogs
        .find_by_id(blog_id)
        .await?
        .ok_or_else(blog_not_found)?;

    state.comments.delete_by_blog(blog_id).await?;
    state.blogs.clear_comments(blog_id).await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("All comments deleted successfully")))
}
