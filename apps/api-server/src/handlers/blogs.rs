//! Blog handlers: content management, reactions, and image attachments.

use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};
use futures::StreamExt;
use uuid::Uuid;

use quill_core::domain::{Blog, Category, Reaction};
use quill_core::error::RepoError;
use quill_core::ports::{BLOG_IMAGE_FOLDER, public_id_from_url};
use quill_shared::MessageResponse;
use quill_shared::dto::{BlogResponse, CommentResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Fields accepted by the multipart create/update endpoints.
#[derive(Default)]
struct BlogForm {
    title: Option<String>,
    content: Option<String>,
    category: Option<String>,
    image: Option<(String, Vec<u8>)>,
}

async fn read_blog_form(mut payload: Multipart) -> AppResult<BlogForm> {
    let mut form = BlogForm::default();

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| AppError::BadRequest(e.to_string()))?;
        let name = field.name().unwrap_or_default().to_string();

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| AppError::BadRequest(e.to_string()))?;
            bytes.extend_from_slice(&chunk);
        }

        match name.as_str() {
            "image" => {
                let filename = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename())
                    .unwrap_or("upload.bin")
                    .to_string();
                form.image = Some((filename, bytes));
            }
            other => {
                let value = String::from_utf8(bytes)
                    .map_err(|_| AppError::BadRequest(format!("Field '{other}' is not text")))?;
                match other {
                    "title" => form.title = Some(value),
                    "content" => form.content = Some(value),
                    "category" => form.category = Some(value),
                    _ => {} // unknown fields ignored
                }
            }
        }
    }

    Ok(form)
}

/// Expand a blog for the response: author as `{ name, email }`, comments
/// newest-first with their own authors expanded.
async fn expand(state: &AppState, blog: Blog) -> AppResult<BlogResponse> {
    let author = state.users.find_by_id(blog.author).await?;

    let mut comments = Vec::new();
    for comment in state.comments.find_by_blog(blog.id).await? {
        if let Some(user) = state.users.find_by_id(comment.user).await? {
            comments.push(CommentResponse::from_parts(comment, &user));
        }
    }

    Ok(BlogResponse::from_parts(blog, author.as_ref(), comments))
}

/// Delete a blog's hosted image, if it has one.
async fn remove_image(state: &AppState, blog: &Blog) -> AppResult<()> {
    if let Some(url) = &blog.image {
        if let Some(public_id) = public_id_from_url(url) {
            state.media.delete(BLOG_IMAGE_FOLDER, public_id).await?;
        }
    }
    Ok(())
}

fn blog_not_found() -> AppError {
    AppError::NotFound("Blog not found".to_string())
}

/// GET /api/blogs
pub async fn list_blogs(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let mut expanded = Vec::new();
    for blog in state.blogs.find_all().await? {
        expanded.push(expand(&state, blog).await?);
    }
    Ok(HttpResponse::Ok().json(expanded))
}

/// GET /api/blogs/{blogId}
pub async fn get_blog(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let blog = state
        .blogs
        .find_by_id(path.into_inner())
        .await?
        .ok_or_else(blog_not_found)?;
    Ok(HttpResponse::Ok().json(expand(&state, blog).await?))
}

/// POST /api/blogs - administrator only, multipart with optional image.
pub async fn create_blog(
    state: web::Data<AppState>,
    identity: Identity,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    identity.require_admin()?;

    let form = read_blog_form(payload).await?;

    let title = form.title.filter(|t| !t.trim().is_empty());
    let content = form.content.filter(|c| !c.trim().is_empty());
    let (Some(title), Some(content)) = (title, content) else {
        return Err(AppError::BadRequest(
            "Title and content are required".to_string(),
        ));
    };
    let category: Category = form
        .category
        .as_deref()
        .unwrap_or_default()
        .parse()
        .map_err(|_| AppError::BadRequest("Invalid category".to_string()))?;

    let image = match form.image {
        Some((filename, bytes)) => Some(
            state
                .media
                .upload(BLOG_IMAGE_FOLDER, &filename, bytes)
                .await?,
        ),
        None => None,
    };

    let blog = state
        .blogs
        .save(Blog::new(title, content, category, identity.user_id, image))
        .await?;

    // Notify every user; fire-and-forget, never transactional with creation.
    let recipients: Vec<(String, String)> = state
        .users
        .find_all()
        .await?
        .into_iter()
        .map(|u| (u.email, u.name))
        .collect();
    let mailer = state.mailer.clone();
    let title = blog.title.clone();
    tokio::spawn(async move {
        for (email, name) in recipients {
            let html = format!(
                "<h3>New Blog Published: {title}</h3>\
                 <p>Hello {name},</p>\
                 <p>A new blog has been published. Please check it out!</p>"
            );
            if let Err(e) = mailer.send(&email, &format!("New Blog: {title}"), &html).await {
                tracing::warn!(%email, "new blog notification failed: {e}");
            }
        }
    });

    Ok(HttpResponse::Created().json(expand(&state, blog).await?))
}

/// PUT /api/blogs/{blogId} - administrator only; title, content and image
/// are the only mutable fields.
pub async fn update_blog(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    identity.require_admin()?;

    let mut blog = state
        .blogs
        .find_by_id(path.into_inner())
        .await?
        .ok_or_else(blog_not_found)?;

    let form = read_blog_form(payload).await?;

    // A replacement image deletes the previous hosted object first.
    if let Some((filename, bytes)) = form.image {
        remove_image(&state, &blog).await?;
        let url = state
            .media
            .upload(BLOG_IMAGE_FOLDER, &filename, bytes)
            .await?;
        blog.image = Some(url);
    }

    if let Some(title) = form.title.filter(|t| !t.is_empty()) {
        blog.title = title;
    }
    if let Some(content) = form.content.filter(|c| !c.is_empty()) {
        blog.content = content;
    }
    blog.touch();

    let blog = state.blogs.save(blog).await?;
    Ok(HttpResponse::Ok().json(expand(&state, blog).await?))
}

/// DELETE /api/blogs/{blogId} - administrator only. Removes the hosted
/// image and cascade-deletes the blog's comments.
pub async fn delete_blog(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    identity.require_admin()?;

    let blog = state
        .blogs
        .find_by_id(path.into_inner())
        .await?
        .ok_or_else(blog_not_found)?;

    remove_image(&state, &blog).await?;
    state.comments.delete_by_blog(blog.id).await?;
    state.blogs.delete(blog.id).await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Blog deleted successfully")))
}

/// DELETE /api/blogs - administrator only.
pub async fn delete_all_blogs(
    state: web::Data<AppState>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    identity.require_admin()?;

    for blog in state.blogs.find_all().await? {
        remove_image(&state, &blog).await?;
        state.comments.delete_by_blog(blog.id).await?;
    }

    let count = state.blogs.delete_all().await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new(format!("All blogs deleted ({count})"))))
}

async fn react(
    state: &AppState,
    identity: &Identity,
    blog_id: Uuid,
    reaction: Reaction,
) -> AppResult<HttpResponse> {
    let blog = state
        .blogs
        .apply_reaction(blog_id, identity.user_id, reaction)
        .await
        .map_err(|e| match e {
            RepoError::NotFound => blog_not_found(),
            other => other.into(),
        })?;
    Ok(HttpResponse::Ok().json(expand(state, blog).await?))
}

/// POST /api/blogs/{blogId}/like
pub async fn like_blog(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    react(&state, &identity, path.into_inner(), Reaction::Like).await
}

/// POST /api/blogs/{blogId}/unlike
pub async fn unlike_blog(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    react(&state, &identity, path.into_inner(), Reaction::Unlike).await
}

/// POST /api/blogs/{blogId}/share
pub async fn share_blog(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    react(&state, &identity, path.into_inner(), Reaction::Share).await
}
