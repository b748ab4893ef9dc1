//! Account handlers: registration, login, and user management.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_core::domain::User;
use quill_shared::MessageResponse;
use quill_shared::dto::{
    LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, UpdateUserRequest,
    UserResponse,
};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/auth/register
///
/// Public. The role flag is never read from the request; administrators are
/// seeded at startup only.
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    if req.name.trim().is_empty() || req.email.trim().is_empty() || req.password.is_empty() {
        return Err(AppError::BadRequest(
            "Name, email and password are required".to_string(),
        ));
    }

    let password_hash = state.passwords.hash(&req.password)?;
    let user = User::new(req.name, req.email, password_hash);

    // The store enforces email uniqueness; a duplicate comes back as a 400.
    let user = state.users.insert_unique(user).await?;

    // Welcome email is fire-and-forget; failure never fails registration.
    let mailer = state.mailer.clone();
    let (to, name) = (user.email.clone(), user.name.clone());
    tokio::spawn(async move {
        let html = format!(
            "<h3>Welcome to Quill, {name}!</h3><p>You have successfully registered.</p>"
        );
        if let Err(e) = mailer.send(&to, "Welcome to Quill!", &html).await {
            tracing::warn!(%to, "welcome email failed: {e}");
        }
    });

    Ok(HttpResponse::Created().json(RegisterResponse {
        message: "User registered successfully".to_string(),
        user_id: user.id,
    }))
}

/// POST /api/auth/login
///
/// Unknown email and wrong password produce the same message, so the
/// response never reveals which one failed.
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let invalid = || AppError::BadRequest("Invalid credentials".to_string());

    let user = state
        .users
        .find_by_email(&req.email)
        .await?
        .ok_or_else(invalid)?;

    if !state.passwords.verify(&req.password, &user.password_hash)? {
        return Err(invalid());
    }

    let token = state.tokens.issue(user.id, user.is_admin)?;

    let mailer = state.mailer.clone();
    let (to, name) = (user.email.clone(), user.name.clone());
    tokio::spawn(async move {
        let html = format!("<p>Hello {name},</p><p>You just logged in to Quill.</p>");
        if let Err(e) = mailer.send(&to, "Login Notification", &html).await {
            tracing::warn!(%to, "login notification failed: {e}");
        }
    });

    Ok(HttpResponse::Ok().json(LoginResponse {
        token,
        user_id: user.id,
        is_admin: user.is_admin,
    }))
}

/// GET /api/auth
pub async fn list_users(state: web::Data<AppState>, _identity: Identity) -> AppResult<HttpResponse> {
    let users: Vec<UserResponse> = state
        .users
        .find_all()
        .await?
        .into_iter()
        .map(UserResponse::from)
        .collect();
    Ok(HttpResponse::Ok().json(users))
}

/// GET /api/auth/{userId}
pub async fn get_user(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let user = state
        .users
        .find_by_id(path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

/// PUT /api/auth/{userId}
///
/// The role flag is admin-only; without that gate any caller could grant
/// themselves administrator rights through their own profile.
pub async fn update_user(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UpdateUserRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    if req.is_admin.is_some() {
        identity.require_admin()?;
    }

    let mut user = state
        .users
        .find_by_id(path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if let Some(name) = req.name {
        user.name = name;
    }
    if let Some(email) = req.email {
        user.email = email;
    }
    if let Some(password) = req.password {
        user.password_hash = state.passwords.hash(&password)?;
    }
    if let Some(is_admin) = req.is_admin {
        user.is_admin = is_admin;
    }
    user.touch();

    state.users.save(user).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("User updated successfully")))
}

/// DELETE /api/auth/{userId}
pub async fn delete_user(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    state
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    state.users.delete(id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("User deleted successfully")))
}

/// DELETE /api/auth - administrator only.
pub async fn delete_all_users(
    state: web::Data<AppState>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    identity.require_admin()?;

    let count = state.users.delete_all().await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new(format!("All users deleted ({count})"))))
}
