//! End-to-end API tests over the in-memory adapters.

use std::sync::Arc;

use actix_web::{App, dev::ServiceResponse, http::StatusCode, test, web};
use serde_json::{Value, json};

use quill_api::handlers::configure_routes;
use quill_api::state::AppState;
use quill_infra::{InMemoryMediaStore, JwtConfig, JwtTokenService, LogMailer};

const ADMIN_EMAIL: &str = "admin@example.com";
const ADMIN_PASSWORD: &str = "admin-password";

fn jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "integration-test-secret".to_string(),
        ..JwtConfig::default()
    }
}

async fn test_state() -> AppState {
    let state = AppState::new(
        Arc::new(JwtTokenService::new(jwt_config())),
        Arc::new(LogMailer::new()),
        Arc::new(InMemoryMediaStore::new()),
    );
    state
        .seed_admin("Administrator", ADMIN_EMAIL, ADMIN_PASSWORD)
        .await;
    state
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state.clone()))
                .configure(configure_routes),
        )
        .await
    };
}

async fn register(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = ServiceResponse,
        Error = actix_web::Error,
    >,
    name: &str,
    email: &str,
    password: &str,
) -> ServiceResponse {
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "name": name, "email": email, "password": password }))
        .to_request();
    test::call_service(app, req).await
}

async fn login_token(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = ServiceResponse,
        Error = actix_web::Error,
    >,
    email: &str,
    password: &str,
) -> String {
    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    let body: Value = test::call_and_read_body_json(app, req).await;
    body["token"].as_str().expect("login token").to_string()
}

fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}

/// Build a multipart body out of plain text fields.
fn multipart_fields(fields: &[(&str, &str)]) -> (String, Vec<u8>) {
    let boundary = "----quill-test-boundary";
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    (format!("multipart/form-data; boundary={boundary}"), body)
}

async fn create_blog(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = ServiceResponse,
        Error = actix_web::Error,
    >,
    token: &str,
    title: &str,
    category: &str,
) -> ServiceResponse {
    let (content_type, body) = multipart_fields(&[
        ("title", title),
        ("content", "Some content"),
        ("category", category),
    ]);
    let req = test::TestRequest::post()
        .uri("/api/blogs")
        .insert_header(bearer(token))
        .insert_header(("Content-Type", content_type))
        .set_payload(body)
        .to_request();
    test::call_service(app, req).await
}

#[actix_web::test]
async fn health_endpoint_is_public() {
    let state = test_state().await;
    let app = app!(state);

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[actix_web::test]
async fn duplicate_registration_rejected_first_account_intact() {
    let state = test_state().await;
    let app = app!(state);

    let first = register(&app, "Ada", "ada@example.com", "pw-one").await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = register(&app, "Imposter", "ada@example.com", "pw-two").await;
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(second).await;
    assert_eq!(body["message"], "Email already registered");

    // First account still logs in.
    let token = login_token(&app, "ada@example.com", "pw-one").await;
    assert!(!token.is_empty());
}

#[actix_web::test]
async fn login_failure_message_does_not_leak_which_field_failed() {
    let state = test_state().await;
    let app = app!(state);

    register(&app, "Ada", "ada@example.com", "correct").await;

    let wrong_password = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "ada@example.com", "password": "wrong" }))
        .to_request();
    let res1 = test::call_service(&app, wrong_password).await;
    assert_eq!(res1.status(), StatusCode::BAD_REQUEST);
    let body1: Value = test::read_body_json(res1).await;

    let unknown_email = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "nobody@example.com", "password": "correct" }))
        .to_request();
    let res2 = test::call_service(&app, unknown_email).await;
    assert_eq!(res2.status(), StatusCode::BAD_REQUEST);
    let body2: Value = test::read_body_json(res2).await;

    assert_eq!(body1["message"], body2["message"]);
}

#[actix_web::test]
async fn missing_and_invalid_tokens_are_uniform_401() {
    let state = test_state().await;
    let app = app!(state);

    let no_token = test::TestRequest::get().uri("/api/auth").to_request();
    assert_eq!(
        test::call_service(&app, no_token).await.status(),
        StatusCode::UNAUTHORIZED
    );

    let garbage = test::TestRequest::get()
        .uri("/api/auth")
        .insert_header(bearer("garbage"))
        .to_request();
    assert_eq!(
        test::call_service(&app, garbage).await.status(),
        StatusCode::UNAUTHORIZED
    );
}

#[actix_web::test]
async fn token_signed_with_wrong_secret_rejected() {
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde::Serialize;

    #[derive(Serialize)]
    struct Claims {
        sub: String,
        admin: bool,
        exp: i64,
        iat: i64,
        iss: String,
    }

    let state = test_state().await;
    let app = app!(state);

    let now = chrono::Utc::now().timestamp();
    let forged = encode(
        &Header::default(),
        &Claims {
            sub: uuid::Uuid::new_v4().to_string(),
            admin: true,
            exp: now + 3600,
            iat: now,
            iss: "quill-api".to_string(),
        },
        &EncodingKey::from_secret(b"some-other-secret"),
    )
    .unwrap();

    let req = test::TestRequest::get()
        .uri("/api/auth")
        .insert_header(bearer(&forged))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNAUTHORIZED
    );
}

#[actix_web::test]
async fn non_admin_blocked_from_admin_operations_without_side_effects() {
    let state = test_state().await;
    let app = app!(state);

    register(&app, "Reader", "reader@example.com", "pw").await;
    let token = login_token(&app, "reader@example.com", "pw").await;

    // Blog creation denied.
    let res = create_blog(&app, &token, "Nope", "Technology").await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Contact inbox denied.
    let req = test::TestRequest::get()
        .uri("/api/contacts")
        .insert_header(bearer(&token))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::FORBIDDEN
    );

    // Bulk user delete denied, accounts untouched.
    let req = test::TestRequest::delete()
        .uri("/api/auth")
        .insert_header(bearer(&token))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::FORBIDDEN
    );

    // No blog was persisted by the denied create.
    let req = test::TestRequest::get().uri("/api/blogs").to_request();
    let blogs: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(blogs.as_array().unwrap().len(), 0);

    // The reader account still exists.
    let again = login_token(&app, "reader@example.com", "pw").await;
    assert!(!again.is_empty());
}

#[actix_web::test]
async fn admin_creates_blog_with_valid_category_and_no_image() {
    let state = test_state().await;
    let app = app!(state);

    let admin = login_token(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let res = create_blog(&app, &admin, "Rust in Production", "Technology").await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let blog: Value = test::read_body_json(res).await;
    assert_eq!(blog["category"], "Technology");
    assert!(blog.get("image").is_none());
    // Author expanded to name and email.
    assert_eq!(blog["author"]["email"], ADMIN_EMAIL);
}

#[actix_web::test]
async fn unknown_category_rejected_and_nothing_persisted() {
    let state = test_state().await;
    let app = app!(state);

    let admin = login_token(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let res = create_blog(&app, &admin, "Match Report", "Sports").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["message"], "Invalid category");

    let req = test::TestRequest::get().uri("/api/blogs").to_request();
    let blogs: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(blogs.as_array().unwrap().len(), 0);
}

#[actix_web::test]
async fn like_unlike_mutual_exclusion() {
    let state = test_state().await;
    let app = app!(state);

    let admin = login_token(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let created: Value =
        test::read_body_json(create_blog(&app, &admin, "Reactions", "Innovation").await).await;
    let blog_id = created["id"].as_str().unwrap().to_string();

    register(&app, "Reader", "reader@example.com", "pw").await;
    let token = login_token(&app, "reader@example.com", "pw").await;

    // First like succeeds.
    let req = test::TestRequest::post()
        .uri(&format!("/api/blogs/{blog_id}/like"))
        .insert_header(bearer(&token))
        .to_request();
    let liked: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(liked["likes"].as_array().unwrap().len(), 1);

    // Second like rejected, sets unchanged.
    let req = test::TestRequest::post()
        .uri(&format!("/api/blogs/{blog_id}/like"))
        .insert_header(bearer(&token))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get()
        .uri(&format!("/api/blogs/{blog_id}"))
        .to_request();
    let current: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(current["likes"].as_array().unwrap().len(), 1);
    assert_eq!(current["unlikes"].as_array().unwrap().len(), 0);

    // Unlike moves the caller across, never present in both.
    let req = test::TestRequest::post()
        .uri(&format!("/api/blogs/{blog_id}/unlike"))
        .insert_header(bearer(&token))
        .to_request();
    let unliked: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(unliked["likes"].as_array().unwrap().len(), 0);
    assert_eq!(unliked["unlikes"].as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn deleting_comment_unlinks_it_from_blog() {
    let state = test_state().await;
    let app = app!(state);

    let admin = login_token(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let created: Value =
        test::read_body_json(create_blog(&app, &admin, "Discussion", "Education").await).await;
    let blog_id = created["id"].as_str().unwrap().to_string();

    register(&app, "Commenter", "commenter@example.com", "pw").await;
    let token = login_token(&app, "commenter@example.com", "pw").await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/comments/{blog_id}"))
        .insert_header(bearer(&token))
        .set_json(json!({ "content": "Great read" }))
        .to_request();
    let comment: Value = test::call_and_read_body_json(&app, req).await;
    let comment_id = comment["id"].as_str().unwrap().to_string();
    assert_eq!(comment["user"]["email"], "commenter@example.com");

    // Linked into the blog.
    let req = test::TestRequest::get()
        .uri(&format!("/api/blogs/{blog_id}"))
        .to_request();
    let blog: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(blog["comments"].as_array().unwrap().len(), 1);

    // Another user may not delete it.
    register(&app, "Other", "other@example.com", "pw").await;
    let other = login_token(&app, "other@example.com", "pw").await;
    let req = test::TestRequest::delete()
        .uri(&format!("/api/comments/{comment_id}"))
        .insert_header(bearer(&other))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::FORBIDDEN
    );

    // The author deletes; the blog no longer references it.
    let req = test::TestRequest::delete()
        .uri(&format!("/api/comments/{comment_id}"))
        .insert_header(bearer(&token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/api/blogs/{blog_id}"))
        .to_request();
    let blog: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(blog["comments"].as_array().unwrap().len(), 0);

    let req = test::TestRequest::get()
        .uri(&format!("/api/comments/blog/{blog_id}"))
        .to_request();
    let listed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listed.as_array().unwrap().len(), 0);
}

#[actix_web::test]
async fn role_flag_in_profile_update_is_admin_only() {
    let state = test_state().await;
    let app = app!(state);

    let res = register(&app, "Climber", "climber@example.com", "pw").await;
    let created: Value = test::read_body_json(res).await;
    let user_id = created["userId"].as_str().unwrap().to_string();
    let token = login_token(&app, "climber@example.com", "pw").await;

    // Self-elevation denied.
    let req = test::TestRequest::put()
        .uri(&format!("/api/auth/{user_id}"))
        .insert_header(bearer(&token))
        .set_json(json!({ "isAdmin": true }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::FORBIDDEN
    );

    // A fresh login still carries no admin rights, and admin-only
    // operations stay closed.
    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "climber@example.com", "password": "pw" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["isAdmin"], false);

    let req = test::TestRequest::delete()
        .uri("/api/auth")
        .insert_header(bearer(&token))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::FORBIDDEN
    );

    // An administrator may grant the role.
    let admin = login_token(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let req = test::TestRequest::put()
        .uri(&format!("/api/auth/{user_id}"))
        .insert_header(bearer(&admin))
        .set_json(json!({ "isAdmin": true }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "climber@example.com", "password": "pw" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["isAdmin"], true);
}

#[actix_web::test]
async fn profile_update_cannot_take_anothers_email() {
    let state = test_state().await;
    let app = app!(state);

    register(&app, "Ada", "ada@example.com", "pw").await;
    let res = register(&app, "Grace", "grace@example.com", "pw").await;
    let created: Value = test::read_body_json(res).await;
    let grace_id = created["userId"].as_str().unwrap().to_string();
    let token = login_token(&app, "grace@example.com", "pw").await;

    let req = test::TestRequest::put()
        .uri(&format!("/api/auth/{grace_id}"))
        .insert_header(bearer(&token))
        .set_json(json!({ "email": "ada@example.com" }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["message"], "Email already registered");

    // The account keeps its original email.
    let again = login_token(&app, "grace@example.com", "pw").await;
    assert!(!again.is_empty());
}

#[actix_web::test]
async fn contact_submission_and_admin_reply_flow() {
    let state = test_state().await;
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api/contacts")
        .set_json(json!({
            "name": "Visitor",
            "email": "visitor@example.com",
            "subject": "Question",
            "message": "How do I subscribe?"
        }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let contact: Value = test::read_body_json(res).await;
    assert_eq!(contact["status"], "pending");
    assert_eq!(contact["autoResponseSent"], true);
    let contact_id = contact["id"].as_str().unwrap().to_string();

    let admin = login_token(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let req = test::TestRequest::post()
        .uri(&format!("/api/contacts/{contact_id}/reply"))
        .insert_header(bearer(&admin))
        .set_json(json!({ "adminReply": "Use the subscribe button." }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["contact"]["status"], "responded");
    assert_eq!(body["contact"]["adminReply"], "Use the subscribe button.");
}

#[actix_web::test]
async fn contact_submission_requires_all_fields() {
    let state = test_state().await;
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api/contacts")
        .set_json(json!({
            "name": "Visitor",
            "email": "visitor@example.com",
            "subject": "",
            "message": "hello"
        }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn admin_bulk_delete_reports_count() {
    let state = test_state().await;
    let app = app!(state);

    register(&app, "A", "a@example.com", "pw").await;
    register(&app, "B", "b@example.com", "pw").await;
    let admin = login_token(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let req = test::TestRequest::delete()
        .uri("/api/auth")
        .insert_header(bearer(&admin))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    // Admin plus the two registrations.
    assert_eq!(body["message"], "All users deleted (3)");
}
