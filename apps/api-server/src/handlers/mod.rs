//! HTTP handlers and route configuration.

mod accounts;
mod blogs;
mod comments;
mod contacts;
mod health;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .service(
                web::scope("/auth")
                    // Public
                    .route("/register", web::post().to(accounts::register))
                    .route("/login", web::post().to(accounts::login))
                    // Protected
                    .route("", web::get().to(accounts::list_users))
                    .route("", web::delete().to(accounts::delete_all_users))
                    .route("/{user_id}", web::get().to(accounts::get_user))
                    .route("/{user_id}", web::put().to(accounts::update_user))
                    .route("/{user_id}", web::delete().to(accounts::delete_user)),
            )
            .service(
                web::scope("/blogs")
                    // Public reads
                    .route("", web::get().to(blogs::list_blogs))
                    // Admin content management
                    .route("", web::post().to(blogs::create_blog))
                    .route("", web::delete().to(blogs::delete_all_blogs))
                    // Reactions
                    .route("/{blog_id}/like", web::post().to(blogs::like_blog))
                    .route("/{blog_id}/unlike", web::post().to(blogs::unlike_blog))
                    .route("/{blog_id}/share", web::post().to(blogs::share_blog))
                    .route("/{blog_id}", web::get().to(blogs::get_blog))
                    .route("/{blog_id}", web::put().to(blogs::update_blog))
                    .route("/{blog_id}", web::delete().to(blogs::delete_blog)),
            )
            .service(
                web::scope("/comments")
                    .route("/blog/{blog_id}", web::get().to(comments::list_comments))
                    .route(
                        "/blog/{blog_id}",
                        web::delete().to(comments::delete_all_for_blog),
                    )
                    .route("/{blog_id}", web::post().to(comments::add_comment))
                    .route("/{comment_id}", web::get().to(comments::get_comment))
                    .route("/{comment_id}", web::put().to(comments::update_comment))
                    .route("/{comment_id}", web::delete().to(comments::delete_comment)),
            )
            .service(
                web::scope("/contacts")
                    // Public submission
                    .route("", web::post().to(contacts::submit_contact))
                    // Admin inbox
                    .route("", web::get().to(contacts::list_contacts))
                    .route("", web::delete().to(contacts::delete_all_contacts))
                    .route("/{contact_id}/reply", web::post().to(contacts::reply_contact))
                    .route("/{contact_id}", web::get().to(contacts::get_contact))
                    .route("/{contact_id}", web::put().to(contacts::update_contact))
                    .route("/{contact_id}", web::delete().to(contacts::delete_contact)),
            ),
    );
}
