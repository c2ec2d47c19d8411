//! HTTP handlers and route configuration.

mod auth;
mod health;
mod posts;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            // Versioned API
            .service(
                web::scope("/v1")
                    .service(web::scope("/auth").route("/login", web::post().to(auth::login)))
                    .service(
                        web::scope("/posts")
                            .route("", web::post().to(posts::create))
                            .route("", web::get().to(posts::list))
                            .route("/{post_id}", web::get().to(posts::get))
                            .route("/{post_id}", web::patch().to(posts::update))
                            .route("/{post_id}", web::delete().to(posts::delete)),
                    ),
            ),
    );
}
