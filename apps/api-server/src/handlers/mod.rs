//! HTTP handlers and route configuration.

mod health;
mod posts;
mod rate_limits;
mod votes;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            // Post routes
            .service(
                web::scope("/posts")
                    .route("", web::post().to(posts::create_post))
                    .route("/{id}", web::get().to(posts::get_post))
                    .route("/{id}/votes", web::post().to(votes::cast_vote)),
            )
            // Operational routes
            .route(
                "/rate-limits/{user_id}/{action}",
                web::delete().to(rate_limits::reset_window),
            ),
    );
}
