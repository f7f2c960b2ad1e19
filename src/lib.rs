pub mod api;
pub mod auth;
pub mod config;
pub mod controllers;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod templates_structs;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::{cookie::Key, middleware::from_fn, web};

/// Cookie-backed session holding the credential, user and page state.
pub fn session_middleware(key: Key, secure: bool) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_secure(secure)
        .cookie_http_only(true)
        .build()
}

/// Registers every page route. Expects `web::Data<dyn api::IssueApi>` in app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        // Public routes
        .route("/", web::get().to(handlers::public_handlers::index))
        .route("/login", web::post().to(handlers::auth_handlers::login_submit))
        .route("/signup", web::post().to(handlers::auth_handlers::signup_submit))
        .route("/logout", web::post().to(handlers::auth_handlers::logout))
        // Citizen dashboard
        .service(
            web::scope("/citizen")
                .wrap(from_fn(auth::middleware::require_citizen))
                .route("", web::get().to(handlers::citizen_handlers::dashboard))
                .route("/location", web::post().to(handlers::citizen_handlers::capture_location))
                .route("/report", web::post().to(handlers::citizen_handlers::submit_report))
                .route("/issues/{id}", web::get().to(handlers::citizen_handlers::issue_detail)),
        )
        // Admin dashboard
        .service(
            web::scope("/admin")
                .wrap(from_fn(auth::middleware::require_admin))
                .route("", web::get().to(handlers::admin_handlers::dashboard))
                .route("/issues/{id}", web::get().to(handlers::admin_handlers::issue_detail))
                .route("/issues/{id}/status", web::post().to(handlers::admin_handlers::update_status)),
        );
}
