//! Auth Service
//!
//! Answers one question for peer services: does this session token allow
//! an action needing this role? The answer is always `200` with
//! `{"authorised": bool}` so a caller learns nothing about why a token failed.

pub mod config;
pub mod handlers;

use actix_web::web;

/// Register every route. Shared by `main` and the integration tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(handlers::health)).service(
        web::scope("/api/v1").route("/verify/{required_role}", web::get().to(handlers::verify)),
    );
}
