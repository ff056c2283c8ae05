/// HTTP request handlers
use actix_middleware::SessionHeader;
use actix_web::{web, HttpResponse};
use session_authz::{AuthorizationService, Role, Verdict};
use tracing::debug;

/// `GET /api/v1/verify/{required_role}`
///
/// Reads the `session` header and answers with a [`Verdict`]. A missing
/// header or a role that is not an integer is a denial, not a client error.
pub async fn verify(
    service: web::Data<AuthorizationService>,
    required_role: web::Path<String>,
    session: Option<SessionHeader>,
) -> HttpResponse {
    let verdict = match (required_role.parse::<i64>(), session) {
        (Ok(required), Some(session)) => service.verify(session.as_str(), Role(required)),
        (Err(_), _) => {
            debug!(required_role = %required_role, "Required role is not an integer");
            Verdict::DENIED
        }
        (Ok(_), None) => {
            debug!("Verification request without session header");
            Verdict::DENIED
        }
    };

    HttpResponse::Ok().json(verdict)
}

pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "service": "auth-service",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
