use actix_middleware::{RequestLogging, SessionAuthMiddleware, SessionHeader};
use actix_web::{http::StatusCode, test, web, App, HttpResponse};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use session_authz::{
    AuthorizationService, Authorizer, Role, SessionCodec, SessionKey, SessionToken, Verdict,
};
use std::sync::Arc;

/// Echoes the forwarded session token
async fn echo_session(session: SessionHeader) -> HttpResponse {
    HttpResponse::Ok().body(session.0)
}

fn codec() -> SessionCodec {
    SessionCodec::new(SessionKey::from_secret(b"middleware-test-secret").unwrap())
}

fn mint(role: Role) -> String {
    codec()
        .encode(&SessionToken::new("ab123", role, Utc::now() + Duration::hours(1)))
        .unwrap()
}

fn local_authorizer() -> Arc<dyn Authorizer> {
    Arc::new(AuthorizationService::new(codec()))
}

macro_rules! status_of {
    ($app:expr, $req:expr) => {
        match test::try_call_service($app, $req).await {
            Ok(res) => res.status(),
            Err(err) => err.as_response_error().status_code(),
        }
    };
}

#[actix_web::test]
async fn test_authorised_request_reaches_handler_with_session() {
    let token = mint(Role::TEACHER);
    let app = test::init_service(
        App::new()
            .wrap(SessionAuthMiddleware::new(local_authorizer(), Role::TEACHER))
            .route("/grades", web::get().to(echo_session)),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/grades")
        .insert_header(("session", token.as_str()))
        .to_request();
    let body = test::call_and_read_body(&app, req).await;

    assert_eq!(body, token.as_bytes());
}

#[actix_web::test]
async fn test_missing_header_is_unauthorized() {
    let app = test::init_service(
        App::new()
            .wrap(SessionAuthMiddleware::new(local_authorizer(), Role::STUDENT))
            .route("/courses", web::get().to(echo_session)),
    )
    .await;

    let req = test::TestRequest::get().uri("/courses").to_request();
    assert_eq!(status_of!(&app, req), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_low_role_and_bad_token_look_the_same() {
    let app = test::init_service(
        App::new()
            .wrap(SessionAuthMiddleware::new(local_authorizer(), Role::TEACHER))
            .route("/grades", web::get().to(echo_session)),
    )
    .await;

    let student = test::TestRequest::get()
        .uri("/grades")
        .insert_header(("session", mint(Role::STUDENT)))
        .to_request();
    let garbage = test::TestRequest::get()
        .uri("/grades")
        .insert_header(("session", "garbage"))
        .to_request();

    assert_eq!(status_of!(&app, student), StatusCode::UNAUTHORIZED);
    assert_eq!(status_of!(&app, garbage), StatusCode::UNAUTHORIZED);
}

struct FixedVerdict(bool);

#[async_trait]
impl Authorizer for FixedVerdict {
    async fn authorise(&self, _session: &str, _required: Role) -> Verdict {
        Verdict::from(self.0)
    }
}

#[actix_web::test]
async fn test_any_authorizer_can_gate() {
    let app = test::init_service(
        App::new()
            .wrap(RequestLogging::new("test"))
            .service(
                web::scope("/open")
                    .wrap(SessionAuthMiddleware::new(Arc::new(FixedVerdict(true)), Role(5)))
                    .route("", web::get().to(echo_session)),
            )
            .service(
                web::scope("/closed")
                    .wrap(SessionAuthMiddleware::new(Arc::new(FixedVerdict(false)), Role(0)))
                    .route("", web::get().to(echo_session)),
            ),
    )
    .await;

    let open = test::TestRequest::get()
        .uri("/open")
        .insert_header(("session", "anything"))
        .to_request();
    let closed = test::TestRequest::get()
        .uri("/closed")
        .insert_header(("session", "anything"))
        .to_request();

    assert_eq!(status_of!(&app, open), StatusCode::OK);
    assert_eq!(status_of!(&app, closed), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_extractor_reads_header_on_ungated_route() {
    let app = test::init_service(App::new().route("/forward", web::get().to(echo_session))).await;

    let req = test::TestRequest::get()
        .uri("/forward")
        .insert_header(("session", "raw-token"))
        .to_request();
    let body = test::call_and_read_body(&app, req).await;
    assert_eq!(body, "raw-token".as_bytes());

    let req = test::TestRequest::get().uri("/forward").to_request();
    assert_eq!(status_of!(&app, req), StatusCode::UNAUTHORIZED);
}
