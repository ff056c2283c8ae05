use actix_web::{test, web, App, HttpServer};
use chrono::{Duration, Utc};
use resilience::verification_config;
use serde_json::Value;
use service_client::{RemoteAuthorizer, ServiceClient};
use session_authz::{
    AuthorizationService, Authorizer, Role, SessionCodec, SessionKey, SessionToken, Verdict,
};

const SECRET: &[u8] = b"verify-endpoint-secret";

fn codec() -> SessionCodec {
    SessionCodec::new(SessionKey::from_secret(SECRET).unwrap())
}

fn state() -> web::Data<AuthorizationService> {
    web::Data::new(AuthorizationService::new(codec()))
}

fn mint(role: Role, ttl: Duration) -> String {
    codec()
        .encode(&SessionToken::new("ab123", role, Utc::now() + ttl))
        .unwrap()
}

macro_rules! verdict_for {
    ($uri:expr, $session:expr) => {{
        let app = test::init_service(
            App::new()
                .app_data(state())
                .configure(auth_service::configure),
        )
        .await;
        let mut req = test::TestRequest::get().uri($uri);
        if let Some(session) = $session {
            req = req.insert_header(("session", session));
        }
        let resp = test::call_service(&app, req.to_request()).await;
        assert_eq!(resp.status(), 200);
        let verdict: Verdict = test::read_body_json(resp).await;
        verdict
    }};
}

#[actix_web::test]
async fn test_sufficient_role_is_authorised() {
    let token = mint(Role::TEACHER, Duration::hours(1));
    assert_eq!(
        verdict_for!("/api/v1/verify/0", Some(token.as_str())),
        Verdict::GRANTED
    );
    assert_eq!(
        verdict_for!("/api/v1/verify/1", Some(token.as_str())),
        Verdict::GRANTED
    );
}

#[actix_web::test]
async fn test_insufficient_role_is_denied_with_200() {
    let token = mint(Role::STUDENT, Duration::hours(1));
    assert_eq!(
        verdict_for!("/api/v1/verify/1", Some(token.as_str())),
        Verdict::DENIED
    );
}

#[actix_web::test]
async fn test_missing_header_is_denied_with_200() {
    assert_eq!(verdict_for!("/api/v1/verify/0", None::<&str>), Verdict::DENIED);
}

#[actix_web::test]
async fn test_non_integer_role_is_denied_with_200() {
    let token = mint(Role::TEACHER, Duration::hours(1));
    assert_eq!(
        verdict_for!("/api/v1/verify/teacher", Some(token.as_str())),
        Verdict::DENIED
    );
}

#[actix_web::test]
async fn test_negative_role_requirement() {
    let token = mint(Role::STUDENT, Duration::hours(1));
    assert_eq!(
        verdict_for!("/api/v1/verify/-1", Some(token.as_str())),
        Verdict::GRANTED
    );
}

#[actix_web::test]
async fn test_expired_token_is_denied() {
    let token = mint(Role::TEACHER, -Duration::seconds(1));
    assert_eq!(
        verdict_for!("/api/v1/verify/0", Some(token.as_str())),
        Verdict::DENIED
    );
}

#[actix_web::test]
async fn test_foreign_key_is_denied() {
    let outsider = SessionCodec::new(SessionKey::from_secret(b"someone-else").unwrap());
    let token = outsider
        .encode(&SessionToken::new("ab123", Role::TEACHER, Utc::now() + Duration::hours(1)))
        .unwrap();
    assert_eq!(
        verdict_for!("/api/v1/verify/0", Some(token.as_str())),
        Verdict::DENIED
    );
}

#[actix_web::test]
async fn test_response_body_has_only_authorised_field() {
    let app = test::init_service(
        App::new()
            .app_data(state())
            .configure(auth_service::configure),
    )
    .await;
    let req = test::TestRequest::get()
        .uri("/api/v1/verify/1")
        .insert_header(("session", "garbage"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body, serde_json::json!({"authorised": false}));
}

#[actix_web::test]
async fn test_health() {
    let app = test::init_service(
        App::new()
            .app_data(state())
            .configure(auth_service::configure),
    )
    .await;
    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "auth-service");
}

#[actix_web::test]
async fn test_remote_authorizer_against_running_service() {
    let data = state();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .configure(auth_service::configure)
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .unwrap();
    let addr = server.addrs()[0];
    let server = server.run();
    let handle = server.handle();
    actix_rt::spawn(server);

    let client = ServiceClient::new(verification_config()).unwrap();
    let remote = RemoteAuthorizer::new(client, addr.ip().to_string(), addr.port());

    let teacher = mint(Role::TEACHER, Duration::hours(1));
    let student = mint(Role::STUDENT, Duration::hours(1));

    assert_eq!(remote.authorise(&teacher, Role::TEACHER).await, Verdict::GRANTED);
    assert_eq!(remote.authorise(&student, Role::TEACHER).await, Verdict::DENIED);
    assert_eq!(remote.authorise("garbage", Role::STUDENT).await, Verdict::DENIED);

    handle.stop(true).await;
}
