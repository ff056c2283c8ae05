use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    error::ErrorUnauthorized,
    Error, FromRequest, HttpMessage, HttpRequest,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use session_authz::{Authorizer, Role};
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

/// Header carrying the session token, as sent by browsers and peer services.
pub const SESSION_HEADER: &str = "session";

/// Raw session token of an authorised request.
///
/// Inserted by [`SessionAuthMiddleware`] so handlers can forward the token
/// to downstream services unchanged.
#[derive(Clone)]
pub struct SessionHeader(pub String);

impl SessionHeader {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionHeader(..)")
    }
}

/// Session Authentication Middleware
///
/// Rejects with `401` any request whose `session` header is missing or
/// does not verify for `required`. The response never says which.
pub struct SessionAuthMiddleware {
    authorizer: Arc<dyn Authorizer>,
    required: Role,
}

impl SessionAuthMiddleware {
    pub fn new(authorizer: Arc<dyn Authorizer>, required: Role) -> Self {
        Self {
            authorizer,
            required,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SessionAuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = SessionAuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionAuthMiddlewareService {
            service: Rc::new(service),
            authorizer: self.authorizer.clone(),
            required: self.required,
        }))
    }
}

pub struct SessionAuthMiddlewareService<S> {
    service: Rc<S>,
    authorizer: Arc<dyn Authorizer>,
    required: Role,
}

impl<S, B> Service<ServiceRequest> for SessionAuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let authorizer = self.authorizer.clone();
        let required = self.required;

        Box::pin(async move {
            let session = req
                .headers()
                .get(SESSION_HEADER)
                .and_then(|h| h.to_str().ok())
                .map(str::to_owned);

            let Some(session) = session else {
                tracing::debug!(path = %req.path(), "Missing session header");
                return Err(ErrorUnauthorized("Unauthorized"));
            };

            if !authorizer.authorise(&session, required).await.is_authorised() {
                tracing::debug!(
                    path = %req.path(),
                    required_role = %required,
                    "Session not authorised"
                );
                return Err(ErrorUnauthorized("Unauthorized"));
            }

            req.extensions_mut().insert(SessionHeader(session));

            service.call(req).await
        })
    }
}

/// Prefers the header stored by the middleware and falls back to the raw
/// header on routes that are not gated.
impl FromRequest for SessionHeader {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        if let Some(session) = req.extensions().get::<SessionHeader>() {
            return ready(Ok(session.clone()));
        }

        ready(
            req.headers()
                .get(SESSION_HEADER)
                .and_then(|h| h.to_str().ok())
                .map(|s| SessionHeader(s.to_owned()))
                .ok_or_else(|| ErrorUnauthorized("Unauthorized")),
        )
    }
}
