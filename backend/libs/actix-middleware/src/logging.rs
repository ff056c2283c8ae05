//! Logging middleware
//!
//! One structured line per request. Header values are never logged: the
//! `session` header is a credential.

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use std::time::Instant;

/// Middleware that logs HTTP requests and their outcome
#[derive(Clone)]
pub struct RequestLogging {
    service_name: &'static str,
}

impl RequestLogging {
    pub fn new(service_name: &'static str) -> Self {
        Self { service_name }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequestLogging
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestLoggingService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestLoggingService {
            service,
            service_name: self.service_name,
        }))
    }
}

pub struct RequestLoggingService<S> {
    service: S,
    service_name: &'static str,
}

impl<S, B> Service<ServiceRequest> for RequestLoggingService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start = Instant::now();
        let method = req.method().clone();
        let path = req.path().to_string();
        let service_name = self.service_name;

        let fut = self.service.call(req);

        Box::pin(async move {
            let result = fut.await;
            let duration_ms = start.elapsed().as_millis() as u64;

            match &result {
                Ok(res) if res.status().is_server_error() => tracing::warn!(
                    service = service_name,
                    method = %method,
                    path = %path,
                    status = res.status().as_u16(),
                    duration_ms,
                    "HTTP request failed"
                ),
                Ok(res) => tracing::info!(
                    service = service_name,
                    method = %method,
                    path = %path,
                    status = res.status().as_u16(),
                    duration_ms,
                    "HTTP request completed"
                ),
                Err(err) => tracing::info!(
                    service = service_name,
                    method = %method,
                    path = %path,
                    status = err.as_response_error().status_code().as_u16(),
                    duration_ms,
                    "HTTP request rejected"
                ),
            }

            result
        })
    }
}
