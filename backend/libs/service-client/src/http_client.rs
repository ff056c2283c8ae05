//! HTTP client for inter-service communication
//!
//! One [`ServiceClient`] wraps one `reqwest` connection pool and is cloned
//! into every handler that needs it.

use bytes::Bytes;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, StatusCode};
use resilience::{http_internal_config, with_timeout, TimeoutConfig, TimeoutError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::env;
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{CallError, ServiceClientError};
use crate::target::ServiceTarget;

/// Header carrying the caller's session token between services.
pub const SESSION_HEADER: &str = "session";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => f.write_str("GET"),
            Method::Post => f.write_str("POST"),
        }
    }
}

/// Inter-service HTTP client
#[derive(Debug, Clone)]
pub struct ServiceClient {
    client: Client,
    timeouts: TimeoutConfig,
}

impl ServiceClient {
    /// Build a client with its own connection pool.
    pub fn new(timeouts: TimeoutConfig) -> Result<Self, ServiceClientError> {
        let client = Client::builder()
            .connect_timeout(timeouts.connect)
            .build()
            .map_err(ServiceClientError::Build)?;

        Ok(Self::with_client(client, timeouts))
    }

    /// Build a client from `SERVICE_CLIENT_TIMEOUT_MS` and
    /// `SERVICE_CLIENT_CONNECT_TIMEOUT_MS`, falling back to
    /// [`http_internal_config`] for whichever is unset.
    pub fn from_env() -> Result<Self, ServiceClientError> {
        let defaults = http_internal_config();
        let timeouts = TimeoutConfig {
            duration: millis_from_env("SERVICE_CLIENT_TIMEOUT_MS", defaults.duration)?,
            connect: millis_from_env("SERVICE_CLIENT_CONNECT_TIMEOUT_MS", defaults.connect)?,
        };

        Self::new(timeouts)
    }

    /// Reuse an existing pool.
    pub fn with_client(client: Client, timeouts: TimeoutConfig) -> Self {
        Self { client, timeouts }
    }

    pub fn timeouts(&self) -> TimeoutConfig {
        self.timeouts
    }

    /// Send one request and return the body iff the peer answered `200`.
    ///
    /// Every other outcome (other status, refused or dropped connection,
    /// timeout, unusable token) is logged and returned as `None`. `body` is
    /// only sent for [`Method::Post`].
    pub async fn call<B>(
        &self,
        method: Method,
        target: &ServiceTarget,
        body: Option<&B>,
        session: &str,
    ) -> Option<Bytes>
    where
        B: Serialize + ?Sized,
    {
        match self.try_call(method, target, body, session).await {
            Ok(bytes) => Some(bytes),
            Err(err) => {
                warn!(
                    method = %method,
                    target = %target,
                    kind = err.kind(),
                    error = %err,
                    "Inter-service call failed"
                );
                None
            }
        }
    }

    /// Like [`call`](Self::call), keeping the reason for failure.
    pub async fn try_call<B>(
        &self,
        method: Method,
        target: &ServiceTarget,
        body: Option<&B>,
        session: &str,
    ) -> Result<Bytes, CallError>
    where
        B: Serialize + ?Sized,
    {
        let url = target.url()?;
        let session = HeaderValue::from_str(session).map_err(|_| CallError::InvalidSession)?;

        let mut request = match method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
        }
        .header(SESSION_HEADER, session)
        .header(CONTENT_TYPE, "application/json");

        if let (Method::Post, Some(body)) = (method, body) {
            request = request.body(serde_json::to_vec(body)?);
        }

        debug!(method = %method, target = %target, "Calling service");

        match with_timeout(self.timeouts.duration, exchange(request)).await {
            Ok(result) => result,
            Err(TimeoutError::Elapsed(after)) => Err(CallError::Timeout(after)),
        }
    }

    pub async fn get(&self, target: &ServiceTarget, session: &str) -> Option<Bytes> {
        self.call::<()>(Method::Get, target, None, session).await
    }

    pub async fn post<B>(&self, target: &ServiceTarget, body: &B, session: &str) -> Option<Bytes>
    where
        B: Serialize + ?Sized,
    {
        self.call(Method::Post, target, Some(body), session).await
    }

    /// GET and decode the JSON body. A body that does not decode as `T` is
    /// treated like any other failure.
    pub async fn get_json<T>(&self, target: &ServiceTarget, session: &str) -> Option<T>
    where
        T: DeserializeOwned,
    {
        let bytes = self.get(target, session).await?;
        decode_body(target, &bytes)
    }

    pub async fn post_json<B, T>(&self, target: &ServiceTarget, body: &B, session: &str) -> Option<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let bytes = self.post(target, body, session).await?;
        decode_body(target, &bytes)
    }
}

fn millis_from_env(name: &'static str, default: Duration) -> Result<Duration, ServiceClientError> {
    match env::var(name) {
        Ok(value) => match value.trim().parse::<u64>() {
            Ok(ms) if ms > 0 => Ok(Duration::from_millis(ms)),
            _ => Err(ServiceClientError::InvalidSetting { name, value }),
        },
        Err(_) => Ok(default),
    }
}

async fn exchange(request: RequestBuilder) -> Result<Bytes, CallError> {
    let response = request.send().await?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(CallError::UnexpectedStatus(status));
    }

    Ok(response.bytes().await?)
}

fn decode_body<T: DeserializeOwned>(target: &ServiceTarget, bytes: &[u8]) -> Option<T> {
    match serde_json::from_slice(bytes) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(target = %target, error = %e, "Failed to decode service response");
            None
        }
    }
}
