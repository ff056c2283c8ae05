//! Service Client
//!
//! HTTP client Campus services use to call each other, carrying the
//! caller's session token on every request.
//!
//! Calls never fail loudly: [`ServiceClient::call`] returns the body on an
//! exact `200` and `None` on anything else. Use
//! [`ServiceClient::try_call`] when the reason matters (logs, metrics).

pub mod error;
pub mod http_client;
pub mod remote_authorizer;
pub mod target;

pub use bytes::Bytes;
pub use error::{CallError, ServiceClientError};
pub use http_client::{Method, ServiceClient, SESSION_HEADER};
pub use remote_authorizer::{RemoteAuthorizer, VERIFY_PATH};
pub use target::ServiceTarget;
