//! # Actix Middleware Library
//!
//! Middleware shared by Campus Actix services
//!
//! ## Modules
//! - `session_auth`: session token gate and `SessionHeader` extractor
//! - `logging`: structured request logging

pub mod logging;
pub mod session_auth;

pub use logging::RequestLogging;
pub use session_auth::{SessionAuthMiddleware, SessionHeader, SESSION_HEADER};
