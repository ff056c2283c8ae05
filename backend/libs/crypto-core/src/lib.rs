//! Crypto primitives shared by Campus services.
//!
//! The only primitive today is the signed session token every service
//! verifies before acting on a request. See [`session`].

pub mod session;

pub use session::{
    InvalidTokenError, InvalidTokenReason, KeyError, Role, SessionCodec, SessionKey,
    SessionToken, SignError, SESSION_SUBJECT,
};
