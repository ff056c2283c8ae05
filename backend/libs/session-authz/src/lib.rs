//! Session Authorization
//!
//! Turns a session token and an action's required role into a single
//! authorised / not-authorised verdict.
//!
//! ## Core Components
//!
//! - **AccessPolicy**: the role comparison, behind a trait so a capability
//!   check can replace it later
//! - **AuthorizationService**: decode, expiry check, policy, in that order;
//!   never fails, always answers
//! - **Authorizer**: async seam shared by the in-process service and the
//!   remote client in `service-client`
//!
//! ## Security Guarantees
//!
//! - A bad token and a weak role produce the same verdict
//! - Why a check failed is logged at `debug`, never returned
//! - Expiry is checked before role

pub mod authorizer;
pub mod decision;
pub mod error;
pub mod service;

pub use authorizer::Authorizer;
pub use crypto_core::{Role, SessionCodec, SessionKey, SessionToken};
pub use decision::{decide, AccessPolicy, RoleThreshold};
pub use error::AuthzError;
pub use service::{AuthorizationService, Verdict};
