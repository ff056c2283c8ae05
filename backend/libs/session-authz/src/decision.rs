//! Role comparison

use crypto_core::{Role, SessionToken};

/// Decides whether an already-validated token may perform an action.
///
/// Implementations must not look at expiry or signature; the service has
/// rejected those tokens before the policy runs.
pub trait AccessPolicy: Send + Sync {
    fn permits(&self, token: &SessionToken, required: Role) -> bool;
}

/// Flat ordered scale: a role grants every action at or below its level.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoleThreshold;

impl AccessPolicy for RoleThreshold {
    fn permits(&self, token: &SessionToken, required: Role) -> bool {
        decide(token, required)
    }
}

/// `token.role >= required`
pub fn decide(token: &SessionToken, required: Role) -> bool {
    token.role >= required
}
