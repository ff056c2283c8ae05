use crypto_core::{InvalidTokenError, Role};
use thiserror::Error;

/// Why a verification was denied.
///
/// In-process callers may inspect it for diagnostics. It must never cross a
/// service boundary: over the wire every variant is `authorised = false`.
#[derive(Debug, Error)]
pub enum AuthzError {
    /// Bad signature, wrong subject, malformed, unsupported algorithm, or expired
    #[error(transparent)]
    InvalidToken(#[from] InvalidTokenError),

    /// Valid token whose role is below the requirement
    #[error("insufficient role")]
    InsufficientRole { required: Role, actual: Role },
}

impl AuthzError {
    /// Short label for structured logs.
    pub fn diagnostic(&self) -> &'static str {
        match self {
            AuthzError::InvalidToken(err) => err.reason().as_str(),
            AuthzError::InsufficientRole { .. } => "insufficient_role",
        }
    }
}
