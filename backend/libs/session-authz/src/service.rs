use chrono::{DateTime, Utc};
use crypto_core::{InvalidTokenError, Role, SessionCodec, SessionToken};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::decision::{AccessPolicy, RoleThreshold};
use crate::error::AuthzError;

/// The only thing a caller ever learns about a verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub authorised: bool,
}

impl Verdict {
    pub const GRANTED: Verdict = Verdict { authorised: true };
    pub const DENIED: Verdict = Verdict { authorised: false };

    pub fn is_authorised(self) -> bool {
        self.authorised
    }
}

impl From<bool> for Verdict {
    fn from(authorised: bool) -> Self {
        Verdict { authorised }
    }
}

/// Verifies session tokens against a required role.
///
/// Holds only the codec (and through it the shared key) and the policy, so
/// one instance serves every request concurrently.
#[derive(Debug, Clone)]
pub struct AuthorizationService<P = RoleThreshold> {
    codec: SessionCodec,
    policy: P,
}

impl AuthorizationService<RoleThreshold> {
    pub fn new(codec: SessionCodec) -> Self {
        Self::with_policy(codec, RoleThreshold)
    }
}

impl<P: AccessPolicy> AuthorizationService<P> {
    pub fn with_policy(codec: SessionCodec, policy: P) -> Self {
        Self { codec, policy }
    }

    /// Verify `token` for an action needing `required`, at wall-clock now.
    ///
    /// Total: every input, including garbage, yields a verdict.
    pub fn verify(&self, token: &str, required: Role) -> Verdict {
        self.verify_at(token, required, Utc::now())
    }

    /// Same as [`verify`](Self::verify) with an explicit instant.
    pub fn verify_at(&self, token: &str, required: Role, now: DateTime<Utc>) -> Verdict {
        match self.check_at(token, required, now) {
            Ok(_) => Verdict::GRANTED,
            Err(err) => {
                debug!(
                    reason = err.diagnostic(),
                    required_role = %required,
                    "Session verification denied"
                );
                Verdict::DENIED
            }
        }
    }

    /// Verify and return the decoded token, or why it was denied.
    ///
    /// For in-process callers that need the caller's identity. Do not
    /// forward the error to a remote caller.
    pub fn check(&self, token: &str, required: Role) -> Result<SessionToken, AuthzError> {
        self.check_at(token, required, Utc::now())
    }

    pub fn check_at(
        &self,
        token: &str,
        required: Role,
        now: DateTime<Utc>,
    ) -> Result<SessionToken, AuthzError> {
        let session = self.codec.decode(token)?;

        if session.is_expired_at(now) {
            return Err(InvalidTokenError::expired().into());
        }

        if !self.policy.permits(&session, required) {
            return Err(AuthzError::InsufficientRole {
                required,
                actual: session.role,
            });
        }

        Ok(session)
    }
}
