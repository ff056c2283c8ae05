/// Session token model and codec shared by every Campus service
///
/// A session token is a compact JWS signed with HS256 over a secret that
/// every trusted service holds. Services never issue tokens on the request
/// path; they only verify them with [`SessionCodec::decode`].
///
/// ## Security Design
///
/// - **HS256 ONLY**: tokens carrying any other `alg` header are rejected
/// - **Explicit key**: the secret is loaded once at startup into a
///   [`SessionKey`] and handed to the codec; there is no global key slot
/// - **Opaque failures**: every decode failure is the same
///   [`InvalidTokenError`]; the reason is kept for logs only
/// - **No clock inside**: expiry is judged by the caller via
///   [`SessionToken::is_expired_at`]
///
/// ## Usage
///
/// ```rust
/// use chrono::{Duration, Utc};
/// use crypto_core::session::{Role, SessionCodec, SessionKey, SessionToken};
///
/// let key = SessionKey::from_secret(b"shared-secret").unwrap();
/// let codec = SessionCodec::new(key);
///
/// let token = SessionToken::new("ab123", Role::TEACHER, Utc::now() + Duration::hours(1));
/// let wire = codec.encode(&token).unwrap();
///
/// let decoded = codec.decode(&wire).unwrap();
/// assert_eq!(decoded.net_id, "ab123");
/// assert!(!decoded.is_expired());
/// ```
use chrono::{DateTime, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Constants
// ============================================================================

/// Literal `sub` claim carried by every session token.
///
/// The shared secret may sign tokens for other purposes; only tokens with
/// this subject are accepted as sessions.
pub const SESSION_SUBJECT: &str = "session";

const SESSION_ALGORITHM: Algorithm = Algorithm::HS256;

// ============================================================================
// Data Structures
// ============================================================================

/// Privilege level carried in the `role` claim.
///
/// Roles are ordered integers: a higher value dominates a lower one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(pub i64);

impl Role {
    /// Standard user.
    pub const STUDENT: Role = Role(0);
    /// Teacher or administrator.
    pub const TEACHER: Role = Role(1);

    pub fn level(self) -> i64 {
        self.0
    }
}

impl From<i64> for Role {
    fn from(level: i64) -> Self {
        Role(level)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Decoded session token.
///
/// The subject is not stored: a decoded token always has subject
/// [`SESSION_SUBJECT`], anything else fails to decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken {
    /// Caller identity (`netId` claim). May be empty.
    pub net_id: String,
    /// Caller privilege level.
    pub role: Role,
    /// Instant at which the token stops being valid.
    pub expiration: DateTime<Utc>,
    /// Issue time, when the issuer recorded one.
    pub issued_at: Option<DateTime<Utc>>,
}

impl SessionToken {
    pub fn new(net_id: impl Into<String>, role: Role, expiration: DateTime<Utc>) -> Self {
        Self {
            net_id: net_id.into(),
            role,
            expiration,
            issued_at: None,
        }
    }

    pub fn subject(&self) -> &'static str {
        SESSION_SUBJECT
    }

    /// A token is expired at and after its expiration instant.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expiration
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

/// Claims as they appear on the wire. Every field is optional here so the
/// codec, not serde, decides which absence is fatal and in which order.
#[derive(Debug, Serialize, Deserialize)]
struct WireClaims {
    #[serde(skip_serializing_if = "Option::is_none")]
    sub: Option<String>,
    #[serde(rename = "netId", skip_serializing_if = "Option::is_none")]
    net_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    exp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    iat: Option<i64>,
}

// ============================================================================
// Errors
// ============================================================================

/// Why a token was rejected. Diagnostic only: never send it to a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidTokenReason {
    Malformed,
    Algorithm,
    Signature,
    Subject,
    Expired,
}

impl InvalidTokenReason {
    pub fn as_str(self) -> &'static str {
        match self {
            InvalidTokenReason::Malformed => "malformed",
            InvalidTokenReason::Algorithm => "unsupported_algorithm",
            InvalidTokenReason::Signature => "bad_signature",
            InvalidTokenReason::Subject => "wrong_subject",
            InvalidTokenReason::Expired => "expired",
        }
    }
}

impl fmt::Display for InvalidTokenReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single error kind a token verification can produce.
///
/// `Display` is the same for every reason.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid session token")]
pub struct InvalidTokenError {
    reason: InvalidTokenReason,
}

impl InvalidTokenError {
    pub fn expired() -> Self {
        InvalidTokenReason::Expired.into()
    }

    pub fn reason(&self) -> InvalidTokenReason {
        self.reason
    }
}

impl From<InvalidTokenReason> for InvalidTokenError {
    fn from(reason: InvalidTokenReason) -> Self {
        Self { reason }
    }
}

impl From<jsonwebtoken::errors::Error> for InvalidTokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        let reason = match err.kind() {
            ErrorKind::InvalidSignature => InvalidTokenReason::Signature,
            ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                InvalidTokenReason::Algorithm
            }
            ErrorKind::ExpiredSignature => InvalidTokenReason::Expired,
            _ => InvalidTokenReason::Malformed,
        };
        reason.into()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    #[error("session secret must not be empty")]
    EmptySecret,
}

#[derive(Debug, thiserror::Error)]
#[error("failed to sign session token: {0}")]
pub struct SignError(#[from] jsonwebtoken::errors::Error);

// ============================================================================
// Key
// ============================================================================

/// Shared HS256 secret, parsed once at startup and immutable afterwards.
#[derive(Clone)]
pub struct SessionKey {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SessionKey {
    pub fn from_secret(secret: &[u8]) -> Result<Self, KeyError> {
        if secret.is_empty() {
            return Err(KeyError::EmptySecret);
        }

        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        })
    }
}

impl fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionKey").finish_non_exhaustive()
    }
}

// ============================================================================
// Codec
// ============================================================================

/// Encodes and decodes session tokens under one [`SessionKey`].
///
/// Stateless once built; clone it or share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct SessionCodec {
    key: SessionKey,
    validation: Validation,
}

impl SessionCodec {
    pub fn new(key: SessionKey) -> Self {
        let mut validation = Validation::new(SESSION_ALGORITHM);
        // Expiry and claim presence are checked below and by the caller.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.required_spec_claims.clear();
        validation.validate_aud = false;

        Self { key, validation }
    }

    /// Verify the signature of `token` and decode its claims.
    ///
    /// Checks run in order: algorithm and signature, then the subject, then
    /// the presence and shape of `netId`, `role` and `exp`. Expiration is
    /// not judged here.
    ///
    /// ## Errors
    ///
    /// Returns [`InvalidTokenError`] if:
    /// - The token is not a well-formed compact JWS
    /// - The header names any algorithm other than HS256
    /// - The signature does not verify under the shared key
    /// - `sub` is missing or not `"session"`
    /// - `netId`, `role` or `exp` is missing or mistyped
    pub fn decode(&self, token: &str) -> Result<SessionToken, InvalidTokenError> {
        let claims = decode::<WireClaims>(token, &self.key.decoding, &self.validation)?.claims;

        if claims.sub.as_deref() != Some(SESSION_SUBJECT) {
            return Err(InvalidTokenReason::Subject.into());
        }

        let net_id = claims.net_id.ok_or(InvalidTokenReason::Malformed)?;
        let role = claims.role.map(Role).ok_or(InvalidTokenReason::Malformed)?;
        let expiration = claims
            .exp
            .and_then(from_unix)
            .ok_or(InvalidTokenReason::Malformed)?;
        let issued_at = match claims.iat {
            Some(secs) => Some(from_unix(secs).ok_or(InvalidTokenReason::Malformed)?),
            None => None,
        };

        Ok(SessionToken {
            net_id,
            role,
            expiration,
            issued_at,
        })
    }

    /// Sign `token` with the shared key.
    ///
    /// Used by the issuer and by tests; verifying services never call it.
    pub fn encode(&self, token: &SessionToken) -> Result<String, SignError> {
        let claims = WireClaims {
            sub: Some(SESSION_SUBJECT.to_string()),
            net_id: Some(token.net_id.clone()),
            role: Some(token.role.level()),
            exp: Some(token.expiration.timestamp()),
            iat: token.issued_at.map(|t| t.timestamp()),
        };

        Ok(encode(
            &Header::new(SESSION_ALGORITHM),
            &claims,
            &self.key.encoding,
        )?)
    }
}

fn from_unix(secs: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
}

// ============================================================================
// Tests
// ============================================================================
