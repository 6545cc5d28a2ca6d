//! Session values, expiration classification, and the codec seam.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::secret::Secret;

/// Identity claims carried by a session. Copied verbatim on renewal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Subject (user identifier)
    #[serde(rename = "sub")]
    pub subject: String,
    /// Username
    pub username: String,
    /// E-mail address
    pub email: String,
}

impl Identity {
    pub fn new(
        subject: impl Into<String>,
        username: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            username: username.into(),
            email: email.into(),
        }
    }
}

/// Decoded identity plus timing metadata.
///
/// Timestamps are unix seconds and `expires_at > issued_at` always holds.
/// Renewal builds a new `Session`; there are no setters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(flatten)]
    identity: Identity,
    #[serde(rename = "iat")]
    issued_at: u64,
    #[serde(rename = "exp")]
    expires_at: u64,
}

impl Session {
    /// Start a session at `now` lasting `ttl`.
    ///
    /// A zero `ttl` is bumped to one second, and `now` is clamped so that
    /// `issued_at + ttl` fits in a `u64`. Either way the expiry is always
    /// after issuance.
    pub fn issue(identity: Identity, now: u64, ttl: Duration) -> Self {
        let ttl = ttl.as_secs().max(1);
        let issued_at = now.min(u64::MAX - ttl);
        Self {
            identity,
            issued_at,
            expires_at: issued_at + ttl,
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn subject(&self) -> &str {
        &self.identity.subject
    }

    pub fn username(&self) -> &str {
        &self.identity.username
    }

    pub fn email(&self) -> &str {
        &self.identity.email
    }

    pub fn issued_at(&self) -> u64 {
        self.issued_at
    }

    pub fn expires_at(&self) -> u64 {
        self.expires_at
    }

    /// Whether the timing invariant holds. Decoded sessions must pass this.
    pub(crate) fn is_well_formed(&self) -> bool {
        self.expires_at > self.issued_at && !self.identity.subject.is_empty()
    }
}

/// Temporal validity of a session relative to the current time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpirationStatus {
    /// Before expiry
    Valid,
    /// In `[expires_at, expires_at + grace)`: accepted and renewed
    Grace,
    /// At or past `expires_at + grace`
    Expired,
}

/// Classify `now` against an expiry and grace window (all in seconds).
pub fn classify_expiration(expires_at: u64, grace_secs: u64, now: u64) -> ExpirationStatus {
    if now < expires_at {
        ExpirationStatus::Valid
    } else if now < expires_at.saturating_add(grace_secs) {
        ExpirationStatus::Grace
    } else {
        ExpirationStatus::Expired
    }
}

/// A freshly signed token together with the session it encodes.
#[derive(Debug, Clone)]
pub struct EncodedSession {
    pub token: String,
    pub session: Session,
}

/// Why a token could not be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeFailure {
    /// Signature does not match the payload (tampered, or signed with another key).
    Integrity,
    /// Not token-shaped, unsupported algorithm, or missing/invalid claims.
    InvalidToken,
}

impl DecodeFailure {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecodeFailure::Integrity => "integrity-error",
            DecodeFailure::InvalidToken => "invalid-token",
        }
    }
}

impl fmt::Display for DecodeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a token cannot be produced.
#[derive(Debug, thiserror::Error)]
#[error("Failed to encode token: {0}")]
pub struct EncodeError(pub String);

/// Signing, verification, and freshness policy for session tokens.
///
/// The authorization middleware only depends on this trait.
pub trait SessionCodec: Send + Sync {
    /// Sign a new session for `identity` issued at `now`.
    fn encode_session(
        &self,
        secret: &Secret,
        identity: &Identity,
        now: u64,
    ) -> Result<EncodedSession, EncodeError>;

    /// Verify `token` against `secret` and return the session it carries.
    fn decode_session(&self, secret: &Secret, token: &str) -> Result<Session, DecodeFailure>;

    /// Classify `session` at `now`.
    fn check_expiration_status(&self, session: &Session, now: u64) -> ExpirationStatus;
}

#[cfg(test)]
mod tests {
    use super::*;

    const E: u64 = 3600;
    const G: u64 = 300;

    #[test]
    fn test_classification_boundaries() {
        assert_eq!(classify_expiration(E, G, E - 1), ExpirationStatus::Valid);
        assert_eq!(classify_expiration(E, G, E), ExpirationStatus::Grace);
        assert_eq!(classify_expiration(E, G, E + G - 1), ExpirationStatus::Grace);
        assert_eq!(classify_expiration(E, G, E + G), ExpirationStatus::Expired);
    }

    #[test]
    fn test_zero_grace_has_no_grace_window() {
        assert_eq!(classify_expiration(E, 0, E - 1), ExpirationStatus::Valid);
        assert_eq!(classify_expiration(E, 0, E), ExpirationStatus::Expired);
    }

    #[test]
    fn test_classification_does_not_overflow() {
        assert_eq!(
            classify_expiration(u64::MAX - 10, G, u64::MAX - 5),
            ExpirationStatus::Grace
        );
    }

    #[test]
    fn test_issue_sets_expiry_from_ttl() {
        let session = Session::issue(
            Identity::new("uuid-123", "alice", "alice@example.com"),
            1000,
            Duration::from_secs(3600),
        );
        assert_eq!(session.issued_at(), 1000);
        assert_eq!(session.expires_at(), 4600);
        assert!(session.is_well_formed());
    }

    #[test]
    fn test_zero_ttl_still_expires_after_issue() {
        let session = Session::issue(Identity::new("a", "b", "c"), 50, Duration::ZERO);
        assert!(session.expires_at() > session.issued_at());
    }

    #[test]
    fn test_issue_near_end_of_time_keeps_expiry_after_issue() {
        let session = Session::issue(
            Identity::new("a", "b", "c"),
            u64::MAX,
            Duration::from_secs(10),
        );
        assert_eq!(session.expires_at(), u64::MAX);
        assert_eq!(session.issued_at(), u64::MAX - 10);
        assert!(session.is_well_formed());

        let session = Session::issue(
            Identity::new("a", "b", "c"),
            u64::MAX - 3,
            Duration::from_secs(10),
        );
        assert!(session.is_well_formed());
    }

    #[test]
    fn test_session_claim_names() {
        let session = Session::issue(
            Identity::new("uuid-123", "alice", "alice@example.com"),
            10,
            Duration::from_secs(5),
        );
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["sub"], "uuid-123");
        assert_eq!(json["username"], "alice");
        assert_eq!(json["email"], "alice@example.com");
        assert_eq!(json["iat"], 10);
        assert_eq!(json["exp"], 15);
    }

    #[test]
    fn test_decode_failure_names() {
        assert_eq!(DecodeFailure::Integrity.to_string(), "integrity-error");
        assert_eq!(DecodeFailure::InvalidToken.to_string(), "invalid-token");
    }
}
