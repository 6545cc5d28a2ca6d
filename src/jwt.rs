//! JWT session token codec.
//!
//! Tokens are HS256 JWTs carrying `sub`, `username`, `email`, `iat` and `exp`.
//! Expiry is not enforced here: decoding only proves the token is ours and
//! well formed, and [`SessionCodec::check_expiration_status`] decides freshness.
//!
//! A token whose header is one of ours but whose body or signature does not
//! check out is reported as [`DecodeFailure::Integrity`]. Anything that never
//! looked like one of our tokens is [`DecodeFailure::InvalidToken`].

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use std::time::Duration;

use crate::secret::Secret;
use crate::session::{
    DecodeFailure, EncodeError, EncodedSession, ExpirationStatus, Identity, Session,
    SessionCodec, classify_expiration,
};

/// Default session lifetime: 1 hour
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(60 * 60);

/// Default grace window after expiry: 5 minutes
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(5 * 60);

/// HS256 JWT implementation of [`SessionCodec`].
#[derive(Debug, Clone)]
pub struct JwtSessionCodec {
    ttl: Duration,
    grace: Duration,
}

impl Default for JwtSessionCodec {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN_TTL, DEFAULT_GRACE_PERIOD)
    }
}

impl JwtSessionCodec {
    /// Create a codec issuing sessions that last `ttl`, renewable for `grace` after expiry.
    pub fn new(ttl: Duration, grace: Duration) -> Self {
        Self { ttl, grace }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn grace(&self) -> Duration {
        self.grace
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);
        validation
    }

    /// Check the token's shape before handing it to `jsonwebtoken`.
    ///
    /// The header segment must decode to an HS256 header, otherwise the token
    /// is invalid. Past that point any damage to the payload, the signature
    /// or the separators between them counts as tampering.
    fn check_structure(token: &str) -> Result<(), DecodeFailure> {
        let (header, body) = token.split_once('.').ok_or(DecodeFailure::InvalidToken)?;

        let header = URL_SAFE_NO_PAD
            .decode(header)
            .map_err(|_| DecodeFailure::InvalidToken)?;
        let header: Header =
            serde_json::from_slice(&header).map_err(|_| DecodeFailure::InvalidToken)?;
        if header.alg != Algorithm::HS256 {
            return Err(DecodeFailure::InvalidToken);
        }

        let (payload, signature) = body.split_once('.').ok_or(DecodeFailure::Integrity)?;
        if signature.contains('.')
            || URL_SAFE_NO_PAD.decode(payload).is_err()
            || URL_SAFE_NO_PAD.decode(signature).is_err()
        {
            return Err(DecodeFailure::Integrity);
        }

        Ok(())
    }
}

impl SessionCodec for JwtSessionCodec {
    fn encode_session(
        &self,
        secret: &Secret,
        identity: &Identity,
        now: u64,
    ) -> Result<EncodedSession, EncodeError> {
        let session = Session::issue(identity.clone(), now, self.ttl);

        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &session,
            &EncodingKey::from_secret(secret.expose()),
        )
        .map_err(|e| EncodeError(e.to_string()))?;

        Ok(EncodedSession { token, session })
    }

    fn decode_session(&self, secret: &Secret, token: &str) -> Result<Session, DecodeFailure> {
        Self::check_structure(token)?;

        // The signature is verified before the claims are parsed, so a claims
        // error here means a correctly signed but unusable token.
        let token_data = jsonwebtoken::decode::<Session>(
            token,
            &DecodingKey::from_secret(secret.expose()),
            &Self::validation(),
        )
        .map_err(|e| match e.kind() {
            ErrorKind::InvalidSignature | ErrorKind::Base64(_) => DecodeFailure::Integrity,
            _ => DecodeFailure::InvalidToken,
        })?;

        let session = token_data.claims;
        if !session.is_well_formed() {
            return Err(DecodeFailure::InvalidToken);
        }

        Ok(session)
    }

    fn check_expiration_status(&self, session: &Session, now: u64) -> ExpirationStatus {
        classify_expiration(session.expires_at(), self.grace.as_secs(), now)
    }
}
