//! The session guard: configuration plus injected codec and clock.

use axum::http::HeaderMap;
use std::sync::Arc;
use tracing::error;

use super::clock::{Clock, SystemClock};
use super::config::AuthConfig;
use super::errors::AuthError;
use super::header::{HeaderToken, get_token};
use super::types::Authorization;
use crate::jwt::JwtSessionCodec;
use crate::session::{DecodeFailure, EncodedSession, ExpirationStatus, Identity, SessionCodec};

/// Everything the session middleware needs, shared read-only across requests.
///
/// Cloning is cheap. There is no global state: each router gets the guard
/// it was built with.
#[derive(Clone)]
pub struct SessionGuard {
    config: Arc<AuthConfig>,
    codec: Arc<dyn SessionCodec>,
    clock: Arc<dyn Clock>,
}

impl SessionGuard {
    /// Guard using the JWT codec and the system clock.
    pub fn new(config: AuthConfig) -> Self {
        let codec = JwtSessionCodec::new(config.token_ttl, config.grace_period);
        Self {
            config: Arc::new(config),
            codec: Arc::new(codec),
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the token codec.
    pub fn with_codec(mut self, codec: impl SessionCodec + 'static) -> Self {
        self.codec = Arc::new(codec);
        self
    }

    /// Replace the clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Issue a brand new session for `identity`, as a login would.
    pub fn issue(&self, identity: &Identity) -> Result<EncodedSession, AuthError> {
        let secret = self.config.secret.as_ref().ok_or(AuthError::MissingSecret)?;
        self.codec
            .encode_session(secret, identity, self.clock.now())
            .map_err(|e| {
                error!(error = %e, "Failed to issue session token");
                AuthError::Renewal
            })
    }

    /// Run one decode/classify/renew cycle against the request headers.
    ///
    /// Never touches a response: a renewed token is returned in the
    /// [`Authorization`] for the caller to send back.
    pub fn authorize(&self, headers: &HeaderMap) -> Result<Authorization, AuthError> {
        let secret = self.config.secret.as_ref().ok_or(AuthError::MissingSecret)?;

        let token = match get_token(headers, &self.config.token_header) {
            HeaderToken::Present(token) => token,
            HeaderToken::Missing => {
                return Err(AuthError::MissingToken {
                    header: self.config.token_header.to_string(),
                });
            }
            HeaderToken::Unreadable => return Err(DecodeFailure::InvalidToken.into()),
        };

        let session = self.codec.decode_session(secret, token)?;

        let now = self.clock.now();
        let status = self.codec.check_expiration_status(&session, now);
        match status {
            ExpirationStatus::Expired => Err(AuthError::Expired),
            ExpirationStatus::Valid => Ok(Authorization {
                session,
                status,
                renewed_token: None,
            }),
            ExpirationStatus::Grace => {
                let renewed = self
                    .codec
                    .encode_session(secret, session.identity(), now)
                    .map_err(|e| {
                        error!(error = %e, subject = %session.subject(), "Failed to renew session token");
                        AuthError::Renewal
                    })?;
                Ok(Authorization {
                    session: renewed.session,
                    status,
                    renewed_token: Some(renewed.token),
                })
            }
        }
    }
}
