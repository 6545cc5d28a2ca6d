//! Authentication error types.

use axum::http::StatusCode;

use crate::session::DecodeFailure;

/// Why a request was rejected by the session middleware.
///
/// Every variant is terminal for the request. The display string is the
/// message sent to the client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// The configured token header is absent.
    #[error("Required {header} not found.")]
    MissingToken { header: String },
    /// The token failed signature verification or is not a token at all.
    #[error("Failed to decode or validate authorization token. Reason: {0}.")]
    Decode(DecodeFailure),
    /// The token is past its grace window.
    #[error("Authorization token has expired. Please create a new authorization token.")]
    Expired,
    /// The server has no signing key.
    #[error("Missing Secret Key")]
    MissingSecret,
    /// A renewed token could not be produced.
    #[error("Failed to renew authorization token.")]
    Renewal,
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingToken { .. } | AuthError::Decode(_) | AuthError::Expired => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::MissingSecret | AuthError::Renewal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short machine-friendly name, used in logs.
    pub fn reason(&self) -> &'static str {
        match self {
            AuthError::MissingToken { .. } => "missing-token",
            AuthError::Decode(failure) => failure.as_str(),
            AuthError::Expired => "expired",
            AuthError::MissingSecret => "missing-secret",
            AuthError::Renewal => "renewal-failed",
        }
    }
}

impl From<DecodeFailure> for AuthError {
    fn from(failure: DecodeFailure) -> Self {
        AuthError::Decode(failure)
    }
}
