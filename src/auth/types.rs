//! Authentication outcome types.

use crate::session::{ExpirationStatus, Session};

/// Result of one successful decode/classify/renew cycle.
#[derive(Debug, Clone)]
pub struct Authorization {
    /// Session handed to downstream handlers (the renewed one after a grace hit)
    pub session: Session,
    /// Classification of the presented token
    pub status: ExpirationStatus,
    /// New token to send back to the client, set only on a grace hit
    pub renewed_token: Option<String>,
}

/// Request-scoped authentication context, stored in request extensions.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub session: Session,
    /// Whether the token was renewed on this request
    pub renewed: bool,
}

impl From<&Authorization> for RequestContext {
    fn from(authorization: &Authorization) -> Self {
        Self {
            session: authorization.session.clone(),
            renewed: authorization.renewed_token.is_some(),
        }
    }
}
