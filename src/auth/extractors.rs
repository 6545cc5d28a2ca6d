//! Axum middleware and extractors for session authentication.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderValue, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{debug, error, info};

use super::errors::AuthError;
use super::state::SessionGuard;
use super::types::RequestContext;
use crate::api::ApiError;
use crate::session::Session;

/// Middleware protecting the routes it wraps.
///
/// On success the [`RequestContext`] is attached to the request and, after a
/// grace renewal, the new token is written to the configured response header.
/// On failure the request never reaches the handler.
///
/// ```ignore
/// Router::new()
///     .route("/me", get(me))
///     .layer(middleware::from_fn_with_state(guard, require_session));
/// ```
pub async fn require_session(
    State(guard): State<SessionGuard>,
    mut request: Request,
    next: Next,
) -> Response {
    let authorization = match guard.authorize(request.headers()) {
        Ok(authorization) => authorization,
        Err(e) => {
            log_rejection(&e);
            return ApiError::from(e).into_response();
        }
    };

    let renewed_header = match authorization.renewed_token.as_deref() {
        Some(token) => match HeaderValue::from_str(token) {
            Ok(value) => {
                info!(
                    subject = %authorization.session.subject(),
                    expires_at = authorization.session.expires_at(),
                    "Renewed session token"
                );
                Some(value)
            }
            Err(e) => {
                error!(error = %e, "Renewed token is not a valid header value");
                return ApiError::from(AuthError::Renewal).into_response();
            }
        },
        None => None,
    };

    request
        .extensions_mut()
        .insert(RequestContext::from(&authorization));

    let mut response = next.run(request).await;

    if let Some(value) = renewed_header {
        response
            .headers_mut()
            .insert(guard.config().renewed_token_header.clone(), value);
    }

    response
}

fn log_rejection(e: &AuthError) {
    match e {
        AuthError::MissingSecret => {
            error!("No signing secret configured; rejecting authenticated request")
        }
        AuthError::Renewal => error!(reason = e.reason(), "Session renewal failed"),
        _ => debug!(reason = e.reason(), "Rejected request"),
    }
}

// =============================================================================
// Extractors
// =============================================================================

/// Extractor for the session attached by [`require_session`].
///
/// Fails with 500 if the route is not behind the middleware.
pub struct Authenticated(pub Session);

impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let RequestContext { session, .. } = RequestContext::from_request_parts(parts, state).await?;
        Ok(Authenticated(session))
    }
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .ok_or_else(|| {
                error!("Session context requested on a route without session middleware");
                ApiError::internal("Session context unavailable")
            })
    }
}
