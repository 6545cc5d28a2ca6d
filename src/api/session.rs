//! Session API endpoints. All routes require a valid session token.
//!
//! - GET `/` - Return the current session
//! - GET `/verify` - 200 if the token is accepted, 401 otherwise

use axum::{Json, Router, http::StatusCode, middleware, response::IntoResponse, routing::get};
use serde::Serialize;

use crate::auth::{Authenticated, RequestContext, SessionGuard, require_session};

pub fn router(guard: SessionGuard) -> Router {
    Router::new()
        .route("/", get(current_session))
        .route("/verify", get(verify_session))
        .layer(middleware::from_fn_with_state(guard, require_session))
}

#[derive(Serialize)]
struct SessionResponse<'a> {
    subject: &'a str,
    username: &'a str,
    email: &'a str,
    issued_at: u64,
    expires_at: u64,
    renewed: bool,
}

async fn current_session(context: RequestContext) -> impl IntoResponse {
    let session = &context.session;
    Json(SessionResponse {
        subject: session.subject(),
        username: session.username(),
        email: session.email(),
        issued_at: session.issued_at(),
        expires_at: session.expires_at(),
        renewed: context.renewed,
    })
    .into_response()
}

/// Lightweight check that the token is still accepted.
async fn verify_session(Authenticated(_session): Authenticated) -> impl IntoResponse {
    StatusCode::OK
}
