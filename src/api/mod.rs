mod error;
mod session;

use axum::Router;

use crate::auth::SessionGuard;

pub use error::{ApiError, not_found};

/// Create the API router.
pub fn create_api_router(guard: SessionGuard) -> Router {
    Router::new().nest("/session", session::router(guard))
}
