//! Stateless session authentication.
//!
//! Every protected request carries a signed token in a configurable header.
//! The token is verified and classified as valid, in grace, or expired.
//! Tokens in the grace window are renewed in place: the request proceeds with
//! a fresh session and the new token is returned in a separate response header.

mod clock;
mod config;
mod errors;
mod extractors;
mod header;
mod state;
mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{AuthConfig, ConfigError, DEFAULT_RENEWED_TOKEN_HEADER, DEFAULT_TOKEN_HEADER};
pub use errors::AuthError;
pub use extractors::{Authenticated, require_session};
pub use header::{HeaderToken, get_token};
pub use state::SessionGuard;
pub use types::{Authorization, RequestContext};
