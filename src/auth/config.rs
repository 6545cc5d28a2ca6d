//! Authentication configuration, loaded once at startup.

use axum::http::HeaderName;
use std::time::Duration;

use crate::jwt::{DEFAULT_GRACE_PERIOD, DEFAULT_TOKEN_TTL};
use crate::secret::Secret;

/// Request header carrying the session token.
pub const DEFAULT_TOKEN_HEADER: &str = "authorization";

/// Response header carrying a renewed session token.
pub const DEFAULT_RENEWED_TOKEN_HEADER: &str = "x-renewed-token";

/// Configuration errors detected at startup.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Token TTL must be at least one second")]
    ZeroTtl,
    #[error("Invalid header name: {0}")]
    InvalidHeaderName(String),
    #[error("Token header and renewed token header must differ (both are {0})")]
    SameHeaders(String),
}

/// Read-only settings consumed by the session middleware.
#[derive(Debug)]
pub struct AuthConfig {
    /// Signing key. `None` makes every protected request fail with 500.
    pub secret: Option<Secret>,
    /// Lifetime of an issued session
    pub token_ttl: Duration,
    /// How long after expiry a session is still accepted and renewed
    pub grace_period: Duration,
    /// Request header the token is read from
    pub token_header: HeaderName,
    /// Response header a renewed token is written to
    pub renewed_token_header: HeaderName,
}

impl AuthConfig {
    /// Configuration with the default lifetimes and header names.
    pub fn new(secret: Option<Secret>) -> Self {
        Self {
            secret,
            token_ttl: DEFAULT_TOKEN_TTL,
            grace_period: DEFAULT_GRACE_PERIOD,
            token_header: HeaderName::from_static(DEFAULT_TOKEN_HEADER),
            renewed_token_header: HeaderName::from_static(DEFAULT_RENEWED_TOKEN_HEADER),
        }
    }

    pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }

    pub fn with_grace_period(mut self, grace: Duration) -> Self {
        self.grace_period = grace;
        self
    }

    pub fn with_token_header(mut self, name: &str) -> Result<Self, ConfigError> {
        self.token_header = parse_header_name(name)?;
        Ok(self)
    }

    pub fn with_renewed_token_header(mut self, name: &str) -> Result<Self, ConfigError> {
        self.renewed_token_header = parse_header_name(name)?;
        Ok(self)
    }

    /// Check the invariants the middleware relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.token_ttl.as_secs() == 0 {
            return Err(ConfigError::ZeroTtl);
        }
        if self.token_header == self.renewed_token_header {
            return Err(ConfigError::SameHeaders(self.token_header.to_string()));
        }
        Ok(())
    }
}

fn parse_header_name(name: &str) -> Result<HeaderName, ConfigError> {
    HeaderName::from_bytes(name.trim().as_bytes())
        .map_err(|_| ConfigError::InvalidHeaderName(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AuthConfig::new(Secret::new("s1"));
        assert_eq!(config.token_ttl, Duration::from_secs(3600));
        assert_eq!(config.grace_period, Duration::from_secs(300));
        assert_eq!(config.token_header, "authorization");
        assert_eq!(config.renewed_token_header, "x-renewed-token");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_header_names_are_case_insensitive() {
        let config = AuthConfig::new(None)
            .with_token_header("X-Session-Token")
            .unwrap();
        assert_eq!(config.token_header, "x-session-token");
    }

    #[test]
    fn test_invalid_header_name() {
        let result = AuthConfig::new(None).with_token_header("bad header");
        assert_eq!(
            result.unwrap_err(),
            ConfigError::InvalidHeaderName("bad header".to_string())
        );
    }

    #[test]
    fn test_same_headers_rejected() {
        let config = AuthConfig::new(None)
            .with_renewed_token_header("Authorization")
            .unwrap();
        assert_eq!(
            config.validate(),
            Err(ConfigError::SameHeaders("authorization".to_string()))
        );
    }

    #[test]
    fn test_zero_ttl_rejected() {
        let config = AuthConfig::new(None).with_token_ttl(Duration::from_millis(500));
        assert_eq!(config.validate(), Err(ConfigError::ZeroTtl));
    }

    #[test]
    fn test_missing_secret_is_valid_config() {
        // Reported per request, not here.
        assert!(AuthConfig::new(None).validate().is_ok());
    }
}
