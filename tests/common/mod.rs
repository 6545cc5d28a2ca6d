#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode},
};
use graceguard::{
    ServerConfig,
    auth::{AuthConfig, ManualClock, SessionGuard},
    create_app,
    secret::Secret,
    session::Identity,
};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

pub const SECRET: &str = "s1";
pub const TTL_SECS: u64 = 3600;
pub const GRACE_SECS: u64 = 300;
pub const RENEWED_HEADER: &str = "x-renewed-token";

/// An app wired to a manual clock so tests can move time.
pub struct TestApp {
    pub app: Router,
    pub guard: SessionGuard,
    pub clock: Arc<ManualClock>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(auth_config(Some(SECRET)), None)
    }

    pub fn with_config(auth: AuthConfig, base: Option<&str>) -> Self {
        let clock = Arc::new(ManualClock::new(0));
        let guard = SessionGuard::new(auth).with_clock(clock.clone());
        let config = ServerConfig {
            base: base.map(str::to_string),
            guard: guard.clone(),
        };
        Self {
            app: create_app(&config),
            guard,
            clock,
        }
    }

    /// Issue a token for alice at the current clock time.
    pub fn login(&self) -> String {
        self.guard.issue(&alice()).unwrap().token
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", token);
        }
        self.app
            .clone()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }
}

pub fn auth_config(secret: Option<&str>) -> AuthConfig {
    AuthConfig::new(secret.and_then(Secret::new))
        .with_token_ttl(Duration::from_secs(TTL_SECS))
        .with_grace_period(Duration::from_secs(GRACE_SECS))
}

pub fn alice() -> Identity {
    Identity::new("uuid-123", "alice", "alice@example.com")
}

pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

pub fn renewed_token(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(RENEWED_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

pub fn assert_status(response: &Response<Body>, status: StatusCode) {
    assert_eq!(response.status(), status, "unexpected status");
}
