//! CLI argument parsing, validation, and startup helpers.

use crate::ServerConfig;
use crate::auth::{
    AuthConfig, ConfigError, DEFAULT_RENEWED_TOKEN_HEADER, DEFAULT_TOKEN_HEADER, SessionGuard,
};
use crate::secret::Secret;
use crate::session::Identity;
use clap::Parser;
use std::time::Duration;
use tracing::{error, warn};

const MIN_JWT_SECRET_LENGTH: usize = 32;

#[derive(clap::ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
    Compact,
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "graceguard",
    about = "Stateless session tokens with grace-window renewal"
)]
pub struct Args {
    /// Base path prefix. The API is served at {base}/api
    #[arg(short, long, value_parser = validate_base_path)]
    pub base: Option<String>,

    /// Port to listen on
    #[arg(short, long, default_value = "7291")]
    pub port: u16,

    /// Path to file containing JWT secret. Prefer using JWT_SECRET env var instead
    #[arg(long)]
    pub jwt_secret_file: Option<String>,

    /// Start without a signing secret. Every protected request then fails with 500
    #[arg(long)]
    pub allow_missing_secret: bool,

    /// Session lifetime in seconds
    #[arg(long, env = "TOKEN_TTL_SECS", default_value = "3600")]
    pub token_ttl: u64,

    /// Seconds after expiry during which a token is still accepted and renewed
    #[arg(long, env = "TOKEN_GRACE_SECS", default_value = "300")]
    pub grace_period: u64,

    /// Request header carrying the session token
    #[arg(long, env = "TOKEN_HEADER", default_value = DEFAULT_TOKEN_HEADER)]
    pub token_header: String,

    /// Response header carrying a renewed session token
    #[arg(long, env = "RENEWED_TOKEN_HEADER", default_value = DEFAULT_RENEWED_TOKEN_HEADER)]
    pub renewed_token_header: String,

    /// Print a signed token for this subject and exit
    #[arg(long, value_name = "SUBJECT")]
    pub issue_token: Option<String>,

    /// Username claim for --issue-token
    #[arg(long, requires = "issue_token", default_value = "")]
    pub username: String,

    /// E-mail claim for --issue-token
    #[arg(long, requires = "issue_token", default_value = "")]
    pub email: String,

    /// Log output format
    #[arg(short, long, default_value = "pretty")]
    pub log_format: LogFormat,
}

fn validate_base_path(s: &str) -> Result<String, String> {
    if s.is_empty() {
        return Ok(String::new());
    }

    if !s.starts_with('/') {
        return Err(format!("Base path must start with '/': {}", s));
    }

    if s.len() > 1 && s.ends_with('/') {
        return Err(format!("Base path must not end with '/': {}", s));
    }

    if s.chars().any(|c| !c.is_ascii() || c.is_whitespace()) {
        return Err(format!("Base path contains invalid characters: {}", s));
    }

    Ok(s.to_string())
}

/// Initialize logging based on the specified format.
pub fn init_logging(format: &LogFormat) {
    match format {
        LogFormat::Pretty => tracing_subscriber::fmt::init(),
        LogFormat::Json => tracing_subscriber::fmt().json().init(),
        LogFormat::Compact => tracing_subscriber::fmt().compact().init(),
    }
}

/// Where the signing secret came from.
#[derive(Debug)]
pub enum SecretSource {
    Loaded(Secret),
    /// No secret configured and `--allow-missing-secret` given
    Absent,
}

/// Load JWT secret from environment variable or file.
/// Returns None and logs an error if the secret cannot be loaded.
pub fn load_jwt_secret(
    jwt_secret_file: Option<&str>,
    allow_missing: bool,
) -> Option<SecretSource> {
    let secret = if let Ok(secret) = std::env::var("JWT_SECRET") {
        // Clear the environment variable to prevent leaking
        // SAFETY: We're single-threaded at this point during startup,
        // and no other code is reading this environment variable.
        unsafe { std::env::remove_var("JWT_SECRET") };
        secret
    } else if let Some(path) = jwt_secret_file {
        match std::fs::read_to_string(path) {
            Ok(content) => content.trim().to_string(),
            Err(e) => {
                error!(path = %path, error = %e, "Failed to read JWT secret file");
                return None;
            }
        }
    } else {
        String::new()
    };

    check_secret(secret, allow_missing)
}

fn check_secret(secret: String, allow_missing: bool) -> Option<SecretSource> {
    let Some(secret) = Secret::new(secret) else {
        if allow_missing {
            error!(
                "No JWT secret configured. Protected requests will fail with 500 until one is provided"
            );
            return Some(SecretSource::Absent);
        }
        error!(
            "JWT secret is required. Set JWT_SECRET environment variable (recommended) or use --jwt-secret-file"
        );
        return None;
    };

    if secret.expose().len() < MIN_JWT_SECRET_LENGTH {
        error!(
            "JWT secret is shorter than {} characters. Use a longer secret",
            MIN_JWT_SECRET_LENGTH
        );
        return None;
    }

    Some(SecretSource::Loaded(secret))
}

/// Build a validated AuthConfig from arguments.
pub fn build_auth_config(args: &Args, secret: SecretSource) -> Result<AuthConfig, ConfigError> {
    let secret = match secret {
        SecretSource::Loaded(secret) => Some(secret),
        SecretSource::Absent => None,
    };

    let config = AuthConfig::new(secret)
        .with_token_ttl(Duration::from_secs(args.token_ttl))
        .with_grace_period(Duration::from_secs(args.grace_period))
        .with_token_header(&args.token_header)?
        .with_renewed_token_header(&args.renewed_token_header)?;

    config.validate()?;

    if args.grace_period > args.token_ttl {
        warn!(
            token_ttl = args.token_ttl,
            grace_period = args.grace_period,
            "Grace period is longer than the token lifetime"
        );
    }

    Ok(config)
}

/// Build ServerConfig from validated arguments.
pub fn build_config(base: Option<String>, auth: AuthConfig) -> ServerConfig {
    ServerConfig {
        base,
        guard: SessionGuard::new(auth),
    }
}

/// Handle the --issue-token flag: sign a session and print the token.
/// Returns false if no token could be issued.
pub fn handle_issue_token(guard: &SessionGuard, subject: &str, username: &str, email: &str) -> bool {
    let identity = Identity::new(subject, username, email);
    match guard.issue(&identity) {
        Ok(issued) => {
            println!("{}", issued.token);
            true
        }
        Err(e) => {
            error!(error = %e, "Failed to issue token");
            false
        }
    }
}
