use clap::Parser;
use graceguard::cli::{
    Args, build_auth_config, build_config, handle_issue_token, init_logging, load_jwt_secret,
};
use graceguard::create_app;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let args = Args::parse();

    init_logging(&args.log_format);

    let Some(secret) = load_jwt_secret(args.jwt_secret_file.as_deref(), args.allow_missing_secret)
    else {
        std::process::exit(1);
    };

    let auth = match build_auth_config(&args, secret) {
        Ok(auth) => auth,
        Err(e) => {
            error!(error = %e, "Invalid authentication configuration");
            std::process::exit(1);
        }
    };

    let config = build_config(args.base.clone(), auth);

    if let Some(subject) = args.issue_token.as_deref() {
        let issued = handle_issue_token(&config.guard, subject, &args.username, &args.email);
        std::process::exit(if issued { 0 } else { 1 });
    }

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| {
            error!(address = %addr, error = %e, "Failed to bind");
            std::process::exit(1);
        });

    let local_addr = listener.local_addr().unwrap_or_else(|e| {
        error!(error = %e, "Failed to read local address");
        std::process::exit(1);
    });

    let app = create_app(&config);

    info!(
        address = %local_addr,
        token_ttl = args.token_ttl,
        grace_period = args.grace_period,
        "Listening"
    );

    if let Err(e) = axum::serve(listener, app.into_make_service()).await {
        error!(error = %e, "Server error");
        std::process::exit(1);
    }
}
