mod config;
mod dashboard;

use axum::{middleware, response::Redirect, routing::get, Router};
use clap::Parser;
use gatehouse_auth::providers::plain::hash_password;
use gatehouse_auth::{auth_routes, require_auth, AuthService, AuthState};
use std::io::BufRead;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;

#[derive(Parser)]
#[command(name = "gatehouse-server")]
#[command(about = "Sign-in gate in front of protected routes")]
struct Cli {
    /// Read a password from stdin, print its bcrypt hash for the user list and exit
    #[arg(long)]
    hash_password: bool,
}

/// Hash the first line of `input`, without its line ending
fn hash_first_line(input: impl BufRead) -> Result<String, Box<dyn std::error::Error>> {
    let line = input.lines().next().transpose()?.unwrap_or_default();
    let password = line.trim_end_matches('\r');
    if password.is_empty() {
        return Err("no password given on stdin".into());
    }
    Ok(hash_password(password)?)
}

fn build_router(auth_service: Arc<AuthService>) -> Router {
    let auth_state = AuthState::new(auth_service);
    let after_sign_in = auth_state.config.routes.after_sign_in.clone();

    // Protected dashboard routes - require a signed-in session
    let protected_dashboard = Router::new()
        .route("/dashboard", get(dashboard::dashboard_page))
        .route_layer(middleware::from_fn_with_state(
            auth_state.clone(),
            require_auth,
        ));

    Router::new()
        .nest("/auth", auth_routes().with_state(auth_state))
        .route(
            "/",
            get(move || {
                let target = after_sign_in.clone();
                async move { Redirect::to(&target) }
            }),
        )
        .route("/health", get(health_check))
        .merge(protected_dashboard)
        .layer(TraceLayer::new_for_http())
}

async fn health_check() -> &'static str {
    "OK"
}

/// Periodically drop expired sessions
fn spawn_session_cleanup(auth_service: Arc<AuthService>, every: Duration) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            let removed = auth_service.cleanup_expired_sessions().await;
            if removed > 0 {
                tracing::debug!("Cleaned up {} expired sessions", removed);
            }
        }
    });
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    if cli.hash_password {
        println!("{}", hash_first_line(std::io::stdin().lock())?);
        return Ok(());
    }

    // Load configuration
    let config = config::Config::load_or_default();

    tracing_subscriber::fmt()
        .with_max_level(config.log_level())
        .init();

    tracing::info!("Starting Gatehouse Server");
    tracing::info!("Configuration loaded:");
    tracing::info!("  Host: {}, port: {}", config.server.host, config.server.http_port);
    tracing::info!("  Log level: {}", config.logging.level);

    let auth_service = match AuthService::new(config.auth.clone()) {
        Ok(service) => Arc::new(service),
        Err(e) => {
            tracing::error!("Failed to initialize authentication service: {}", e);
            return Err(e.into());
        }
    };

    if auth_service.is_enabled() {
        tracing::info!("Authentication enabled:");
        tracing::info!("  Plain login: {}", auth_service.has_enabled_providers());
        tracing::info!("  Protected routes: {:?}", config.auth.routes.protected);
    } else {
        tracing::warn!("Authentication disabled, protected routes are open");
    }

    spawn_session_cleanup(
        auth_service.clone(),
        Duration::from_secs(config.server.session_cleanup_interval.max(1)),
    );

    let ip_addr = config.server.host.parse::<std::net::IpAddr>().unwrap_or_else(|e| {
        tracing::warn!("Failed to parse host '{}': {}. Using 0.0.0.0", config.server.host, e);
        [0, 0, 0, 0].into()
    });
    let addr = SocketAddr::from((ip_addr, config.server.http_port));

    tracing::info!("HTTP server listening on {}", addr);
    axum_server::bind(addr)
        .serve(build_router(auth_service).into_make_service())
        .await?;

    Ok(())
}
