//! PharmStock - Pharmacy & medicine catalog backend. Main entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod app;
mod infrastructure;
mod use_cases;

use app::{App, AppConfig};
use infrastructure::importers::import_catalog_csv;
use infrastructure::mailer::{LogMailer, RestMailer};
use infrastructure::openfda::OpenFdaClient;
use infrastructure::password::Argon2PasswordHasher;
use infrastructure::ports::{MailerPort, PasswordHasherPort, UserRepo};
use infrastructure::session::DEFAULT_SESSION_TTL_HOURS;
use infrastructure::sqlite::{connect, ensure_schema, SqliteRepositories};
use pharmstock_domain::User;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pharmstock_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting PharmStock server");

    // Load configuration
    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://pharmstock.db".into());
    let server_host = std::env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let server_port: u16 = std::env::var("SERVER_PORT")
        .or_else(|_| std::env::var("PORT"))
        .unwrap_or_else(|_| "8080".into())
        .parse()
        .unwrap_or(8080);

    let admin_email =
        std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@pharmstock.local".into());
    let admin_password = std::env::var("ADMIN_PASSWORD").ok();
    let admin_security_key = std::env::var("ADMIN_SECURITY_KEY").unwrap_or_default();
    if admin_security_key.is_empty() {
        tracing::warn!("ADMIN_SECURITY_KEY is not set, admin login is disabled");
    }

    let setup_base_url = std::env::var("SETUP_LINK_BASE_URL")
        .unwrap_or_else(|_| "http://localhost:5173/setup-password".into());
    let reset_base_url = std::env::var("RESET_LINK_BASE_URL")
        .unwrap_or_else(|_| "http://localhost:5173/reset-password".into());
    let session_ttl_hours: i64 = std::env::var("SESSION_TTL_HOURS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_SESSION_TTL_HOURS);

    // Open the database and make sure the schema exists
    tracing::info!("Opening database at {}", database_url);
    let pool = connect(&database_url).await?;
    ensure_schema(&pool).await?;
    let repos = SqliteRepositories::new(pool);

    let hasher: Arc<dyn PasswordHasherPort> = Arc::new(Argon2PasswordHasher::new());

    // Bootstrap the admin account on first run
    ensure_admin_account(&repos.user, &hasher, &admin_email, admin_password.as_deref()).await?;

    // One-time catalog bootstrap from CSV
    if let Ok(csv_path) = std::env::var("MEDICINE_CSV_PATH") {
        match tokio::fs::read_to_string(&csv_path).await {
            Ok(csv) => {
                let summary = import_catalog_csv(&repos.medicine, &csv).await?;
                if !summary.skipped {
                    tracing::info!(
                        imported = summary.imported,
                        skipped_duplicates = summary.skipped_duplicates,
                        "Catalog CSV import finished"
                    );
                }
            }
            Err(e) => tracing::warn!(path = %csv_path, error = %e, "Cannot read catalog CSV"),
        }
    }

    // Outbound mail: REST relay when configured, log-only otherwise
    let mailer: Arc<dyn MailerPort> = match std::env::var("MAIL_API_URL") {
        Ok(endpoint) if !endpoint.trim().is_empty() => {
            let api_key = std::env::var("MAIL_API_KEY").unwrap_or_default();
            let from = std::env::var("MAIL_FROM")
                .unwrap_or_else(|_| "no-reply@pharmstock.local".into());
            tracing::info!("Mail relay configured");
            Arc::new(RestMailer::new(endpoint, api_key, from))
        }
        _ => {
            tracing::info!("MAIL_API_URL not set, mails will be logged only");
            Arc::new(LogMailer)
        }
    };

    let drug_label = Arc::new(OpenFdaClient::new());

    // Create application
    let app = Arc::new(App::new(
        repos,
        hasher,
        mailer,
        drug_label,
        AppConfig {
            admin_security_key,
            setup_base_url,
            reset_base_url,
            session_ttl_hours,
        },
    ));

    let mut router = api::routes()
        .with_state(app)
        .layer(TraceLayer::new_for_http());

    if let Some(cors) = build_cors_layer_from_env() {
        router = router.layer(cors);
    }

    // Start server
    let addr: SocketAddr = format!("{server_host}:{server_port}").parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

/// Create the ADMIN user on first run. An existing account is left alone so
/// a restart never resets the admin password.
async fn ensure_admin_account(
    user_repo: &Arc<dyn UserRepo>,
    hasher: &Arc<dyn PasswordHasherPort>,
    email: &str,
    password: Option<&str>,
) -> anyhow::Result<()> {
    if user_repo.get_by_username(email).await?.is_some() {
        return Ok(());
    }
    let Some(password) = password else {
        tracing::warn!("No admin account exists and ADMIN_PASSWORD is not set");
        return Ok(());
    };
    let hash = hasher.hash(password)?;
    user_repo.save(&User::admin(email, hash)).await?;
    tracing::info!(username = %email, "Created admin account");
    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}

fn build_cors_layer_from_env() -> Option<CorsLayer> {
    let allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let allowed_origins = allowed_origins?;

    let mut cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    if allowed_origins == "*" {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();

        if origins.is_empty() {
            return None;
        }

        // Session cookies need credentialed CORS, which in turn needs
        // explicit origins.
        cors = cors.allow_origin(origins).allow_credentials(true);
    }

    Some(cors)
}
