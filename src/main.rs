// src/main.rs
use axum::{extract::DefaultBodyLimit, extract::Extension, middleware, Router};
use dotenv::dotenv;
use reqwest::Client;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::env;
use std::path::PathBuf;
use std::{net::SocketAddr, str::FromStr, sync::Arc};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

// ============================================================================
// MODULE IMPORTS
// ============================================================================

mod auth;
mod common;
mod convert;
mod logging_middleware;
mod pages;
mod quiz;
mod search;
mod services;
mod summary;

// ============================================================================
// COMMON IMPORTS
// ============================================================================

use common::AppState;
use services::{MailService, SearchService};

/// Default cap on uploaded file size (20 MiB)
const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

// ============================================================================
// MAIN APPLICATION ENTRY POINT
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // ========================================================================
    // ENVIRONMENT CONFIGURATION
    // ========================================================================

    let database_url =
        env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://qerrastar.db".to_string());
    let uploads_dir = env::var("UPLOADS_DIR").unwrap_or_else(|_| "./uploads".to_string());
    let converted_dir = env::var("CONVERTED_DIR").unwrap_or_else(|_| "./converted".to_string());
    let max_upload_bytes = env::var("MAX_UPLOAD_BYTES")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES);

    let google_api_key = env::var("GOOGLE_API_KEY").ok();
    let search_engine_id = env::var("SEARCH_ENGINE_ID").ok();

    let aws_access_key_id = env::var("AWS_ACCESS_KEY_ID").ok();
    let aws_secret_access_key = env::var("AWS_SECRET_ACCESS_KEY").ok();
    let aws_ses_region = env::var("AWS_SES_REGION").unwrap_or_else(|_| "us-east-1".to_string());
    let aws_ses_from_email = env::var("AWS_SES_FROM_EMAIL").ok();

    // ========================================================================
    // DIRECTORY SETUP
    // ========================================================================

    tokio::fs::create_dir_all(&uploads_dir).await?;
    tokio::fs::create_dir_all(&converted_dir).await?;

    // ========================================================================
    // DATABASE SETUP
    // ========================================================================

    if let Some(path_part) = database_url.strip_prefix("sqlite://") {
        let path_without_params = path_part.split('?').next().unwrap_or("");
        if !path_without_params.is_empty() && !path_without_params.starts_with(':') {
            let db_path = PathBuf::from(path_without_params);
            if let Some(parent) = db_path.parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent).await?;
                }
            }
        }
    }

    let connect_options = SqliteConnectOptions::from_str(&database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .connect_with(connect_options)
        .await?;

    // Run database migrations
    common::migrations::run_migrations(&pool).await?;

    // ========================================================================
    // SERVICE INITIALIZATION
    // ========================================================================

    let http_client = Client::builder().no_proxy().build()?;

    let search_service = Arc::new(SearchService::new(
        http_client,
        google_api_key,
        search_engine_id,
    ));
    info!("SearchService initialized");

    let mail_service = Arc::new(MailService::new(
        aws_access_key_id,
        aws_secret_access_key,
        aws_ses_region,
        aws_ses_from_email,
    ));
    info!("MailService initialized");

    // ========================================================================
    // APPLICATION STATE
    // ========================================================================

    let app_state = AppState {
        db: pool,
        uploads_dir: PathBuf::from(uploads_dir),
        converted_dir: PathBuf::from(converted_dir),
        max_upload_bytes,
        search_service,
        mail_service,
    };

    let shared = Arc::new(RwLock::new(app_state));

    // ========================================================================
    // ROUTER COMPOSITION
    // ========================================================================

    let app = Router::new()
        // ====================================================================
        // AUTHENTICATION ROUTES
        // ====================================================================
        .merge(auth::auth_routes())
        // ====================================================================
        // SEARCH ROUTES
        // ====================================================================
        .merge(search::search_routes())
        // ====================================================================
        // QUIZ ROUTES
        // ====================================================================
        .merge(quiz::quiz_routes())
        // ====================================================================
        // SUMMARY ROUTES
        // ====================================================================
        .merge(summary::summary_routes())
        // ====================================================================
        // CONVERSION ROUTES
        // ====================================================================
        .merge(convert::convert_routes())
        // ====================================================================
        // HTML PAGES
        // ====================================================================
        .merge(pages::page_routes())
        // ====================================================================
        // MIDDLEWARE AND LAYERS
        // ====================================================================
        // Add request/response body logging in debug mode
        .layer(middleware::from_fn(logging_middleware::log_request_response))
        .layer(Extension(shared.clone()))
        // Leave headroom over the file cap for multipart framing
        .layer(DefaultBodyLimit::max(max_upload_bytes + 64 * 1024))
        .layer({
            // Get CORS origins from environment variable
            let cors_origins = std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:3000,http://localhost:5173".to_string());

            let origins: Vec<axum::http::HeaderValue> = cors_origins
                .split(',')
                .filter_map(|origin| origin.trim().parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods([
                    axum::http::Method::GET,
                    axum::http::Method::POST,
                    axum::http::Method::PUT,
                    axum::http::Method::DELETE,
                    axum::http::Method::OPTIONS,
                ])
                .allow_headers([axum::http::header::CONTENT_TYPE])
                .allow_credentials(true)
        })
        .layer(TraceLayer::new_for_http());

    // ========================================================================
    // SERVER STARTUP
    // ========================================================================

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
