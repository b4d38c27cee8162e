mod auth;
mod config;
mod db;
mod document;
mod errors;
mod export;
mod models;
mod render;
mod resumes;
mod routes;
mod state;
mod storage;

use anyhow::{Context, Result};
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use axum::http::HeaderValue;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::PgUserStore;
use crate::config::Config;
use crate::db::{create_pool, ensure_schema};
use crate::resumes::PgResumeStore;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::S3FileStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Lyncat API v{}", env!("CARGO_PKG_VERSION"));

    let db = create_pool(&config.database_url).await?;
    ensure_schema(&db).await?;

    let s3 = build_s3_client(&config).await;
    info!(bucket = %config.s3_bucket, "S3 client initialized");

    let state = AppState::new(
        config.clone(),
        Arc::new(PgResumeStore::new(db.clone())),
        Arc::new(PgUserStore::new(db)),
        Arc::new(S3FileStore::new(s3, config.s3_bucket.clone())),
    );

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config)?);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn cors_layer(config: &Config) -> Result<CorsLayer> {
    if config.allows_any_origin() {
        return Ok(CorsLayer::permissive());
    }
    let origins = config
        .cors_origins
        .iter()
        .map(|o| {
            HeaderValue::from_str(o).with_context(|| format!("Invalid CORS origin '{o}'"))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any))
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "lyncat-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    let s3_config = aws_sdk_s3::config::Builder::from(&s3_config)
        .force_path_style(true)
        .build();
    aws_sdk_s3::Client::from_conf(s3_config)
}
