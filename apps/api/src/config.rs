use anyhow::{Context, Result};

const DEFAULT_TOKEN_TTL_MINUTES: i64 = 60 * 24 * 7;
const DEFAULT_MAX_BODY_BYTES: usize = 20 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub jwt_secret: String,
    pub token_ttl_minutes: i64,
    /// `["*"]` means any origin.
    pub cors_origins: Vec<String>,
    /// Upper bound for request bodies (export snapshots, uploads).
    pub max_body_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let require = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .with_context(|| format!("Required environment variable '{key}' is not set"))
        };

        Ok(Config {
            database_url: require("DATABASE_URL")?,
            s3_bucket: require("S3_BUCKET")?,
            s3_endpoint: require("S3_ENDPOINT")?,
            aws_access_key_id: require("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require("AWS_SECRET_ACCESS_KEY")?,
            jwt_secret: require("JWT_SECRET")?,
            token_ttl_minutes: lookup("TOKEN_TTL_MINUTES")
                .map(|v| v.parse::<i64>())
                .transpose()
                .context("TOKEN_TTL_MINUTES must be an integer")?
                .unwrap_or(DEFAULT_TOKEN_TTL_MINUTES),
            cors_origins: lookup("CORS_ORIGINS")
                .unwrap_or_else(|| "*".to_string())
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect(),
            max_body_bytes: lookup("MAX_BODY_BYTES")
                .map(|v| v.parse::<usize>())
                .transpose()
                .context("MAX_BODY_BYTES must be a byte count")?
                .unwrap_or(DEFAULT_MAX_BODY_BYTES),
            port: lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }

    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.is_empty() || self.cors_origins.iter().any(|o| o == "*")
    }
}

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config {
        database_url: "postgres://localhost/lyncat_test".to_string(),
        s3_bucket: "lyncat-test".to_string(),
        s3_endpoint: "http://localhost:9000".to_string(),
        aws_access_key_id: "test".to_string(),
        aws_secret_access_key: "test".to_string(),
        jwt_secret: "test-secret".to_string(),
        token_ttl_minutes: 60,
        cors_origins: vec!["*".to_string()],
        max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        port: 0,
        rust_log: "debug".to_string(),
    }
}
