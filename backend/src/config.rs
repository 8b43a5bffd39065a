// src/config.rs

use std::env;
use dotenvy::dotenv;

/// Default token lifetime, matching the 7-day client cookie.
pub const DEFAULT_JWT_EXPIRATION: u64 = 7 * 24 * 60 * 60;

pub const DEFAULT_QUIZ_ID: &str = "default-quiz";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    /// Token lifetime in seconds.
    pub jwt_expiration: u64,
    pub rust_log: String,
    /// "development" or "production". Controls error detail in responses.
    pub environment: String,
    pub port: u16,
    /// Id of the singleton quiz every submission is scored against.
    pub quiz_id: String,
    pub cors_origins: Vec<String>,
    /// TrueType font for certificates. The bundled DejaVu Sans is used when unset.
    pub certificate_font: Option<String>,
    pub certificate_bold_font: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://lms.db?mode=rwc".to_string());

        let jwt_secret = env::var("JWT_SECRET")
            .expect("JWT_SECRET must be set");

        let jwt_expiration = env::var("JWT_EXPIRATION")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_JWT_EXPIRATION);

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        let environment = env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string());

        let port = env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5000);

        let quiz_id = env::var("QUIZ_ID")
            .unwrap_or_else(|_| DEFAULT_QUIZ_ID.to_string());

        let cors_origins = env::var("CORS_ORIGINS")
            .map(|v| parse_origins(&v))
            .unwrap_or_else(|_| vec!["http://localhost:3000".to_string()]);

        let certificate_font = env::var("CERTIFICATE_FONT").ok();
        let certificate_bold_font = env::var("CERTIFICATE_BOLD_FONT").ok();

        Self {
            database_url,
            jwt_secret,
            jwt_expiration,
            rust_log,
            environment,
            port,
            quiz_id,
            cors_origins,
            certificate_font,
            certificate_bold_font,
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
