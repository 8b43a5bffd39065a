// tests/common/mod.rs

#![allow(dead_code)]

use std::{str::FromStr, sync::Arc};

use lms_certify::{
    certificate::{CertificateRenderer, PdfCertificateRenderer},
    config::Config,
    routes,
    seed::seed_sample_quiz,
    state::AppState,
};
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

pub const QUIZ_ID: &str = "default-quiz";

/// Correct answers to the seeded questions, in order.
pub const PERFECT_ANSWERS: [&str; 5] = [
    "Learning Management System",
    "Gaming Console Support",
    "To provide quick skill validation",
    "MongoDB",
    "Application Programming Interface",
];

pub struct TestApp {
    pub address: String,
    pub pool: SqlitePool,
}

pub fn test_config(environment: &str) -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: "test_secret_for_integration_tests".to_string(),
        jwt_expiration: 600, // 10 minutes for tests
        rust_log: "error".to_string(),
        environment: environment.to_string(),
        port: 0,
        quiz_id: QUIZ_ID.to_string(),
        cors_origins: vec!["http://localhost:3000".to_string()],
        certificate_font: None,
        certificate_bold_font: None,
    }
}

/// A migrated in-memory database. One connection, kept alive for the pool's lifetime.
pub async fn test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("valid sqlite url")
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .expect("Failed to open in-memory SQLite");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    pool
}

pub async fn test_state(
    environment: &str,
    renderer: Arc<dyn CertificateRenderer>,
    seed: bool,
) -> AppState {
    let pool = test_pool().await;
    if seed {
        seed_sample_quiz(&pool, QUIZ_ID)
            .await
            .expect("Failed to seed sample quiz");
    }

    AppState {
        pool,
        config: test_config(environment),
        renderer,
    }
}

/// The real PDF renderer with the bundled fonts.
pub fn pdf_renderer() -> Arc<dyn CertificateRenderer> {
    Arc::new(PdfCertificateRenderer::new().expect("Bundled fonts should load"))
}

/// Spawns the app on a random port with the sample quiz seeded.
pub async fn spawn_app() -> TestApp {
    spawn_app_with(pdf_renderer(), true).await
}

pub async fn spawn_app_with(renderer: Arc<dyn CertificateRenderer>, seed: bool) -> TestApp {
    let state = test_state("development", renderer, seed).await;
    let pool = state.pool.clone();
    let app = routes::create_router(state);

    // Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp { address, pool }
}

pub fn unique_email() -> String {
    format!("u_{}@example.com", &uuid::Uuid::new_v4().to_string()[..8])
}

/// Registers a fresh user and returns (token, user id).
pub async fn register_user(client: &reqwest::Client, address: &str, name: &str) -> (String, i64) {
    let body: serde_json::Value = client
        .post(format!("{}/api/auth/register", address))
        .json(&serde_json::json!({
            "name": name,
            "email": unique_email(),
            "password": "password123"
        }))
        .send()
        .await
        .expect("Register failed")
        .json()
        .await
        .expect("Failed to parse register json");

    let token = body["token"].as_str().expect("Token not found").to_string();
    let id = body["user"]["id"].as_i64().expect("User id not found");
    (token, id)
}

pub async fn submit(
    client: &reqwest::Client,
    address: &str,
    token: &str,
    answers: serde_json::Value,
) -> reqwest::Response {
    client
        .post(format!("{}/api/quiz/submit", address))
        .bearer_auth(token)
        .json(&serde_json::json!({ "answers": answers }))
        .send()
        .await
        .expect("Submit failed")
}
