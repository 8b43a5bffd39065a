// src/client/mod.rs

//! Typed client for the REST API.
//!
//! The client keeps no session. Authenticated calls take the caller's
//! `Credentials` explicitly.

pub mod countdown;

use std::fmt;

use percent_encoding::percent_decode_str;
use reqwest::{Method, RequestBuilder, Response, StatusCode, header};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::json;

use crate::models::{
    question::PublicQuestion,
    quiz::Quiz,
    result::{QuizResult, SubmitQuizResponse},
    user::{AuthResponse, CreateUserRequest, LoginRequest},
};

pub use countdown::QuizCountdown;

/// Bearer token for one signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    token: String,
}

impl Credentials {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

impl From<&AuthResponse> for Credentials {
    fn from(auth: &AuthResponse) -> Self {
        Self::new(auth.token.clone())
    }
}

#[derive(Debug)]
pub enum ClientError {
    /// Transport or decoding failure.
    Http(reqwest::Error),
    /// The server answered with a non-success status.
    Api { status: StatusCode, message: String },
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Http(e) => e.status(),
            ClientError::Api { status, .. } => Some(*status),
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Http(e) => write!(f, "request failed: {e}"),
            ClientError::Api { status, message } => write!(f, "{status}: {message}"),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Http(err)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: String,
    pub environment: String,
}

/// A rendered certificate as downloaded.
#[derive(Debug, Clone)]
pub struct CertificateDownload {
    /// Filename suggested by `Content-Disposition`.
    pub filename: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// `base_url` is the server origin, e.g. `http://127.0.0.1:5000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    fn request(&self, method: Method, path: &str, credentials: Option<&Credentials>) -> RequestBuilder {
        let builder = self.http.request(method, format!("{}{}", self.base_url, path));
        match credentials {
            Some(c) => builder.bearer_auth(c.token()),
            None => builder,
        }
    }

    /// Maps non-success statuses to `ClientError::Api` using the `message` body field.
    async fn check(response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|body| body.get("message").and_then(|m| m.as_str()).map(str::to_string))
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string());

        Err(ClientError::Api { status, message })
    }

    async fn json<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, ClientError> {
        let response = Self::check(builder.send().await?).await?;
        Ok(response.json::<T>().await?)
    }

    pub async fn register(&self, req: &CreateUserRequest) -> Result<AuthResponse, ClientError> {
        Self::json(self.request(Method::POST, "/api/auth/register", None).json(req)).await
    }

    pub async fn login(&self, req: &LoginRequest) -> Result<AuthResponse, ClientError> {
        Self::json(self.request(Method::POST, "/api/auth/login", None).json(req)).await
    }

    pub async fn quiz(&self) -> Result<Quiz, ClientError> {
        Self::json(self.request(Method::GET, "/api/quiz", None)).await
    }

    pub async fn questions(&self) -> Result<Vec<PublicQuestion>, ClientError> {
        Self::json(self.request(Method::GET, "/api/quiz/questions", None)).await
    }

    pub async fn submit(
        &self,
        credentials: &Credentials,
        answers: &[Option<String>],
    ) -> Result<SubmitQuizResponse, ClientError> {
        let body = json!({ "answers": answers });
        Self::json(
            self.request(Method::POST, "/api/quiz/submit", Some(credentials))
                .json(&body),
        )
        .await
    }

    pub async fn results(&self, credentials: &Credentials) -> Result<Vec<QuizResult>, ClientError> {
        Self::json(self.request(Method::GET, "/api/user/results", Some(credentials))).await
    }

    pub async fn generate_certificate(
        &self,
        credentials: &Credentials,
        result_id: i64,
    ) -> Result<CertificateDownload, ClientError> {
        let builder = self
            .request(Method::POST, "/api/certificate/generate", Some(credentials))
            .json(&json!({ "resultId": result_id }));
        let response = Self::check(builder.send().await?).await?;

        let filename = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(filename_from_disposition);
        let bytes = response.bytes().await?.to_vec();

        Ok(CertificateDownload { filename, bytes })
    }

    pub async fn health(&self) -> Result<HealthStatus, ClientError> {
        Self::json(self.request(Method::GET, "/api/health", None)).await
    }
}

/// Prefers the UTF-8 `filename*` parameter over the ASCII `filename`.
fn filename_from_disposition(value: &str) -> Option<String> {
    let params: Vec<&str> = value.split(';').map(str::trim).collect();

    let extended = params
        .iter()
        .find_map(|part| part.strip_prefix("filename*="))
        .and_then(|v| v.strip_prefix("UTF-8''"))
        .and_then(|v| percent_decode_str(v).decode_utf8().ok())
        .map(|name| name.into_owned());

    extended.or_else(|| {
        params
            .iter()
            .find_map(|part| part.strip_prefix("filename="))
            .map(|name| name.trim_matches('"').to_string())
    })
}
