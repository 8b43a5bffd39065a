// src/handlers/certificate.rs

use std::sync::Arc;

use axum::{
    Extension,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use sqlx::SqlitePool;

use crate::{
    certificate::{CertificateData, CertificateRenderer, content_disposition},
    error::AppError,
    extractors::AppJson,
    models::{
        quiz::FALLBACK_QUIZ_TITLE,
        result::{GenerateCertificateRequest, QuizResult},
    },
    utils::jwt::Claims,
};

/// Renders the PDF certificate for one of the caller's passed results.
///
/// A missing result and a result owned by someone else are both 404.
/// Each successful render sets `certificate_generated`; regeneration is allowed.
pub async fn generate_certificate(
    State(pool): State<SqlitePool>,
    State(renderer): State<Arc<dyn CertificateRenderer>>,
    Extension(claims): Extension<Claims>,
    AppJson(req): AppJson<GenerateCertificateRequest>,
) -> Result<Response, AppError> {
    let user_id = claims.user_id()?;

    let result = sqlx::query_as::<_, QuizResult>(
        r#"
        SELECT id, user_id, quiz_id, score, total_questions, answers,
               passed, certificate_generated, created_at, updated_at
        FROM results
        WHERE id = ?
        "#,
    )
    .bind(req.result_id)
    .fetch_optional(&pool)
    .await?
    .filter(|r| r.user_id == user_id)
    .ok_or(AppError::NotFound("Result not found".to_string()))?;

    if !result.passed {
        return Err(AppError::BadRequest(
            "Certificate can only be generated for passed quizzes".to_string(),
        ));
    }

    let name: String = sqlx::query_scalar("SELECT name FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(&pool)
        .await?
        .ok_or(AppError::NotFound("User not found".to_string()))?;

    let quiz_title: String = sqlx::query_scalar("SELECT title FROM quizzes WHERE id = ?")
        .bind(&result.quiz_id)
        .fetch_optional(&pool)
        .await?
        .unwrap_or_else(|| FALLBACK_QUIZ_TITLE.to_string());

    let data = CertificateData {
        name,
        quiz_title,
        score: result.score,
        issued_on: Utc::now().date_naive(),
    };

    let pdf = renderer.render(&data).await?;

    sqlx::query("UPDATE results SET certificate_generated = TRUE, updated_at = ? WHERE id = ?")
        .bind(Utc::now())
        .bind(result.id)
        .execute(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to flag certificate on result {}: {:?}", result.id, e);
            AppError::InternalServerError(e.to_string())
        })?;

    tracing::info!(user_id, result_id = result.id, "Certificate generated");

    let disposition = content_disposition(&data.name);
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        pdf,
    )
        .into_response())
}
