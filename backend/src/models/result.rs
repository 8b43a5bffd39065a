// src/models/result.rs

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, types::Json};

/// Represents the 'results' table in the database.
/// One row per scored attempt; rows are never deleted.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    pub id: i64,
    pub user_id: i64,
    pub quiz_id: String,

    /// Percentage in 0..=100.
    pub score: i64,
    pub total_questions: i64,

    /// Submitted answers, index-aligned with question order.
    pub answers: Json<Vec<String>>,

    pub passed: bool,
    pub certificate_generated: bool,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// DTO for submitting a quiz attempt.
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitQuizRequest {
    /// Answers in question order. `null` counts as unanswered.
    pub answers: Vec<Option<String>>,
}

/// Outcome of a submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitQuizResponse {
    pub score: i64,
    pub total_questions: i64,
    pub correct_answers: i64,
    pub passed: bool,
    pub result_id: i64,
}

/// DTO for requesting a certificate.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateCertificateRequest {
    pub result_id: i64,
}
