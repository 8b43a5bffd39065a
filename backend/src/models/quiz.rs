// src/models/quiz.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const DEFAULT_PASSING_SCORE: i64 = 70;

/// Used on certificates when the quiz row is gone.
pub const FALLBACK_QUIZ_TITLE: &str = "LMS Certification Quiz";

/// Represents the 'quizzes' table. The application serves a single quiz.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: String,
    pub title: String,
    pub description: Option<String>,

    /// Percentage an attempt needs to pass.
    pub passing_score: i64,

    /// Minutes allowed for one attempt.
    pub time_limit: i64,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}
