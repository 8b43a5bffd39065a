// src/models/question.rs

use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};

/// Represents the 'questions' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: i64,

    /// Tag linking the question to its quiz.
    pub quiz_id: String,

    pub question_text: String,

    /// Choices in display order.
    /// Stored as a JSON array in the database.
    pub options: Json<Vec<String>>,

    /// The correct option, compared verbatim against submitted answers.
    pub correct_answer: String,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// DTO for sending question to client (excludes the correct answer).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicQuestion {
    pub id: i64,
    pub quiz_id: String,
    pub question_text: String,
    pub options: Vec<String>,
}

impl From<Question> for PublicQuestion {
    fn from(q: Question) -> Self {
        Self {
            id: q.id,
            quiz_id: q.quiz_id,
            question_text: q.question_text,
            options: q.options.0,
        }
    }
}
