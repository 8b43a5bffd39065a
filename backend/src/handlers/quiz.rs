// src/handlers/quiz.rs

use axum::{Extension, Json, extract::State, response::IntoResponse};
use chrono::Utc;
use sqlx::{SqlitePool, types::Json as SqlJson};

use crate::{
    config::Config,
    error::AppError,
    extractors::AppJson,
    models::{
        question::{PublicQuestion, Question},
        quiz::{DEFAULT_PASSING_SCORE, Quiz},
        result::{SubmitQuizRequest, SubmitQuizResponse},
    },
    utils::jwt::Claims,
};

/// Percentage for `correct` out of `total`, rounded half up.
/// An empty question set scores 0.
fn percentage(correct: usize, total: usize) -> i64 {
    if total == 0 {
        return 0;
    }
    ((200 * correct + total) / (2 * total)) as i64
}

/// Aligns submitted answers with the question list.
/// Missing or null entries become "", extra entries are dropped.
fn align_answers(submitted: &[Option<String>], total: usize) -> Vec<String> {
    (0..total)
        .map(|i| submitted.get(i).cloned().flatten().unwrap_or_default())
        .collect()
}

/// Helper function to calculate score.
/// Compares answers position by position with exact string equality.
/// Returns (correct_count, score_percentage).
fn calculate_score(answers: &[String], answer_key: &[String]) -> (usize, i64) {
    let correct_count = answers
        .iter()
        .zip(answer_key)
        .filter(|(given, expected)| given == expected)
        .count();

    (correct_count, percentage(correct_count, answer_key.len()))
}

/// Questions of the active quiz in display order.
async fn fetch_questions(pool: &SqlitePool, quiz_id: &str) -> Result<Vec<Question>, AppError> {
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, quiz_id, question_text, options, correct_answer, created_at
        FROM questions
        WHERE quiz_id = ?
        ORDER BY id ASC
        "#,
    )
    .bind(quiz_id)
    .fetch_all(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to fetch questions: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })
}

/// Returns the active quiz.
pub async fn get_quiz(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = sqlx::query_as::<_, Quiz>(
        r#"
        SELECT id, title, description, passing_score, time_limit, created_at
        FROM quizzes
        WHERE id = ?
        "#,
    )
    .bind(&config.quiz_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("No quiz found".to_string()))?;

    Ok(Json(quiz))
}

/// Lists the quiz questions without their correct answers.
pub async fn list_questions(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
) -> Result<impl IntoResponse, AppError> {
    let questions: Vec<PublicQuestion> = fetch_questions(&pool, &config.quiz_id)
        .await?
        .into_iter()
        .map(PublicQuestion::from)
        .collect();

    Ok(Json(questions))
}

/// Submits a user's quiz answers and calculates the score.
///
/// * Answers are matched to questions by position.
/// * Every call stores a new result row; attempts are not limited.
/// * Refuses to score when the quiz has no questions.
pub async fn submit_quiz(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    Extension(claims): Extension<Claims>,
    AppJson(req): AppJson<SubmitQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    let questions = fetch_questions(&pool, &config.quiz_id).await?;
    if questions.is_empty() {
        return Err(AppError::Unavailable(
            "No questions available for this quiz".to_string(),
        ));
    }

    let passing_score: i64 =
        sqlx::query_scalar("SELECT passing_score FROM quizzes WHERE id = ?")
            .bind(&config.quiz_id)
            .fetch_optional(&pool)
            .await?
            .unwrap_or(DEFAULT_PASSING_SCORE);

    let answer_key: Vec<String> = questions.into_iter().map(|q| q.correct_answer).collect();
    let answers = align_answers(&req.answers, answer_key.len());
    let (correct_count, score) = calculate_score(&answers, &answer_key);
    let passed = score >= passing_score;
    let total_questions = answer_key.len() as i64;

    let now = Utc::now();
    let inserted = sqlx::query(
        r#"
        INSERT INTO results
            (user_id, quiz_id, score, total_questions, answers, passed, certificate_generated, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, FALSE, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(&config.quiz_id)
    .bind(score)
    .bind(total_questions)
    .bind(SqlJson(&answers))
    .bind(passed)
    .bind(now)
    .bind(now)
    .execute(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to save quiz result: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    let result_id = inserted.last_insert_rowid();
    tracing::info!(user_id, result_id, score, passed, "Quiz submitted");

    Ok(Json(SubmitQuizResponse {
        score,
        total_questions,
        correct_answers: correct_count as i64,
        passed,
        result_id,
    }))
}
