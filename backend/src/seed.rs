// src/seed.rs

use chrono::Utc;
use sqlx::{SqlitePool, types::Json};

use crate::models::quiz::DEFAULT_PASSING_SCORE;

const QUIZ_TITLE: &str = "LMS Micro-Certification Quiz";
const QUIZ_DESCRIPTION: &str = "Test your knowledge with this comprehensive quiz";
const QUIZ_TIME_LIMIT_MINUTES: i64 = 30;

/// (question, options, correct answer)
const SAMPLE_QUESTIONS: [(&str, [&str; 4], &str); 5] = [
    (
        "What does LMS stand for?",
        [
            "Learning Management System",
            "Library Management System",
            "Logistics Management System",
            "Legal Management System",
        ],
        "Learning Management System",
    ),
    (
        "Which of the following is NOT a feature of modern LMS?",
        [
            "Quiz Creation",
            "Video Streaming",
            "Social Media Integration",
            "Gaming Console Support",
        ],
        "Gaming Console Support",
    ),
    (
        "What is the primary purpose of micro-certifications?",
        [
            "To replace degrees",
            "To provide quick skill validation",
            "To reduce learning time",
            "To eliminate assessments",
        ],
        "To provide quick skill validation",
    ),
    (
        "Which database is commonly used with Node.js applications?",
        ["MySQL", "PostgreSQL", "MongoDB", "SQLite"],
        "MongoDB",
    ),
    (
        "What does API stand for?",
        [
            "Application Programming Interface",
            "Automated Program Integration",
            "Advanced Programming Instruction",
            "Application Process Integration",
        ],
        "Application Programming Interface",
    ),
];

/// Creates the quiz and its sample questions when they are missing.
/// Safe to run on every startup.
pub async fn seed_sample_quiz(pool: &SqlitePool, quiz_id: &str) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    let quiz_exists: Option<String> = sqlx::query_scalar("SELECT id FROM quizzes WHERE id = ?")
        .bind(quiz_id)
        .fetch_optional(&mut *tx)
        .await?;

    if quiz_exists.is_none() {
        sqlx::query(
            r#"
            INSERT INTO quizzes (id, title, description, passing_score, time_limit, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(quiz_id)
        .bind(QUIZ_TITLE)
        .bind(QUIZ_DESCRIPTION)
        .bind(DEFAULT_PASSING_SCORE)
        .bind(QUIZ_TIME_LIMIT_MINUTES)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;
        tracing::info!("Sample quiz '{}' created", quiz_id);
    }

    let question_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM questions WHERE quiz_id = ?")
            .bind(quiz_id)
            .fetch_one(&mut *tx)
            .await?;

    if question_count == 0 {
        for (text, options, answer) in SAMPLE_QUESTIONS {
            sqlx::query(
                r#"
                INSERT INTO questions (quiz_id, question_text, options, correct_answer, created_at)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(quiz_id)
            .bind(text)
            .bind(Json(options.to_vec()))
            .bind(answer)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;
        }
        tracing::info!("{} sample questions created", SAMPLE_QUESTIONS.len());
    }

    tx.commit().await
}
