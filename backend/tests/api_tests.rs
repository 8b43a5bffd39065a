// tests/api_tests.rs

mod common;

use common::{
    PERFECT_ANSWERS, pdf_renderer, register_user, spawn_app, spawn_app_with, submit, unique_email,
};
use serde_json::{Value, json};

#[tokio::test]
async fn health_reports_environment() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let body: Value = client
        .get(format!("{}/api/health", app.address))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .unwrap();

    assert_eq!(body["status"], "OK");
    assert_eq!(body["environment"], "development");
    assert!(body["timestamp"].as_str().is_some());
}

#[tokio::test]
async fn unknown_path_is_404() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/random_path_that_does_not_exist", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn register_returns_token_user_and_cookie() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let email = unique_email();

    let response = client
        .post(format!("{}/api/auth/register", app.address))
        .json(&json!({
            "name": "Ada Lovelace",
            "email": email,
            "password": "password123"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 201);
    let cookie = response
        .headers()
        .get("set-cookie")
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("authToken="));

    let body: Value = response.json().await.unwrap();
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(body["user"]["name"], "Ada Lovelace");
    assert_eq!(body["user"]["email"], email);
    assert!(body["user"].get("password").is_none());
}

#[tokio::test]
async fn register_rejects_duplicate_email() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let payload = json!({
        "name": "Ada",
        "email": unique_email(),
        "password": "password123"
    });

    let first = client
        .post(format!("{}/api/auth/register", app.address))
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(first.status().as_u16(), 201);

    let second = client
        .post(format!("{}/api/auth/register", app.address))
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(second.status().as_u16(), 409);
}

#[tokio::test]
async fn register_fails_validation() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/auth/register", app.address))
        .json(&json!({
            "name": "Ada",
            "email": "not-an-email",
            "password": "password123"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);

    let body: Value = response.json().await.unwrap();
    assert!(body["message"].as_str().is_some());
}

#[tokio::test]
async fn register_refuses_names_the_certificate_cannot_print() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/auth/register", app.address))
        .json(&json!({
            "name": "张伟 Zhang",
            "email": unique_email(),
            "password": "password123"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert!(body["message"].as_str().is_some_and(|m| m.contains("certificate")));

    let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(users, 0);

    // Accented, Greek and Cyrillic names are fine.
    let response = client
        .post(format!("{}/api/auth/register", app.address))
        .json(&json!({
            "name": "Анна Σοφία Núñez",
            "email": unique_email(),
            "password": "password123"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 201);
}

#[tokio::test]
async fn malformed_bodies_are_json_bad_requests() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let (token, _) = register_user(&client, &app.address, "Ada").await;

    // Missing required field.
    let response = client
        .post(format!("{}/api/quiz/submit", app.address))
        .bearer_auth(&token)
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
    assert!(response.headers()["content-type"].to_str().unwrap().starts_with("application/json"));
    let body: Value = response.json().await.unwrap();
    assert!(body["message"].as_str().is_some_and(|m| m.contains("answers")));

    // Not JSON at all.
    let response = client
        .post(format!("{}/api/auth/register", app.address))
        .header("content-type", "application/json")
        .body("{\"name\": ")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert!(body["message"].as_str().is_some());

    // No JSON content type.
    let response = client
        .post(format!("{}/api/auth/login", app.address))
        .body("email=a@b.c&password=password123")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert!(body["message"].as_str().is_some());

    // Nothing was stored by the rejected submit.
    let stored: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM results")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(stored, 0);
}

#[tokio::test]
async fn login_checks_credentials() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let email = unique_email();

    client
        .post(format!("{}/api/auth/register", app.address))
        .json(&json!({"name": "Ada", "email": email, "password": "password123"}))
        .send()
        .await
        .unwrap();

    let ok = client
        .post(format!("{}/api/auth/login", app.address))
        .json(&json!({"email": email.to_uppercase(), "password": "password123"}))
        .send()
        .await
        .unwrap();
    assert_eq!(ok.status().as_u16(), 200);
    let body: Value = ok.json().await.unwrap();
    assert_eq!(body["user"]["email"], email);

    let wrong_password = client
        .post(format!("{}/api/auth/login", app.address))
        .json(&json!({"email": email, "password": "nope-nope"}))
        .send()
        .await
        .unwrap();
    assert_eq!(wrong_password.status().as_u16(), 401);

    let unknown = client
        .post(format!("{}/api/auth/login", app.address))
        .json(&json!({"email": unique_email(), "password": "password123"}))
        .send()
        .await
        .unwrap();
    assert_eq!(unknown.status().as_u16(), 401);
}

#[tokio::test]
async fn quiz_info_is_served_in_camel_case() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let quiz: Value = client
        .get(format!("{}/api/quiz", app.address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(quiz["id"], "default-quiz");
    assert_eq!(quiz["title"], "LMS Micro-Certification Quiz");
    assert_eq!(quiz["passingScore"], 70);
    assert_eq!(quiz["timeLimit"], 30);
}

#[tokio::test]
async fn quiz_info_is_404_without_a_quiz() {
    let app = spawn_app_with(pdf_renderer(), false).await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/api/quiz", app.address))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn questions_hide_correct_answers() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let questions: Vec<Value> = client
        .get(format!("{}/api/quiz/questions", app.address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(questions.len(), 5);
    assert_eq!(questions[0]["questionText"], "What does LMS stand for?");
    assert_eq!(questions[4]["questionText"], "What does API stand for?");
    for q in &questions {
        assert!(q.get("correctAnswer").is_none());
        assert_eq!(q["options"].as_array().unwrap().len(), 4);
    }
}

#[tokio::test]
async fn submit_requires_authentication() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let missing = client
        .post(format!("{}/api/quiz/submit", app.address))
        .json(&json!({ "answers": PERFECT_ANSWERS }))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status().as_u16(), 401);

    let forged = submit(&client, &app.address, "not.a.jwt", json!(PERFECT_ANSWERS)).await;
    assert_eq!(forged.status().as_u16(), 401);
}

#[tokio::test]
async fn auth_cookie_is_accepted_in_place_of_bearer() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let (token, _) = register_user(&client, &app.address, "Cookie User").await;

    let response = client
        .post(format!("{}/api/quiz/submit", app.address))
        .header("Cookie", format!("authToken={}", token))
        .json(&json!({ "answers": PERFECT_ANSWERS }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
async fn perfect_submission_scores_100_and_passes() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let (token, _) = register_user(&client, &app.address, "Ada").await;

    let body: Value = submit(&client, &app.address, &token, json!(PERFECT_ANSWERS))
        .await
        .json()
        .await
        .unwrap();

    assert_eq!(body["score"], 100);
    assert_eq!(body["totalQuestions"], 5);
    assert_eq!(body["correctAnswers"], 5);
    assert_eq!(body["passed"], true);
    assert!(body["resultId"].as_i64().is_some());
}

#[tokio::test]
async fn empty_submission_scores_zero_and_fails() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let (token, _) = register_user(&client, &app.address, "Ada").await;

    for answers in [json!([]), json!(["", "", "", "", ""]), json!([null, null])] {
        let body: Value = submit(&client, &app.address, &token, answers)
            .await
            .json()
            .await
            .unwrap();
        assert_eq!(body["score"], 0);
        assert_eq!(body["correctAnswers"], 0);
        assert_eq!(body["passed"], false);
    }
}

#[tokio::test]
async fn passing_threshold_is_seventy_percent() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let (token, _) = register_user(&client, &app.address, "Ada").await;

    // 3 of 5 correct -> 60%
    let mut three = PERFECT_ANSWERS.map(str::to_string).to_vec();
    three[3] = "MySQL".into();
    three[4] = "".into();
    let body: Value = submit(&client, &app.address, &token, json!(three))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["score"], 60);
    assert_eq!(body["passed"], false);

    // 4 of 5 correct -> 80%
    let mut four = PERFECT_ANSWERS.map(str::to_string).to_vec();
    four[0] = "Library Management System".into();
    let body: Value = submit(&client, &app.address, &token, json!(four))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["score"], 80);
    assert_eq!(body["passed"], true);
}

#[tokio::test]
async fn repeated_submissions_create_independent_results() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let (token, user_id) = register_user(&client, &app.address, "Ada").await;

    let first: Value = submit(&client, &app.address, &token, json!(PERFECT_ANSWERS))
        .await
        .json()
        .await
        .unwrap();
    let second: Value = submit(&client, &app.address, &token, json!([]))
        .await
        .json()
        .await
        .unwrap();

    assert_ne!(first["resultId"], second["resultId"]);
    assert_eq!(first["score"], 100);
    assert_eq!(second["score"], 0);

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM results WHERE user_id = ?")
        .bind(user_id)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(rows, 2);

    // Newest first
    let results: Vec<Value> = client
        .get(format!("{}/api/user/results", app.address))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["id"], second["resultId"]);
    assert_eq!(results[1]["id"], first["resultId"]);
    assert_eq!(results[1]["answers"], json!(PERFECT_ANSWERS));
    assert_eq!(results[0]["answers"], json!(["", "", "", "", ""]));
    assert_eq!(results[0]["certificateGenerated"], false);
}

#[tokio::test]
async fn results_are_scoped_to_the_caller() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let (token_a, _) = register_user(&client, &app.address, "User A").await;
    let (token_b, _) = register_user(&client, &app.address, "User B").await;

    submit(&client, &app.address, &token_a, json!(PERFECT_ANSWERS)).await;

    let results_b: Vec<Value> = client
        .get(format!("{}/api/user/results", app.address))
        .bearer_auth(&token_b)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(results_b.is_empty());
}

#[tokio::test]
async fn empty_question_set_is_refused_without_saving() {
    let app = spawn_app_with(pdf_renderer(), false).await;
    let client = reqwest::Client::new();
    let (token, _) = register_user(&client, &app.address, "Ada").await;

    let response = submit(&client, &app.address, &token, json!(["anything"])).await;
    assert_eq!(response.status().as_u16(), 503);

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM results")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(rows, 0);
}
