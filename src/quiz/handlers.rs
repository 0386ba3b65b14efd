//! Quiz handlers

use axum::extract::{Extension, Json};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use super::generator::{generate_quiz, grade, SubmittedAnswer};
use crate::common::{ApiError, AppState};

#[derive(Deserialize)]
pub struct QuizRequest {
    pub topic: String,
}

#[derive(Deserialize)]
pub struct SubmitQuizRequest {
    pub answers: Vec<SubmittedAnswer>,
}

/// POST /quiz
///
/// Searches the topic and turns the snippets into fill-in-the-blank
/// questions. Correct answers are embedded in the payload; grading happens
/// on submit against those embedded answers.
pub async fn create_quiz(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Json(payload): Json<QuizRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let state = state_lock.read().await.clone();

    let topic = payload.topic.trim().to_string();
    if topic.is_empty() {
        return Err(ApiError::ValidationError(
            "topic: must not be empty".to_string(),
        ));
    }

    let items = state.search_service.search(&topic).await?;

    let questions = generate_quiz(&topic, &items, &mut rand::thread_rng());

    info!(
        topic = %topic,
        question_count = questions.len(),
        "Quiz generated from search snippets"
    );

    Ok(Json(json!({
        "topic": topic,
        "questions": questions,
    })))
}

/// POST /submit_quiz
pub async fn submit_quiz(
    Json(payload): Json<SubmitQuizRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if payload.answers.is_empty() {
        return Err(ApiError::ValidationError(
            "answers: must not be empty".to_string(),
        ));
    }

    let (score, results) = grade(&payload.answers);

    info!(
        score = score,
        total = payload.answers.len(),
        "Quiz graded"
    );

    Ok(Json(json!({
        "score": score,
        "total": payload.answers.len(),
        "results": results,
    })))
}
