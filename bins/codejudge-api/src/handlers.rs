// HTTP route handlers for the CodeJudge API

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use codejudge_common::types::{
    ExecutionPayload, ReviewEnvelope, ReviewMetadata, ReviewRequest, RunRequest,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::error::ApiError;
use crate::prompt;
use crate::AppState;

/// GET / - Health check, lists the endpoints
pub async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "message": "Backend is running! 🚀",
            "endpoints": {
                "run": "POST /run - Execute code",
                "review": "POST /review - AI Code Review"
            }
        })),
    )
}

/// POST /run - Forward code to the execution API and relay its response
pub async fn run_code(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RunRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(request) = payload.map_err(reject)?;
    let (language, code) = request.required().ok_or(ApiError::MissingFields)?;

    let request_id = Uuid::new_v4();
    info!(
        request_id = %request_id,
        language = %language,
        source_size = code.len(),
        stdin_size = request.stdin().len(),
        "Run request received"
    );

    let payload = ExecutionPayload::single_file(language, code, request.stdin());
    let start = Instant::now();

    match state.compiler.run(&payload).await {
        Ok(result) => {
            info!(
                request_id = %request_id,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Execution relayed"
            );
            Ok(Json(result))
        }
        Err(e) => {
            error!(
                request_id = %request_id,
                upstream_status = ?e.upstream_status(),
                error = %e,
                "Error executing code"
            );
            Err(ApiError::Execution(e))
        }
    }
}

/// POST /review - Ask the LLM for a structured review of the code
pub async fn review_code(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ReviewRequest>, JsonRejection>,
) -> Result<Json<ReviewEnvelope>, ApiError> {
    let Json(request) = payload.map_err(reject)?;
    let (language, code) = request.required().ok_or(ApiError::MissingFields)?;

    let request_id = Uuid::new_v4();
    info!(
        request_id = %request_id,
        language = %language,
        source_size = code.len(),
        has_problem = request.problem().is_some(),
        model = %state.review.model(),
        "Sending code to AI for review"
    );

    let user_prompt = prompt::user_prompt(language, code, request.problem());
    let start = Instant::now();

    let completion = state
        .review
        .complete(prompt::SYSTEM_PROMPT, &user_prompt)
        .await
        .map_err(|e| {
            error!(
                request_id = %request_id,
                upstream_status = ?e.upstream_status(),
                error = %e,
                "Error in AI code review"
            );
            ApiError::Review(e)
        })?;

    // The model is asked for JSON but nothing guarantees it
    let review: Value = serde_json::from_str(&completion.content).map_err(|e| {
        error!(
            request_id = %request_id,
            error = %e,
            content_size = completion.content.len(),
            "AI returned malformed JSON"
        );
        ApiError::Review(e.into())
    })?;

    info!(
        request_id = %request_id,
        elapsed_ms = start.elapsed().as_millis() as u64,
        tokens = completion.total_tokens,
        "AI review completed"
    );

    let metadata = ReviewMetadata::now(state.review.model(), language, completion.total_tokens);
    Ok(Json(ReviewEnvelope::success(review, metadata)))
}

fn reject(rejection: JsonRejection) -> ApiError {
    warn!(error = %rejection.body_text(), "Rejected request body");
    ApiError::BadRequest(rejection.body_text())
}
