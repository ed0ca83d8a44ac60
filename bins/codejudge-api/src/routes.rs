use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(handlers::health_check))
        .route("/run", post(handlers::run_code))
        .route("/review", post(handlers::review_code))
}

/// Full application: routes, CORS for the browser editor, request tracing
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use codejudge_common::config::{CompilerConfig, ReviewConfig};
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_test_state(server_uri: &str) -> Arc<AppState> {
        Arc::new(AppState::new(
            reqwest::Client::new(),
            CompilerConfig {
                url: format!("{}/run", server_uri),
                rapidapi_key: "key".to_string(),
                rapidapi_host: "host".to_string(),
            },
            ReviewConfig {
                url: format!("{}/chat/completions", server_uri),
                api_key: "gsk".to_string(),
                model: "llama-3.1-8b-instant".to_string(),
            },
        ))
    }

    async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let resp = app
            .oneshot(
                Request::post(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_string(&body).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), 1_000_000)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn llm_reply(content: &str) -> Value {
        json!({
            "choices": [{"message": {"role": "assistant", "content": content}}],
            "usage": {"total_tokens": 2048}
        })
    }

    #[tokio::test]
    async fn test_health() {
        let app = build_router(make_test_state("http://127.0.0.1:9"));

        let resp = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body = axum::body::to_bytes(resp.into_body(), 10_000).await.unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["endpoints"]["run"], "POST /run - Execute code");
        assert_eq!(json["endpoints"]["review"], "POST /review - AI Code Review");
    }

    #[tokio::test]
    async fn test_run_missing_language() {
        let app = build_router(make_test_state("http://127.0.0.1:9"));
        let (status, body) = post_json(app, "/run", json!({"code": "print(1)"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing required fields: language and code");
    }

    #[tokio::test]
    async fn test_run_empty_code() {
        let app = build_router(make_test_state("http://127.0.0.1:9"));
        let (status, _) = post_json(app, "/run", json!({"language": "python", "code": ""})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_run_malformed_body() {
        let app = build_router(make_test_state("http://127.0.0.1:9"));
        let resp = app
            .oneshot(
                Request::post("/run")
                    .header("content-type", "application/json")
                    .body(Body::from("not valid json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_run_relays_upstream_json_unmodified() {
        let server = MockServer::start().await;
        let upstream = json!({
            "status": "success",
            "exception": null,
            "stdout": "Hello\n",
            "stderr": null,
            "executionTime": 12,
            "limitPerMonthRemaining": 4999,
            "memoryUsed": 9000,
            "compilationTime": 0
        });
        Mock::given(method("POST"))
            .and(path("/run"))
            .respond_with(ResponseTemplate::new(200).set_body_json(upstream.clone()))
            .expect(1)
            .mount(&server)
            .await;

        let app = build_router(make_test_state(&server.uri()));
        let (status, body) = post_json(
            app,
            "/run",
            json!({"language": "python", "code": "print('Hello')", "input": ""}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, upstream);
    }

    #[tokio::test]
    async fn test_run_upstream_failure_is_500() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/run"))
            .respond_with(
                ResponseTemplate::new(429).set_body_json(json!({"message": "Too many requests"})),
            )
            .mount(&server)
            .await;

        let app = build_router(make_test_state(&server.uri()));
        let (status, body) =
            post_json(app, "/run", json!({"language": "python", "code": "print(1)"})).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["status"], "error");
        assert_eq!(body["error"], "Code execution failed");
        assert_eq!(body["message"], "Too many requests");
    }

    #[tokio::test]
    async fn test_run_unreachable_upstream_is_500() {
        // Port 9 (discard) is not expected to be listening
        let app = build_router(make_test_state("http://127.0.0.1:9"));
        let (status, body) =
            post_json(app, "/run", json!({"language": "python", "code": "print(1)"})).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["status"], "error");
    }

    #[tokio::test]
    async fn test_review_missing_code() {
        let app = build_router(make_test_state("http://127.0.0.1:9"));
        let (status, body) = post_json(app, "/review", json!({"language": "java"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing required fields: language and code");
    }

    #[tokio::test]
    async fn test_review_success() {
        let server = MockServer::start().await;
        let review = json!({
            "problem_understanding": "Adds two integers",
            "scoring": {"overall_score": "7/10", "grade": "B"}
        });
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(llm_reply(&review.to_string())))
            .expect(1)
            .mount(&server)
            .await;

        let app = build_router(make_test_state(&server.uri()));
        let (status, body) = post_json(
            app,
            "/review",
            json!({
                "language": "python",
                "code": "a, b = map(int, input().split())\nprint(a + b)",
                "problemStatement": "Sum of two numbers"
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
        assert_eq!(body["review"], review);
        assert_eq!(body["metadata"]["model"], "llama-3.1-8b-instant");
        assert_eq!(body["metadata"]["language"], "python");
        assert_eq!(body["metadata"]["tokens_used"], 2048);
        assert!(body["metadata"]["timestamp"].as_str().is_some_and(|t| !t.is_empty()));
    }

    #[tokio::test]
    async fn test_review_malformed_llm_json_is_500() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(llm_reply("Here is your review: {oops")),
            )
            .mount(&server)
            .await;

        let app = build_router(make_test_state(&server.uri()));
        let (status, body) =
            post_json(app, "/review", json!({"language": "c", "code": "int main(){}"})).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["status"], "error");
        assert_eq!(body["error"], "AI code review failed");
    }

    #[tokio::test]
    async fn test_review_empty_completion_is_500() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let app = build_router(make_test_state(&server.uri()));
        let (status, body) =
            post_json(app, "/review", json!({"language": "go", "code": "package main"})).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "No response from AI");
    }
}
