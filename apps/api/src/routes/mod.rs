pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::jobs::handlers as jobs;
use crate::state::AppState;

/// Multipart framing overhead allowed on top of the résumé size limit.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_resume_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/jobs",
            get(jobs::handle_list_jobs).post(jobs::handle_upsert_job),
        )
        .route("/api/jobs/:id", get(jobs::handle_get_job))
        .route("/api/jobs/:id/status", post(jobs::handle_update_status))
        .route(
            "/api/jobs/:id/match",
            post(analysis::handle_match).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/api/last-update", get(jobs::handle_last_update))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use serde_json::Value;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use super::*;
    use crate::analysis::KeywordMatchAnalyzer;
    use crate::config::{AnalyzerKind, Config};
    use crate::pagination::WindowSize;

    const BOUNDARY: &str = "jobhunter-test-boundary";

    /// Router over a lazy pool: requests rejected before any query never connect.
    fn test_router() -> Router {
        let db = PgPoolOptions::new()
            .connect_lazy("postgres://jobhunter@localhost:1/unused")
            .unwrap();
        let config = Config {
            database_url: "postgres://jobhunter@localhost:1/unused".to_string(),
            anthropic_api_key: None,
            analyzer: AnalyzerKind::Keyword,
            page_window_size: WindowSize::default(),
            max_resume_bytes: 1024,
            port: 0,
            rust_log: "debug".to_string(),
        };
        build_router(AppState {
            db,
            config,
            analyzer: Arc::new(KeywordMatchAnalyzer),
        })
    }

    async fn send(request: Request<Body>) -> (StatusCode, Value) {
        let response = test_router().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn post_multipart(uri: &str, field: &str, file_name: &str, content: &str) -> Request<Body> {
        let body = format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n\
             {content}\r\n\
             --{BOUNDARY}--\r\n"
        );
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_non_numeric_page_is_invalid_argument() {
        let (status, body) = send(get("/api/jobs?page=abc")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_limit_out_of_range() {
        let (status, _) = send(get("/api/jobs?limit=0")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_status_filter() {
        let (status, body) = send(get("/api/jobs?status=archived")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("archived"));
    }

    #[tokio::test]
    async fn test_status_update_requires_status() {
        let (status, body) = send(post_json("/api/jobs/3/status", "{}")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "status is required");

        let (status, _) = send(post_json("/api/jobs/3/status", r#"{"status":"hired"}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_ingest_rejects_blank_title() {
        let (status, _) = send(post_json(
            "/api/jobs",
            r#"{"title":" ","company":"Acme","job_url":"https://example.com/j/1"}"#,
        ))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_match_requires_resume_field() {
        let (status, body) =
            send(post_multipart("/api/jobs/1/match", "cv", "cv.txt", "Rust")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("'resume'"));
    }

    #[tokio::test]
    async fn test_match_rejects_unsupported_format() {
        let (status, body) =
            send(post_multipart("/api/jobs/1/match", "resume", "cv.odt", "PK")).await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(body["error"]["code"], "UNSUPPORTED_MEDIA_TYPE");
    }

    #[tokio::test]
    async fn test_match_rejects_oversized_upload() {
        let content = "x".repeat(2048);
        let (status, _) =
            send(post_multipart("/api/jobs/1/match", "resume", "cv.txt", &content)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_non_numeric_job_id_is_rejected() {
        let response = test_router().oneshot(get("/api/jobs/abc")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
