mod common;

use axum::http::StatusCode;
use common::{body_json, TestApp};
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn test_health_reports_database(pool: PgPool) {
    let app = TestApp::new(pool, "2025-01-05");
    let response = app.get("/health", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["db_healthy"], true);
    assert!(json["version"].is_string());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_request_id_is_propagated(pool: PgPool) {
    let app = TestApp::new(pool, "2025-01-05");
    let response = app.get("/health", None).await;
    assert!(response.headers().contains_key("x-request-id"));
}
