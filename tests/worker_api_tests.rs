//! Worker API integration tests
//!
//! CRUD over HTTP, the response envelope, error codes and request IDs.

use std::sync::{Arc, Once};

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::App;
use serde_json::json;
use tempfile::TempDir;

use dutyroster::api::middleware::{RequestIdMiddleware, TimingMiddleware};
use dutyroster::api::services::types::{HealthResponse, WorkerResponse};
use dutyroster::api::services::{ApiResponse, AppStartTime, ErrorCode};
use dutyroster::config::{CorsConfig, init_config};
use dutyroster::runtime::lifetime::startup::StartupContext;
use dutyroster::runtime::modes::server::{build_app, configure_app};
use dutyroster::storage::backend::SeaOrmStorage;

// =============================================================================
// Test Setup
// =============================================================================

static INIT: Once = Once::new();

fn init_test_config() {
    INIT.call_once(|| {
        init_config();
    });
}

async fn create_context() -> (StartupContext, TempDir) {
    init_test_config();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("worker_api_test.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let storage = Arc::new(
        SeaOrmStorage::new(&db_url, "sqlite")
            .await
            .expect("Failed to create storage"),
    );
    (StartupContext::from_storage(storage), temp_dir)
}

/// Create a test app with the full `/api` tree
macro_rules! api_app {
    ($ctx:expr) => {{
        test::init_service(
            App::new()
                .wrap(TimingMiddleware)
                .wrap(RequestIdMiddleware)
                .configure(configure_app($ctx.clone(), AppStartTime::now())),
        )
        .await
    }};
}

macro_rules! create_worker {
    ($app:expr, $body:expr) => {{
        let req = TestRequest::post()
            .uri("/api/workers")
            .set_json($body)
            .to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: ApiResponse<WorkerResponse> = test::read_body_json(resp).await;
        body.data.expect("created worker")
    }};
}

// =============================================================================
// CRUD
// =============================================================================

#[tokio::test]
async fn test_create_and_get_worker() {
    let (ctx, _dir) = create_context().await;
    let app = api_app!(ctx);

    let worker = create_worker!(
        app,
        json!({"name": "Dana Levi", "title": "commander", "department": "Medical"})
    );
    assert_eq!(worker.name, "Dana Levi");
    assert_eq!(worker.title_display, "Commander");
    assert_eq!(worker.department.as_deref(), Some("Medical"));
    assert_eq!(worker.hard_chores_counter, 0);

    let req = TestRequest::get()
        .uri(&format!("/api/workers/{}", worker.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: ApiResponse<WorkerResponse> = test::read_body_json(resp).await;
    assert_eq!(body.code, ErrorCode::Success as i32);
    assert_eq!(body.data.unwrap().id, worker.id);
}

#[tokio::test]
async fn test_list_workers_sorted_by_name() {
    let (ctx, _dir) = create_context().await;
    let app = api_app!(ctx);

    create_worker!(app, json!({"name": "Zohar", "title": "soldier"}));
    create_worker!(app, json!({"name": "Avi", "title": "soldier"}));

    let req = TestRequest::get().uri("/api/workers").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: ApiResponse<Vec<WorkerResponse>> = test::read_body_json(resp).await;
    let names: Vec<String> = body.data.unwrap().into_iter().map(|w| w.name).collect();
    assert_eq!(names, vec!["Avi", "Zohar"]);
}

#[tokio::test]
async fn test_update_worker_partially() {
    let (ctx, _dir) = create_context().await;
    let app = api_app!(ctx);

    let worker = create_worker!(
        app,
        json!({"name": "Noa", "title": "soldier", "department": "Logistics"})
    );

    let req = TestRequest::put()
        .uri(&format!("/api/workers/{}", worker.id))
        .set_json(json!({"hard_chores_counter": 4}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: ApiResponse<WorkerResponse> = test::read_body_json(resp).await;
    let updated = body.data.unwrap();
    assert_eq!(updated.hard_chores_counter, 4);
    assert_eq!(updated.name, "Noa");
    assert_eq!(updated.department.as_deref(), Some("Logistics"));

    // 空字符串清除部门
    let req = TestRequest::put()
        .uri(&format!("/api/workers/{}", worker.id))
        .set_json(json!({"department": ""}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: ApiResponse<WorkerResponse> = test::read_body_json(resp).await;
    assert_eq!(body.data.unwrap().department, None);
}

#[tokio::test]
async fn test_delete_worker() {
    let (ctx, _dir) = create_context().await;
    let app = api_app!(ctx);

    let worker = create_worker!(app, json!({"name": "Temp", "title": "soldier"}));

    let req = TestRequest::delete()
        .uri(&format!("/api/workers/{}", worker.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = TestRequest::delete()
        .uri(&format!("/api/workers/{}", worker.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Errors
// =============================================================================

#[tokio::test]
async fn test_get_missing_worker_is_404() {
    let (ctx, _dir) = create_context().await;
    let app = api_app!(ctx);

    let req = TestRequest::get().uri("/api/workers/9999").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: ApiResponse<serde_json::Value> = test::read_body_json(resp).await;
    assert_eq!(body.code, ErrorCode::WorkerNotFound as i32);
    assert!(body.data.is_none());
}

#[tokio::test]
async fn test_blank_name_is_rejected() {
    let (ctx, _dir) = create_context().await;
    let app = api_app!(ctx);

    let req = TestRequest::post()
        .uri("/api/workers")
        .set_json(json!({"name": "   ", "title": "soldier"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: ApiResponse<serde_json::Value> = test::read_body_json(resp).await;
    assert_eq!(body.code, ErrorCode::WorkerInvalid as i32);
}

#[tokio::test]
async fn test_malformed_json_uses_envelope() {
    let (ctx, _dir) = create_context().await;
    let app = api_app!(ctx);

    let req = TestRequest::post()
        .uri("/api/workers")
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: ApiResponse<serde_json::Value> = test::read_body_json(resp).await;
    assert_eq!(body.code, ErrorCode::BadRequest as i32);
}

#[tokio::test]
async fn test_unparsable_path_id_uses_envelope() {
    let (ctx, _dir) = create_context().await;
    let app = api_app!(ctx);

    for (method, uri) in [
        (TestRequest::get(), "/api/workers/abc"),
        (TestRequest::delete(), "/api/assignments/x"),
        (TestRequest::get(), "/api/workers/99999999999"),
    ] {
        let req = method.uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", uri);
        let body: ApiResponse<serde_json::Value> = test::read_body_json(resp).await;
        assert_eq!(body.code, ErrorCode::BadRequest as i32);
    }
}

// =============================================================================
// Request ID and health
// =============================================================================

#[tokio::test]
async fn test_request_id_is_generated_or_echoed() {
    let (ctx, _dir) = create_context().await;
    let app = api_app!(ctx);

    let req = TestRequest::get().uri("/api/workers").to_request();
    let resp = test::call_service(&app, req).await;
    let generated = resp
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    assert!(generated.is_some_and(|id| !id.is_empty()));

    let req = TestRequest::get()
        .uri("/api/workers")
        .insert_header(("X-Request-ID", "trace-abc-123"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(
        resp.headers().get("x-request-id").unwrap(),
        "trace-abc-123"
    );
}

#[tokio::test]
async fn test_cors_preflight_carries_request_id() {
    let (ctx, _dir) = create_context().await;
    let cors = CorsConfig {
        allowed_origins: vec!["http://localhost:5173".to_string()],
        ..Default::default()
    };
    let app = test::init_service(build_app(ctx.clone(), AppStartTime::now(), cors)).await;

    let req = TestRequest::default()
        .method(actix_web::http::Method::OPTIONS)
        .uri("/api/workers")
        .insert_header(("Origin", "http://localhost:5173"))
        .insert_header(("Access-Control-Request-Method", "POST"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    assert!(resp.headers().contains_key("access-control-allow-origin"));
    assert!(resp.headers().contains_key("x-request-id"));

    // 普通请求经过完整中间件链
    let req = TestRequest::get()
        .uri("/api/workers")
        .insert_header(("Origin", "http://localhost:5173"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));
    assert!(resp.headers().contains_key("cache-control"));
}

#[tokio::test]
async fn test_health_reports_worker_count() {
    let (ctx, _dir) = create_context().await;
    let app = api_app!(ctx);

    create_worker!(app, json!({"name": "One", "title": "soldier"}));

    let req = TestRequest::get().uri("/api/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: ApiResponse<HealthResponse> = test::read_body_json(resp).await;
    let health = body.data.unwrap();
    assert_eq!(health.status, "ok");
    assert_eq!(health.database, "sqlite");
    assert_eq!(health.workers, 1);
}
