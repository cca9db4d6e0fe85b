//! End-to-end tests through the Axum hosting layer.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use jobboard_router::app::{self, model::UserRole, store::MemoryStore};
use jobboard_router::config::{ApiToken, AppConfig};
use jobboard_router::middleware::TokenRegistry;
use jobboard_router::routing::Router as RouteTable;
use jobboard_router::HttpServer;
use serde_json::Value;
use tower::ServiceExt;

fn server() -> HttpServer {
    let mut config = AppConfig::default();
    config.auth.tokens = vec![
        ApiToken {
            token: "acme".into(),
            user_id: 1,
            role: UserRole::Company,
        },
        ApiToken {
            token: "alice".into(),
            user_id: 2,
            role: UserRole::Jobseeker,
        },
    ];
    config.limits.max_body_size = 1024;

    let mut routes = RouteTable::new();
    app::register_routes(
        &mut routes,
        Arc::new(MemoryStore::seeded()),
        Arc::new(TokenRegistry::from_config(&config.auth)),
    );
    HttpServer::new(config, Arc::new(routes))
}

async fn send(server: &HttpServer, request: Request<Body>) -> (StatusCode, Value) {
    let response = server.app().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_health() {
    let server = server();
    let (status, body) = send(&server, get("/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let server = server();
    let request = Request::builder()
        .method("POST")
        .uri("/unknown")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&server, request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Route not found");
    assert_eq!(body["status"], 404);
}

#[tokio::test]
async fn test_auth_and_role_halt_chain() {
    let server = server();

    let (status, body) = send(&server, get("/applications/1", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Missing bearer token");

    let (status, _) = send(&server, get("/applications/1", Some("alice"))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_list_applications_with_paging() {
    let server = server();
    let (status, body) = send(
        &server,
        get("/jobs/1/applications?page=1&limit=1", Some("acme")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["meta"]["total_items"], 2);
}

#[tokio::test]
async fn test_handler_error_status_is_preserved() {
    let server = server();
    let (status, body) = send(&server, get("/applications/999", Some("acme"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Application not found");

    let (status, _) = send(&server, get("/jobs/abc/applications", Some("acme"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_status() {
    let server = server();
    let request = Request::builder()
        .method("PUT")
        .uri("/applications/2/status")
        .header("authorization", "Bearer acme")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"status":"accepted","status_reason":"Great fit"}"#))
        .unwrap();
    let (status, body) = send(&server, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "accepted");
    assert_eq!(body["status_reason"], "Great fit");

    let (_, body) = send(&server, get("/applications/2", Some("acme"))).await;
    assert_eq!(body["status"], "accepted");
}

#[tokio::test]
async fn test_method_mismatch_is_404() {
    let server = server();
    let request = Request::builder()
        .method("DELETE")
        .uri("/applications/1")
        .header("authorization", "Bearer acme")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&server, request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let server = server();
    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "req-123")
        .body(Body::empty())
        .unwrap();
    let response = server.app().oneshot(request).await.unwrap();
    assert_eq!(response.headers().get("x-request-id").unwrap(), "req-123");

    let response = server.app().oneshot(get("/health", None)).await.unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_oversized_body_rejected() {
    let server = server();
    let request = Request::builder()
        .method("PUT")
        .uri("/applications/1/status")
        .header("authorization", "Bearer acme")
        .body(Body::from(vec![b'x'; 4096]))
        .unwrap();
    let response = server.app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
