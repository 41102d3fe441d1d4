#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use tmc_api::config::{LogFormat, ServerConfig};
use tmc_api::middleware::actor::USER_ID_HEADER;
use tmc_api::router::build_app_router;
use tmc_api::state::AppState;
use tmc_core::types::DbId;
use tmc_db::models::user::CreateUser;
use tmc_db::repositories::UserRepo;

/// Configuration for tests. The pool comes from `#[sqlx::test]`, so the URL
/// is never dialed.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        database_url: "postgres://unused".to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        db_max_connections: 5,
        log_format: LogFormat::Pretty,
    }
}

/// The production router and middleware over `pool`.
pub fn build_test_app(pool: PgPool) -> Router {
    build_app_router(AppState::new(pool, Arc::new(test_config())))
}

/// Register a user and return its id for the `X-User-Id` header.
pub async fn create_user(pool: &PgPool, username: &str) -> DbId {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            full_name: None,
        },
    )
    .await
    .unwrap()
    .id
}

fn request(method: &str, uri: &str, user: Option<DbId>, body: Option<serde_json::Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user_id) = user {
        builder = builder.header(USER_ID_HEADER, user_id.to_string());
    }
    match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(request("GET", uri, None, None)).await.unwrap()
}

pub async fn post_json(
    app: Router,
    uri: &str,
    user: Option<DbId>,
    body: serde_json::Value,
) -> Response<Body> {
    app.oneshot(request("POST", uri, user, Some(body))).await.unwrap()
}

pub async fn patch_json(
    app: Router,
    uri: &str,
    user: Option<DbId>,
    body: serde_json::Value,
) -> Response<Body> {
    app.oneshot(request("PATCH", uri, user, Some(body))).await.unwrap()
}

/// POST without a body.
pub async fn post(app: Router, uri: &str, user: Option<DbId>) -> Response<Body> {
    app.oneshot(request("POST", uri, user, None)).await.unwrap()
}

pub async fn delete(app: Router, uri: &str, user: Option<DbId>) -> Response<Body> {
    app.oneshot(request("DELETE", uri, user, None)).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

