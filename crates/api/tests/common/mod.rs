#![allow(dead_code)]

//! Shared helpers for HTTP-level integration tests.
//!
//! Builds the production router (same middleware stack as `main.rs`) on
//! top of the `#[sqlx::test]` pool, and provides request/seeding helpers
//! so individual tests stay focused on behaviour.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, Response, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use sqlx::PgPool;
use tower::ServiceExt;

use atelier_api::auth::jwt::{generate_access_token, JwtConfig};
use atelier_api::config::ServerConfig;
use atelier_api::notifications::Notifier;
use atelier_api::router::build_app_router;
use atelier_api::state::AppState;
use atelier_core::roles::{ROLE_ADMIN, ROLE_CLIENT, ROLE_DESIGNER};
use atelier_core::types::DbId;
use atelier_db::models::designer::{CreateDesigner, Designer};
use atelier_db::models::project::{CreateProject, Project};
use atelier_db::repositories::{DesignerRepo, ProjectRepo};

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: test_jwt_config(),
    }
}

/// JWT configuration used by both the test app and token helpers.
pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "integration-test-secret".to_string(),
        access_token_expiry_mins: 60,
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
///
/// This goes through `build_app_router` so integration tests exercise the
/// same middleware stack (CORS, request ID, timeout, tracing, panic
/// recovery) that production uses.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let notifier = Arc::new(Notifier::new(pool.clone()));
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        notifier,
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

pub fn admin_token(user_id: DbId) -> String {
    token(user_id, ROLE_ADMIN)
}

pub fn client_token(user_id: DbId) -> String {
    token(user_id, ROLE_CLIENT)
}

pub fn designer_token(user_id: DbId) -> String {
    token(user_id, ROLE_DESIGNER)
}

fn token(user_id: DbId, role: &str) -> String {
    generate_access_token(user_id, role, &test_jwt_config()).unwrap()
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Send a GET request with an optional Bearer token.
pub async fn get(app: &Router, path: &str, token: Option<&str>) -> Response<Body> {
    send(app, Method::GET, path, token, None).await
}

/// Send a POST request with a JSON body.
pub async fn post_json(
    app: &Router,
    path: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::POST, path, token, Some(body)).await
}

/// Send a POST request with no body.
pub async fn post(app: &Router, path: &str, token: Option<&str>) -> Response<Body> {
    send(app, Method::POST, path, token, None).await
}

/// Send a PUT request with a JSON body.
pub async fn put_json(
    app: &Router,
    path: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PUT, path, token, Some(body)).await
}

/// Send a PATCH request with a JSON body.
pub async fn patch_json(
    app: &Router,
    path: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PATCH, path, token, Some(body)).await
}

async fn send(
    app: &Router,
    method: Method,
    path: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

/// Read a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = http_body_util::BodyExt::collect(response.into_body())
        .await
        .unwrap()
        .to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert a 422 business-rule rejection carrying the expected machine code.
pub async fn assert_business_rule(response: Response<Body>, code: &str) {
    assert_eq!(
        response.status(),
        StatusCode::UNPROCESSABLE_ENTITY,
        "expected a business-rule rejection"
    );
    let json = body_json(response).await;
    assert_eq!(json["code"], code);
}

// ---------------------------------------------------------------------------
// Seeding
// ---------------------------------------------------------------------------

/// Seed a designer with the given owning user and capacity.
pub async fn seed_designer(pool: &PgPool, user_id: DbId, max_capacity: i32) -> Designer {
    DesignerRepo::create(
        pool,
        &CreateDesigner {
            user_id,
            display_name: format!("Designer {user_id}"),
            max_capacity: Some(max_capacity),
        },
    )
    .await
    .unwrap()
}

/// Seed a PENDING project owned by `client_id`.
pub async fn seed_project(pool: &PgPool, client_id: DbId, name: &str) -> Project {
    ProjectRepo::create(
        pool,
        client_id,
        &CreateProject {
            name: name.to_string(),
            description: None,
            priority: None,
        },
    )
    .await
    .unwrap()
}

/// Seed a subscription plan, returning its id.
pub async fn seed_plan(pool: &PgPool, name: &str, max_projects: i32) -> DbId {
    let (id,): (DbId,) = sqlx::query_as(
        "INSERT INTO subscription_plans (name, max_projects, price_cents)
         VALUES ($1, $2, 4900) RETURNING id",
    )
    .bind(name)
    .bind(max_projects)
    .fetch_one(pool)
    .await
    .unwrap();
    id
}

/// Seed a subscription for `client_id` running from 60 days ago to 30
/// days from now, returning its id.
pub async fn seed_subscription(
    pool: &PgPool,
    client_id: DbId,
    plan_id: DbId,
    status: &str,
) -> DbId {
    let now = Utc::now();
    let (id,): (DbId,) = sqlx::query_as(
        "INSERT INTO subscriptions (client_id, plan_id, status, start_date, end_date)
         VALUES ($1, $2, $3, $4, $5) RETURNING id",
    )
    .bind(client_id)
    .bind(plan_id)
    .bind(status)
    .bind(now - Duration::days(60))
    .bind(now + Duration::days(30))
    .fetch_one(pool)
    .await
    .unwrap();
    id
}

/// Fetch a designer's current row directly.
pub async fn designer_row(pool: &PgPool, id: DbId) -> Designer {
    DesignerRepo::find_by_id(pool, id).await.unwrap().unwrap()
}

/// Fetch a project's current row directly.
pub async fn project_row(pool: &PgPool, id: DbId) -> Project {
    ProjectRepo::find_by_id(pool, id).await.unwrap().unwrap()
}

/// Assign `project_id` to `designer_id` through the admin API, asserting
/// success. Used by tests that need an assigned project as a starting
/// point.
pub async fn assign_via_api(app: &Router, admin: &str, designer_id: DbId, project_id: DbId) {
    let response = post_json(
        app,
        &format!("/api/v1/admin/designers/{designer_id}/assign-project"),
        Some(admin),
        serde_json::json!({ "project_id": project_id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK, "assignment should succeed");
}
