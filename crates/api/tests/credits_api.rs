//! Integration tests for subscription-gated project intake and the
//! usage report.

mod common;

use axum::http::StatusCode;
use common::{
    assert_business_rule, body_json, build_test_app, client_token, get, post_json, seed_plan,
    seed_subscription,
};
use chrono::{Duration, Utc};
use sqlx::PgPool;

const CLIENT_ID: i64 = 100;

fn create_body(name: &str) -> serde_json::Value {
    serde_json::json!({ "name": name, "description": "A thing to design" })
}

// ---------------------------------------------------------------------------
// Intake gating
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_without_subscription_is_rejected(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let token = client_token(CLIENT_ID);

    let response = post_json(&app, "/api/v1/projects", Some(&token), create_body("Logo")).await;
    assert_business_rule(response, "NO_ACTIVE_SUBSCRIPTION").await;

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM projects")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0, "no project row may survive a rejected intake");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_with_active_subscription_succeeds(pool: PgPool) {
    let plan = seed_plan(&pool, "Starter", 5).await;
    seed_subscription(&pool, CLIENT_ID, plan, "active").await;
    let app = build_test_app(pool);
    let token = client_token(CLIENT_ID);

    let response = post_json(&app, "/api/v1/projects", Some(&token), create_body("Logo")).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "PENDING");
    assert_eq!(json["data"]["priority"], "medium");
    assert_eq!(json["data"]["client_id"], CLIENT_ID);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn trialing_subscription_admits_projects(pool: PgPool) {
    let plan = seed_plan(&pool, "Trial", 5).await;
    seed_subscription(&pool, CLIENT_ID, plan, "trialing").await;
    let app = build_test_app(pool);
    let token = client_token(CLIENT_ID);

    let response = post_json(&app, "/api/v1/projects", Some(&token), create_body("Logo")).await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn expired_subscription_is_rejected(pool: PgPool) {
    let plan = seed_plan(&pool, "Lapsed", 5).await;
    let now = Utc::now();
    sqlx::query(
        "INSERT INTO subscriptions (client_id, plan_id, status, start_date, end_date)
         VALUES ($1, $2, 'active', $3, $4)",
    )
    .bind(CLIENT_ID)
    .bind(plan)
    .bind(now - Duration::days(90))
    .bind(now - Duration::days(1))
    .execute(&pool)
    .await
    .unwrap();

    let app = build_test_app(pool);
    let token = client_token(CLIENT_ID);

    let response = post_json(&app, "/api/v1/projects", Some(&token), create_body("Logo")).await;
    assert_business_rule(response, "NO_ACTIVE_SUBSCRIPTION").await;
}

// ---------------------------------------------------------------------------
// Quota exhaustion
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn exhausted_quota_rejects_further_intake(pool: PgPool) {
    let plan = seed_plan(&pool, "Duo", 2).await;
    seed_subscription(&pool, CLIENT_ID, plan, "active").await;
    let app = build_test_app(pool.clone());
    let token = client_token(CLIENT_ID);

    for name in ["First", "Second"] {
        let response = post_json(&app, "/api/v1/projects", Some(&token), create_body(name)).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = post_json(&app, "/api/v1/projects", Some(&token), create_body("Third")).await;
    assert_business_rule(response, "INSUFFICIENT_CREDITS").await;

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM projects WHERE client_id = $1")
        .bind(CLIENT_ID)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 2, "the rejected intake must not leave a project row");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn zero_quota_plan_is_unlimited(pool: PgPool) {
    let plan = seed_plan(&pool, "Agency", 0).await;
    seed_subscription(&pool, CLIENT_ID, plan, "active").await;
    let app = build_test_app(pool);
    let token = client_token(CLIENT_ID);

    for i in 0..7 {
        let response = post_json(
            &app,
            "/api/v1/projects",
            Some(&token),
            create_body(&format!("Project {i}")),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn quota_is_per_client(pool: PgPool) {
    let plan = seed_plan(&pool, "Solo", 1).await;
    seed_subscription(&pool, CLIENT_ID, plan, "active").await;
    seed_subscription(&pool, 101, plan, "active").await;
    let app = build_test_app(pool);

    let first = client_token(CLIENT_ID);
    let response = post_json(&app, "/api/v1/projects", Some(&first), create_body("Mine")).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // The other client's quota is untouched.
    let second = client_token(101);
    let response = post_json(&app, "/api/v1/projects", Some(&second), create_body("Theirs")).await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

// ---------------------------------------------------------------------------
// Input validation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_priority_is_rejected(pool: PgPool) {
    let plan = seed_plan(&pool, "Starter", 5).await;
    seed_subscription(&pool, CLIENT_ID, plan, "active").await;
    let app = build_test_app(pool);
    let token = client_token(CLIENT_ID);

    let response = post_json(
        &app,
        "/api/v1/projects",
        Some(&token),
        serde_json::json!({ "name": "Logo", "priority": "whenever" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn blank_name_is_rejected(pool: PgPool) {
    let plan = seed_plan(&pool, "Starter", 5).await;
    seed_subscription(&pool, CLIENT_ID, plan, "active").await;
    let app = build_test_app(pool);
    let token = client_token(CLIENT_ID);

    let response = post_json(
        &app,
        "/api/v1/projects",
        Some(&token),
        serde_json::json!({ "name": "   " }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Usage report
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn usage_reports_used_and_remaining(pool: PgPool) {
    let plan = seed_plan(&pool, "Starter", 5).await;
    seed_subscription(&pool, CLIENT_ID, plan, "active").await;
    let app = build_test_app(pool);
    let token = client_token(CLIENT_ID);

    for name in ["A", "B"] {
        let response = post_json(&app, "/api/v1/projects", Some(&token), create_body(name)).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = get(&app, "/api/v1/subscriptions/usage", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["plan_name"], "Starter");
    assert_eq!(json["data"]["quota"], 5);
    assert_eq!(json["data"]["used"], 2);
    assert_eq!(json["data"]["remaining"], 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn usage_for_unlimited_plan_has_null_remaining(pool: PgPool) {
    let plan = seed_plan(&pool, "Agency", 0).await;
    seed_subscription(&pool, CLIENT_ID, plan, "active").await;
    let app = build_test_app(pool);
    let token = client_token(CLIENT_ID);

    let response = get(&app, "/api/v1/subscriptions/usage", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(json["data"]["remaining"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn usage_without_subscription_is_rejected(pool: PgPool) {
    let app = build_test_app(pool);
    let token = client_token(CLIENT_ID);

    let response = get(&app, "/api/v1/subscriptions/usage", Some(&token)).await;
    assert_business_rule(response, "NO_ACTIVE_SUBSCRIPTION").await;
}
