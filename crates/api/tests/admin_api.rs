//! Integration tests for admin designer management, the workload
//! dashboard, the intake queue, and the generic status endpoint.

mod common;

use axum::http::StatusCode;
use common::{
    admin_token, assert_business_rule, assign_via_api, body_json, build_test_app, designer_row,
    get, patch_json, post_json, project_row, put_json, seed_designer, seed_project,
};
use sqlx::PgPool;

const CLIENT_ID: i64 = 100;

// ---------------------------------------------------------------------------
// Designer CRUD
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_designer_defaults_capacity_to_three(pool: PgPool) {
    let app = build_test_app(pool);
    let admin = admin_token(1);

    let response = post_json(
        &app,
        "/api/v1/admin/designers",
        Some(&admin),
        serde_json::json!({ "user_id": 200, "display_name": "Mara" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["data"]["display_name"], "Mara");
    assert_eq!(json["data"]["max_capacity"], 3);
    assert_eq!(json["data"]["current_load"], 0);
    assert_eq!(json["data"]["status"], "active");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_designer_for_same_user_conflicts(pool: PgPool) {
    let app = build_test_app(pool);
    let admin = admin_token(1);
    let body = serde_json::json!({ "user_id": 200, "display_name": "Mara" });

    let response = post_json(&app, "/api/v1/admin/designers", Some(&admin), body.clone()).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = post_json(&app, "/api/v1/admin/designers", Some(&admin), body).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_designer_with_zero_capacity_is_rejected(pool: PgPool) {
    let app = build_test_app(pool);
    let admin = admin_token(1);

    let response = post_json(
        &app,
        "/api/v1/admin/designers",
        Some(&admin),
        serde_json::json!({ "user_id": 200, "display_name": "Mara", "max_capacity": 0 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_designer_with_unknown_status_is_rejected(pool: PgPool) {
    let designer = seed_designer(&pool, 200, 3).await;
    let app = build_test_app(pool);
    let admin = admin_token(1);

    let response = put_json(
        &app,
        &format!("/api/v1/admin/designers/{}", designer.id),
        Some(&admin),
        serde_json::json!({ "status": "vacationing" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_designer_applies_leave_window(pool: PgPool) {
    let designer = seed_designer(&pool, 200, 3).await;
    let app = build_test_app(pool.clone());
    let admin = admin_token(1);

    let response = put_json(
        &app,
        &format!("/api/v1/admin/designers/{}", designer.id),
        Some(&admin),
        serde_json::json!({
            "status": "on_leave",
            "leave_from": "2026-09-01T00:00:00Z",
            "leave_to": "2026-09-14T23:59:59Z",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let row = designer_row(&pool, designer.id).await;
    assert_eq!(row.status, "on_leave");
    assert!(row.leave_from.is_some());
    assert!(row.leave_to.is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn inverted_leave_window_is_rejected(pool: PgPool) {
    let designer = seed_designer(&pool, 200, 3).await;
    let app = build_test_app(pool);
    let admin = admin_token(1);

    let response = put_json(
        &app,
        &format!("/api/v1/admin/designers/{}", designer.id),
        Some(&admin),
        serde_json::json!({
            "leave_from": "2026-09-14T00:00:00Z",
            "leave_to": "2026-09-01T00:00:00Z",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Workload dashboard
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn workload_dashboard_reports_utilization_and_backlog(pool: PgPool) {
    let designer = seed_designer(&pool, 200, 4).await;
    sqlx::query("UPDATE designers SET average_completion_hours = 10.0 WHERE id = $1")
        .bind(designer.id)
        .execute(&pool)
        .await
        .unwrap();

    let first = seed_project(&pool, CLIENT_ID, "One").await;
    let second = seed_project(&pool, CLIENT_ID, "Two").await;
    let app = build_test_app(pool.clone());
    let admin = admin_token(1);

    assign_via_api(&app, &admin, designer.id, first.id).await;
    assign_via_api(&app, &admin, designer.id, second.id).await;

    let response = get(&app, "/api/v1/admin/designers/workload", Some(&admin)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let entries = json["data"].as_array().unwrap();
    let entry = entries
        .iter()
        .find(|e| e["id"] == designer.id)
        .expect("designer should appear on the dashboard");
    assert_eq!(entry["current_load"], 2);
    assert_eq!(entry["max_capacity"], 4);
    assert_eq!(entry["utilization"], 50);
    assert_eq!(entry["estimated_backlog_hours"], 20.0);
}

// ---------------------------------------------------------------------------
// Intake queue
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn pending_queue_lists_oldest_first_and_drops_assigned(pool: PgPool) {
    let designer = seed_designer(&pool, 200, 3).await;
    let older = seed_project(&pool, CLIENT_ID, "Older").await;
    let newer = seed_project(&pool, CLIENT_ID, "Newer").await;
    let taken = seed_project(&pool, CLIENT_ID, "Taken").await;
    // Force distinct created_at values (BIGSERIAL rows can share a NOW()).
    sqlx::query("UPDATE projects SET created_at = created_at - INTERVAL '1 hour' WHERE id = $1")
        .bind(older.id)
        .execute(&pool)
        .await
        .unwrap();

    let app = build_test_app(pool.clone());
    let admin = admin_token(1);
    assign_via_api(&app, &admin, designer.id, taken.id).await;

    let response = get(&app, "/api/v1/admin/projects/pending", Some(&admin)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let queue = json["data"].as_array().unwrap();
    assert_eq!(queue.len(), 2);
    assert_eq!(queue[0]["id"], older.id);
    assert_eq!(queue[1]["id"], newer.id);
}

// ---------------------------------------------------------------------------
// Generic status endpoint
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn cancel_assigned_project_releases_designer_slot(pool: PgPool) {
    let designer = seed_designer(&pool, 200, 3).await;
    let project = seed_project(&pool, CLIENT_ID, "Doomed").await;
    let app = build_test_app(pool.clone());
    let admin = admin_token(1);

    assign_via_api(&app, &admin, designer.id, project.id).await;

    let response = patch_json(
        &app,
        &format!("/api/v1/admin/projects/{}/status", project.id),
        Some(&admin),
        serde_json::json!({ "status": "CANCELLED" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(project_row(&pool, project.id).await.status, "CANCELLED");
    assert_eq!(designer_row(&pool, designer.id).await.current_load, 0);

    let (active,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM project_assignments WHERE project_id = $1 AND status = 'active'",
    )
    .bind(project.id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(active, 0, "cancellation closes the active record");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn cancel_pending_project_succeeds_without_designer(pool: PgPool) {
    let project = seed_project(&pool, CLIENT_ID, "Never started").await;
    let app = build_test_app(pool.clone());
    let admin = admin_token(1);

    let response = patch_json(
        &app,
        &format!("/api/v1/admin/projects/{}/status", project.id),
        Some(&admin),
        serde_json::json!({ "status": "CANCELLED" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(project_row(&pool, project.id).await.status, "CANCELLED");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn rework_sends_review_back_to_in_progress(pool: PgPool) {
    let designer = seed_designer(&pool, 200, 3).await;
    let project = seed_project(&pool, CLIENT_ID, "Rework me").await;
    let app = build_test_app(pool.clone());
    let admin = admin_token(1);
    let designer_tok = common::designer_token(200);

    assign_via_api(&app, &admin, designer.id, project.id).await;
    let response = post_json(
        &app,
        &format!("/api/v1/designer/projects/{}/deliver", project.id),
        Some(&designer_tok),
        serde_json::json!({ "delivery_link": "https://files.example.com/draft.zip" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = patch_json(
        &app,
        &format!("/api/v1/admin/projects/{}/status", project.id),
        Some(&admin),
        serde_json::json!({ "status": "IN_PROGRESS" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(project_row(&pool, project.id).await.status, "IN_PROGRESS");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn illegal_transition_is_rejected_with_machine_code(pool: PgPool) {
    let project = seed_project(&pool, CLIENT_ID, "Stuck").await;
    let app = build_test_app(pool.clone());
    let admin = admin_token(1);

    // PENDING cannot jump straight to IN_PROGRESS.
    let response = patch_json(
        &app,
        &format!("/api/v1/admin/projects/{}/status", project.id),
        Some(&admin),
        serde_json::json!({ "status": "IN_PROGRESS" }),
    )
    .await;
    assert_business_rule(response, "INVALID_STATUS_TRANSITION").await;
    assert_eq!(project_row(&pool, project.id).await.status, "PENDING");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn completed_cannot_be_requested_directly(pool: PgPool) {
    let project = seed_project(&pool, CLIENT_ID, "Shortcut").await;
    let app = build_test_app(pool);
    let admin = admin_token(1);

    let response = patch_json(
        &app,
        &format!("/api/v1/admin/projects/{}/status", project.id),
        Some(&admin),
        serde_json::json!({ "status": "COMPLETED" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn cancelled_project_is_terminal(pool: PgPool) {
    let project = seed_project(&pool, CLIENT_ID, "Twice dead").await;
    let app = build_test_app(pool);
    let admin = admin_token(1);
    let path = format!("/api/v1/admin/projects/{}/status", project.id);

    let response = patch_json(
        &app,
        &path,
        Some(&admin),
        serde_json::json!({ "status": "CANCELLED" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = patch_json(
        &app,
        &path,
        Some(&admin),
        serde_json::json!({ "status": "CANCELLED" }),
    )
    .await;
    assert_business_rule(response, "INVALID_STATUS_TRANSITION").await;
}
