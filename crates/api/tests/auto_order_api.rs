//! HTTP-level tests for auto-order templates, batch runs, and reports.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, delete, expect_status, get_auth, post_json_auth, put_json, TestApp,
};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn open_tomorrow(app: &TestApp) {
    let response = put_json(
        &app.router,
        "/api/v1/calendar/2025-06-11",
        json!({ "is_available": true, "deadline_time": "10:00:00" }),
        &app.admin_token(),
    )
    .await;
    expect_status(response, StatusCode::OK).await;
}

async fn priced_item(app: &TestApp, name: &str) -> i64 {
    let item = app.menu_item(name).await;
    let response = post_json_auth(
        &app.router,
        &format!("/api/v1/menu-items/{}/prices", item.id),
        json!({ "price": 500, "start_date": "2025-01-01" }),
        &app.admin_token(),
    )
    .await;
    expect_status(response, StatusCode::CREATED).await;
    item.id
}

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn template_lifecycle(pool: PgPool) {
    let app = build_test_app(pool);
    let user = app.user("aki").await;
    let token = app.token_for(user.id);
    let item_id = priced_item(&app, "karaage").await;

    let response = post_json_auth(
        &app.router,
        "/api/v1/auto-order/templates",
        json!({ "menu_item_id": item_id, "quantity": 1 }),
        &token,
    )
    .await;
    let created = expect_status(response, StatusCode::CREATED).await;
    let template_id = created["data"]["id"].as_i64().unwrap();
    assert_eq!(created["data"]["user_id"], user.id);

    // A weekday template cannot sit next to the every-day one.
    let response = post_json_auth(
        &app.router,
        "/api/v1/auto-order/templates",
        json!({ "menu_item_id": item_id, "quantity": 1, "day_of_week": 2 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = put_json(
        &app.router,
        &format!("/api/v1/auto-order/templates/{template_id}"),
        json!({ "menu_item_id": item_id, "quantity": 2, "day_of_week": 3 }),
        &token,
    )
    .await;
    let json = expect_status(response, StatusCode::OK).await;
    assert_eq!(json["data"]["day_of_week"], 3);

    let response = get_auth(&app.router, "/api/v1/auto-order/templates", &token).await;
    let json = expect_status(response, StatusCode::OK).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    let response = delete(
        &app.router,
        &format!("/api/v1/auto-order/templates/{template_id}"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn templates_are_owner_scoped(pool: PgPool) {
    let app = build_test_app(pool);
    let aki = app.user("aki").await;
    let ben = app.user("ben").await;
    let item_id = priced_item(&app, "karaage").await;

    let response = post_json_auth(
        &app.router,
        "/api/v1/auto-order/templates",
        json!({ "user_id": aki.id, "menu_item_id": item_id, "quantity": 1 }),
        &app.token_for(ben.id),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post_json_auth(
        &app.router,
        "/api/v1/auto-order/templates",
        json!({ "user_id": aki.id, "menu_item_id": item_id, "quantity": 1 }),
        &app.admin_token(),
    )
    .await;
    expect_status(response, StatusCode::CREATED).await;

    let response = get_auth(
        &app.router,
        &format!("/api/v1/auto-order/templates?user_id={}", aki.id),
        &app.admin_token(),
    )
    .await;
    let json = expect_status(response, StatusCode::OK).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Runs
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn run_is_admin_only_and_idempotent(pool: PgPool) {
    let app = build_test_app(pool);
    let aki = app.user("aki").await;
    let ben = app.user("ben").await;
    let item_id = priced_item(&app, "karaage").await;
    open_tomorrow(&app).await;

    post_json_auth(
        &app.router,
        "/api/v1/auto-order/templates",
        json!({ "menu_item_id": item_id, "quantity": 1 }),
        &app.token_for(aki.id),
    )
    .await;

    let response = post_json_auth(
        &app.router,
        "/api/v1/admin/auto-order/runs",
        json!({}),
        &app.token_for(ben.id),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post_json_auth(
        &app.router,
        "/api/v1/admin/auto-order/runs",
        json!({}),
        &app.admin_token(),
    )
    .await;
    let json = expect_status(response, StatusCode::CREATED).await;
    assert_eq!(json["data"]["outcome"], "completed");
    assert_eq!(json["data"]["target_date"], "2025-06-11");
    assert_eq!(json["data"]["created_count"], 1);
    assert_eq!(json["data"]["skipped_count"], 1);
    let run_id = json["data"]["id"].as_i64().unwrap();

    let response = post_json_auth(
        &app.router,
        "/api/v1/admin/auto-order/runs",
        json!({}),
        &app.admin_token(),
    )
    .await;
    let json = expect_status(response, StatusCode::OK).await;
    assert_eq!(json["data"]["outcome"], "already_ran");
    assert_eq!(json["data"]["id"], run_id);

    let response = get_auth(
        &app.router,
        &format!("/api/v1/admin/auto-order/runs/{run_id}"),
        &app.admin_token(),
    )
    .await;
    let json = expect_status(response, StatusCode::OK).await;
    assert_eq!(json["data"]["items"].as_array().unwrap().len(), 2);

    let response = get_auth(&app.router, "/api/v1/admin/auto-order/runs", &app.admin_token()).await;
    let json = expect_status(response, StatusCode::OK).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    let orders = body_json(get_auth(&app.router, "/api/v1/orders", &app.token_for(aki.id)).await).await;
    assert_eq!(orders["data"][0]["source"], "auto");
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn report_by_period_and_by_range(pool: PgPool) {
    let app = build_test_app(pool);
    let aki = app.user("aki").await;
    let ben = app.user("ben").await;
    let item_id = priced_item(&app, "karaage").await;
    open_tomorrow(&app).await;

    for (user_id, quantity) in [(aki.id, 1), (ben.id, 2)] {
        let response = post_json_auth(
            &app.router,
            "/api/v1/orders",
            json!({ "menu_item_id": item_id, "order_date": "2025-06-11", "quantity": quantity }),
            &app.token_for(user_id),
        )
        .await;
        expect_status(response, StatusCode::CREATED).await;
    }

    let response = get_auth(
        &app.router,
        "/api/v1/reports/orders?period=2025-06",
        &app.admin_token(),
    )
    .await;
    let json = expect_status(response, StatusCode::OK).await;
    assert_eq!(json["data"]["totals"]["order_count"], 2);
    assert_eq!(json["data"]["totals"]["total_quantity"], 3);
    assert_eq!(json["data"]["totals"]["total_amount"], 1500);

    // Non-admins are narrowed to their own orders.
    let response = get_auth(
        &app.router,
        "/api/v1/reports/orders?start_date=2025-06-01&end_date=2025-06-30",
        &app.token_for(aki.id),
    )
    .await;
    let json = expect_status(response, StatusCode::OK).await;
    assert_eq!(json["data"]["totals"]["total_amount"], 500);
    assert_eq!(json["data"]["lines"].as_array().unwrap().len(), 1);

    let response = get_auth(
        &app.router,
        "/api/v1/reports/orders?start_date=2025-06-01",
        &app.admin_token(),
    )
    .await;
    let json = expect_status(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(json["code"], "BAD_REQUEST");
}
