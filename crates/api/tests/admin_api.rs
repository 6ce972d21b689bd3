//! HTTP-level tests for calendar, price, settings, and closing-period routes.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, expect_status, get_auth, post_json_auth, put_json};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Calendar
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn calendar_writes_require_admin(pool: PgPool) {
    let app = build_test_app(pool);
    let user = app.user("aki").await;

    let response = put_json(
        &app.router,
        "/api/v1/calendar/2025-06-11",
        json!({ "is_available": true }),
        &app.token_for(user.id),
    )
    .await;
    let json = expect_status(response, StatusCode::FORBIDDEN).await;
    assert_eq!(json["code"], "FORBIDDEN");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn calendar_day_round_trip(pool: PgPool) {
    let app = build_test_app(pool);
    let token = app.admin_token();

    let response = get_auth(&app.router, "/api/v1/calendar/2025-06-11", &token).await;
    let json = expect_status(response, StatusCode::OK).await;
    assert!(json["data"].is_null());

    let response = put_json(
        &app.router,
        "/api/v1/calendar/2025-06-11",
        json!({ "is_available": true, "deadline_time": "10:00:00", "note": "curry day" }),
        &token,
    )
    .await;
    expect_status(response, StatusCode::OK).await;

    let response = get_auth(&app.router, "/api/v1/calendar/2025-06-11", &token).await;
    let json = expect_status(response, StatusCode::OK).await;
    assert_eq!(json["data"]["is_available"], true);
    assert_eq!(json["data"]["note"], "curry day");

    let response = get_auth(
        &app.router,
        "/api/v1/calendar?from=2025-06-01&to=2025-06-30",
        &token,
    )
    .await;
    let json = expect_status(response, StatusCode::OK).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn malformed_calendar_date_is_rejected(pool: PgPool) {
    let app = build_test_app(pool);
    let response = get_auth(&app.router, "/api/v1/calendar/11-06-2025", &app.admin_token()).await;
    let json = expect_status(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn bulk_upsert_skips_unlisted_weekdays(pool: PgPool) {
    let app = build_test_app(pool);

    // 2025-06-14 is a Saturday, 2025-06-16 a Monday.
    let response = post_json_auth(
        &app.router,
        "/api/v1/calendar/bulk",
        json!({
            "dates": ["2025-06-14", "2025-06-16"],
            "settings_by_weekday": [
                { "weekday": 1, "is_available": true, "deadline_time": "10:00:00", "note": null }
            ]
        }),
        &app.admin_token(),
    )
    .await;
    let json = expect_status(response, StatusCode::OK).await;
    assert_eq!(json["data"]["updated"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"]["skipped"], json!(["2025-06-14"]));
    assert!(json["data"]["failed"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn apply_month_uses_stored_weekday_defaults(pool: PgPool) {
    let app = build_test_app(pool);
    let token = app.admin_token();

    let response = get_auth(&app.router, "/api/v1/calendar/weekday-defaults", &token).await;
    let json = expect_status(response, StatusCode::OK).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 7);

    let response = post_json_auth(
        &app.router,
        "/api/v1/calendar/apply-month",
        json!({ "year": 2025, "month": 7 }),
        &token,
    )
    .await;
    let json = expect_status(response, StatusCode::OK).await;
    let updated = json["data"]["updated"].as_array().unwrap();
    assert_eq!(updated.len(), 31);
    let open = updated
        .iter()
        .filter(|day| day["is_available"] == true)
        .count();
    assert_eq!(open, 23);
}

// ---------------------------------------------------------------------------
// Prices
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn new_price_closes_open_record(pool: PgPool) {
    let app = build_test_app(pool);
    let token = app.admin_token();
    let item = app.menu_item("karaage").await;
    let prices_uri = format!("/api/v1/menu-items/{}/prices", item.id);

    let response = post_json_auth(
        &app.router,
        &prices_uri,
        json!({ "price": 500, "start_date": "2025-01-01" }),
        &token,
    )
    .await;
    expect_status(response, StatusCode::CREATED).await;

    let response = post_json_auth(
        &app.router,
        &prices_uri,
        json!({ "price": 550, "start_date": "2025-04-01" }),
        &token,
    )
    .await;
    expect_status(response, StatusCode::CREATED).await;

    let response = get_auth(
        &app.router,
        &format!("/api/v1/menu-items/{}/price?date=2025-03-31", item.id),
        &token,
    )
    .await;
    let json = expect_status(response, StatusCode::OK).await;
    assert_eq!(json["data"]["price"], 500);
    assert_eq!(json["data"]["end_date"], "2025-03-31");

    let response = get_auth(
        &app.router,
        &format!("/api/v1/menu-items/{}/price?date=2025-04-01", item.id),
        &token,
    )
    .await;
    let json = expect_status(response, StatusCode::OK).await;
    assert_eq!(json["data"]["price"], 550);

    let response = get_auth(&app.router, &prices_uri, &token).await;
    let json = expect_status(response, StatusCode::OK).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn overlapping_price_is_a_conflict(pool: PgPool) {
    let app = build_test_app(pool);
    let token = app.admin_token();
    let item = app.menu_item("karaage").await;
    let prices_uri = format!("/api/v1/menu-items/{}/prices", item.id);

    post_json_auth(
        &app.router,
        &prices_uri,
        json!({ "price": 500, "start_date": "2025-01-01", "end_date": "2025-03-31" }),
        &token,
    )
    .await;

    let response = post_json_auth(
        &app.router,
        &prices_uri,
        json!({ "price": 520, "start_date": "2025-03-15", "end_date": "2025-03-20" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = get_auth(
        &app.router,
        &format!("/api/v1/menu-items/{}/price?date=2025-05-01", item.id),
        &token,
    )
    .await;
    let json = expect_status(response, StatusCode::UNPROCESSABLE_ENTITY).await;
    assert_eq!(json["code"], "NOT_AVAILABLE");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn price_edit_reprices_record(pool: PgPool) {
    let app = build_test_app(pool);
    let token = app.admin_token();
    let item = app.menu_item("karaage").await;

    let created = body_json(
        post_json_auth(
            &app.router,
            &format!("/api/v1/menu-items/{}/prices", item.id),
            json!({ "price": 500, "start_date": "2025-01-01" }),
            &token,
        )
        .await,
    )
    .await;
    let record_id = created["data"]["id"].as_i64().unwrap();

    let response = put_json(
        &app.router,
        &format!("/api/v1/prices/{record_id}"),
        json!({ "price": 480, "start_date": "2025-01-01" }),
        &token,
    )
    .await;
    let json = expect_status(response, StatusCode::OK).await;
    assert_eq!(json["data"]["price"], 480);
}

// ---------------------------------------------------------------------------
// Settings and closing periods
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn settings_update_moves_closing_periods(pool: PgPool) {
    let app = build_test_app(pool);
    let admin = app.admin_token();
    let user = app.user("aki").await;
    let user_token = app.token_for(user.id);

    let response = get_auth(&app.router, "/api/v1/settings", &user_token).await;
    let json = expect_status(response, StatusCode::OK).await;
    assert_eq!(json["data"]["max_days_ahead"], 30);
    assert!(json["data"]["closing_day"].is_null());

    let response = get_auth(&app.router, "/api/v1/closing-periods/current", &user_token).await;
    let json = expect_status(response, StatusCode::OK).await;
    assert_eq!(json["data"]["label"], "2025-06");
    assert_eq!(json["data"]["start_date"], "2025-06-01");
    assert_eq!(json["data"]["end_date"], "2025-06-30");

    let body = json!({ "max_days_ahead": 14, "closing_day": 25 });
    let response = put_json(&app.router, "/api/v1/settings", body.clone(), &user_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let response = put_json(&app.router, "/api/v1/settings", body, &admin).await;
    expect_status(response, StatusCode::OK).await;

    let response = get_auth(&app.router, "/api/v1/closing-periods/current", &user_token).await;
    let json = expect_status(response, StatusCode::OK).await;
    assert_eq!(json["data"]["start_date"], "2025-05-26");
    assert_eq!(json["data"]["end_date"], "2025-06-25");

    let response = get_auth(&app.router, "/api/v1/closing-periods?months_back=2", &user_token).await;
    let json = expect_status(response, StatusCode::OK).await;
    let labels: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["label"].as_str().unwrap())
        .collect();
    assert_eq!(labels, ["2025-07", "2025-06", "2025-05", "2025-04"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_settings_are_rejected(pool: PgPool) {
    let app = build_test_app(pool);
    let response = put_json(
        &app.router,
        "/api/v1/settings",
        json!({ "max_days_ahead": 30, "closing_day": 32 }),
        &app.admin_token(),
    )
    .await;
    let json = expect_status(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}
