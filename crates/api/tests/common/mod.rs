#![allow(dead_code)]

//! Shared helpers for API integration tests.
//!
//! The app runs the production router against a clock pinned to
//! 2025-06-10 09:00 Asia/Tokyo (a Tuesday).

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{NaiveDate, NaiveTime};
use chrono_tz::Tz;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

use bento_api::auth::jwt::{generate_access_token, JwtConfig};
use bento_api::config::ServerConfig;
use bento_api::router::build_app_router;
use bento_api::state::AppState;
use bento_core::clock::{BusinessClock, FixedClock};
use bento_core::roles::{ROLE_ADMIN, ROLE_USER};
use bento_core::types::DbId;
use bento_db::models::menu::{CreateMenuItem, CreateVendor, MenuItem};
use bento_db::models::user::{CreateUser, User};
use bento_db::repositories::{MenuItemRepo, UserRepo};
use bento_engine::{Engine, EngineContext};
use bento_events::EventBus;

pub const TZ: Tz = chrono_tz::Asia::Tokyo;

pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".into(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".into()],
        request_timeout_secs: 30,
        business_timezone: TZ,
        auto_order_concurrency: 2,
        jwt: JwtConfig {
            secret: "test-secret-key-for-integration-tests".into(),
            access_token_expiry_mins: 15,
        },
    }
}

pub struct TestApp {
    pub router: Router,
    pub pool: PgPool,
    pub clock: Arc<FixedClock>,
    pub config: ServerConfig,
}

pub fn build_test_app(pool: PgPool) -> TestApp {
    let config = test_config();
    let clock = Arc::new(FixedClock::at_local(TZ, date(2025, 6, 10), time(9, 0)));
    let event_bus = Arc::new(EventBus::default());
    let ctx = EngineContext::new(
        pool.clone(),
        BusinessClock::new(clock.clone(), TZ),
        event_bus,
    );
    let state = AppState {
        pool: pool.clone(),
        config: Arc::new(config.clone()),
        engine: Engine::new(ctx, config.auto_order_concurrency),
    };
    TestApp {
        router: build_app_router(state, &config),
        pool,
        clock,
        config,
    }
}

impl TestApp {
    pub fn admin_token(&self) -> String {
        generate_access_token(900_001, ROLE_ADMIN, &self.config.jwt).unwrap()
    }

    pub fn token_for(&self, user_id: DbId) -> String {
        generate_access_token(user_id, ROLE_USER, &self.config.jwt).unwrap()
    }

    pub async fn user(&self, name: &str) -> User {
        UserRepo::create(
            &self.pool,
            &CreateUser {
                name: name.to_string(),
                email: format!("{name}@example.com"),
                role: None,
                left_date: None,
                auto_order_enabled: true,
            },
        )
        .await
        .unwrap()
    }

    pub async fn menu_item(&self, name: &str) -> MenuItem {
        let vendor = MenuItemRepo::create_vendor(
            &self.pool,
            &CreateVendor {
                name: format!("{name} vendor"),
            },
        )
        .await
        .unwrap();
        MenuItemRepo::create(
            &self.pool,
            &CreateMenuItem {
                vendor_id: vendor.id,
                name: name.to_string(),
            },
        )
        .await
        .unwrap()
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> axum::response::Response {
    app.clone().oneshot(request).await.unwrap()
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

pub async fn get(app: &Router, uri: &str) -> axum::response::Response {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_auth(app: &Router, uri: &str, token: &str) -> axum::response::Response {
    let request = Request::builder()
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> axum::response::Response {
    send(app, json_request("POST", uri, None, &body)).await
}

pub async fn post_json_auth(
    app: &Router,
    uri: &str,
    body: Value,
    token: &str,
) -> axum::response::Response {
    send(app, json_request("POST", uri, Some(token), &body)).await
}

pub async fn put_json(
    app: &Router,
    uri: &str,
    body: Value,
    token: &str,
) -> axum::response::Response {
    send(app, json_request("PUT", uri, Some(token), &body)).await
}

pub async fn delete(app: &Router, uri: &str, token: &str) -> axum::response::Response {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn expect_status(response: axum::response::Response, status: StatusCode) -> Value {
    let actual = response.status();
    let body = body_json(response).await;
    assert_eq!(actual, status, "unexpected status, body: {body}");
    body
}
