#![allow(dead_code)]

//! Shared fixtures for engine integration tests.
//!
//! The clock is pinned in Asia/Tokyo and can be moved by each test.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use chrono_tz::Tz;
use sqlx::PgPool;
use bento_core::clock::{BusinessClock, FixedClock};
use bento_core::principal::ActingPrincipal;
use bento_core::types::{DbId, Money};
use bento_db::models::calendar::UpsertCalendarDay;
use bento_db::models::menu::{CreateMenuItem, CreateVendor, MenuItem};
use bento_db::models::price::{PriceRecord, PriceRecordInput};
use bento_db::models::user::{CreateUser, User};
use bento_db::repositories::{MenuItemRepo, UserRepo};
use bento_engine::{Engine, EngineContext};
use bento_events::NullAuditSink;

pub const TZ: Tz = chrono_tz::Asia::Tokyo;

pub const ADMIN: ActingPrincipal = ActingPrincipal {
    actor_id: Some(999_999),
    is_admin: true,
};

pub struct Harness {
    pub pool: PgPool,
    pub engine: Engine,
    pub clock: Arc<FixedClock>,
}

impl Harness {
    pub fn new(pool: PgPool, today: NaiveDate, time: NaiveTime) -> Self {
        let clock = Arc::new(FixedClock::at_local(TZ, today, time));
        let ctx = EngineContext::new(
            pool.clone(),
            BusinessClock::new(clock.clone(), TZ),
            Arc::new(NullAuditSink),
        );
        Self {
            pool,
            engine: Engine::new(ctx, 4),
            clock,
        }
    }

    pub fn set_now(&self, date: NaiveDate, time: NaiveTime) {
        self.clock.set_local(TZ, date, time);
    }

    pub async fn open_day(&self, date: NaiveDate, deadline: Option<NaiveTime>) {
        self.engine
            .calendar
            .upsert_day(
                &ADMIN,
                date,
                &UpsertCalendarDay {
                    is_available: true,
                    deadline_time: deadline,
                    note: None,
                },
            )
            .await
            .unwrap();
    }

    pub async fn close_day(&self, date: NaiveDate) {
        self.engine
            .calendar
            .upsert_day(
                &ADMIN,
                date,
                &UpsertCalendarDay {
                    is_available: false,
                    deadline_time: None,
                    note: Some("closed".into()),
                },
            )
            .await
            .unwrap();
    }

    pub async fn price(
        &self,
        menu_item_id: DbId,
        price: Money,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
    ) -> PriceRecord {
        self.engine
            .prices
            .create(
                &ADMIN,
                menu_item_id,
                &PriceRecordInput {
                    price,
                    start_date,
                    end_date,
                },
            )
            .await
            .unwrap()
    }

    pub async fn user(&self, name: &str) -> User {
        self.user_with(name, None).await
    }

    pub async fn user_with(&self, name: &str, left_date: Option<NaiveDate>) -> User {
        UserRepo::create(
            &self.pool,
            &CreateUser {
                name: name.to_string(),
                email: format!("{name}@example.com"),
                role: None,
                left_date,
                auto_order_enabled: true,
            },
        )
        .await
        .unwrap()
    }

    /// A menu item with no price records.
    pub async fn unpriced_item(&self, name: &str) -> MenuItem {
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

    /// A menu item priced at `price` from 2025-01-01 onward.
    pub async fn priced_item(&self, name: &str, price: Money) -> MenuItem {
        let item = self.unpriced_item(name).await;
        self.price(item.id, price, date(2025, 1, 1), None).await;
        item
    }

    /// Live (`ordered`) orders a user holds on a date.
    pub async fn live_orders(&self, user_id: DbId, order_date: NaiveDate) -> i64 {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM orders WHERE user_id = $1 AND order_date = $2 AND status = 'ordered'",
        )
        .bind(user_id)
        .bind(order_date)
        .fetch_one(&self.pool)
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
