//! Integration tests for the repository layer against a real database.
//!
//! Covers the constraints the engine relies on:
//! - Partial unique index on live orders
//! - Single open price interval per menu item
//! - Idempotent run claiming
//! - Departed-user deactivation
//! - Report joins and totals

use chrono::{NaiveDate, NaiveTime};
use sqlx::PgPool;
use bento_core::calendar::WeekdayDefault;
use bento_core::ordering::{SOURCE_MANUAL, UQ_ORDERS_USER_DATE_ORDERED};
use bento_db::models::auto_order::{NewRunItem, RunCounts};
use bento_db::models::calendar::UpsertCalendarDay;
use bento_db::models::menu::{CreateMenuItem, CreateVendor, MenuItem};
use bento_db::models::order::{NewOrder, OrderFilter};
use bento_db::models::report::ReportFilter;
use bento_db::models::settings::UpdateOrderSettings;
use bento_db::models::user::{CreateUser, User};
use bento_db::repositories::{
    AutoOrderRunRepo, CalendarRepo, MenuItemRepo, OrderRepo, PriceRecordRepo, ReportRepo,
    SettingsRepo, UserRepo, WeekdayDefaultRepo,
};
use bento_db::unique_violation;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn seed_user(pool: &PgPool, name: &str) -> User {
    UserRepo::create(
        pool,
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

async fn seed_item(pool: &PgPool, vendor: &str, name: &str) -> MenuItem {
    let vendor = MenuItemRepo::create_vendor(
        pool,
        &CreateVendor {
            name: vendor.to_string(),
        },
    )
    .await
    .unwrap();
    MenuItemRepo::create(
        pool,
        &CreateMenuItem {
            vendor_id: vendor.id,
            name: name.to_string(),
        },
    )
    .await
    .unwrap()
}

fn new_order(user_id: i64, item_id: i64, price_record_id: i64, day: NaiveDate) -> NewOrder {
    NewOrder {
        user_id,
        menu_item_id: item_id,
        price_record_id,
        order_date: day,
        quantity: 1,
        unit_price: 500,
        source: SOURCE_MANUAL,
    }
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn second_live_order_same_day_violates_partial_index(pool: PgPool) {
    let user = seed_user(&pool, "aki").await;
    let a = seed_item(&pool, "Hanamaru", "Karaage").await;
    let b = seed_item(&pool, "Sakura", "Saba").await;
    let pa = PriceRecordRepo::insert(&pool, a.id, 500, date(2025, 1, 1), None).await.unwrap();
    let pb = PriceRecordRepo::insert(&pool, b.id, 600, date(2025, 1, 1), None).await.unwrap();
    let day = date(2025, 6, 10);

    OrderRepo::insert(&pool, &new_order(user.id, a.id, pa.id, day)).await.unwrap();
    let err = OrderRepo::insert(&pool, &new_order(user.id, b.id, pb.id, day))
        .await
        .unwrap_err();

    assert_eq!(unique_violation(&err), Some(UQ_ORDERS_USER_DATE_ORDERED));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn canceled_order_does_not_block_new_order(pool: PgPool) {
    let user = seed_user(&pool, "ren").await;
    let a = seed_item(&pool, "Hanamaru", "Karaage").await;
    let b = seed_item(&pool, "Sakura", "Saba").await;
    let pa = PriceRecordRepo::insert(&pool, a.id, 500, date(2025, 1, 1), None).await.unwrap();
    let pb = PriceRecordRepo::insert(&pool, b.id, 600, date(2025, 1, 1), None).await.unwrap();
    let day = date(2025, 6, 10);

    let first = OrderRepo::insert(&pool, &new_order(user.id, a.id, pa.id, day)).await.unwrap();
    assert!(OrderRepo::cancel(&pool, first.id).await.unwrap().is_some());
    // A second cancel is a no-op.
    assert!(OrderRepo::cancel(&pool, first.id).await.unwrap().is_none());

    let second = OrderRepo::insert(&pool, &new_order(user.id, b.id, pb.id, day)).await.unwrap();
    let live = OrderRepo::find_ordered_for_day(&pool, user.id, day).await.unwrap().unwrap();
    assert_eq!(live.id, second.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn stale_canceled_row_is_removed_before_reorder(pool: PgPool) {
    let user = seed_user(&pool, "mio").await;
    let a = seed_item(&pool, "Hanamaru", "Karaage").await;
    let pa = PriceRecordRepo::insert(&pool, a.id, 500, date(2025, 1, 1), None).await.unwrap();
    let day = date(2025, 6, 10);

    let first = OrderRepo::insert(&pool, &new_order(user.id, a.id, pa.id, day)).await.unwrap();
    OrderRepo::cancel(&pool, first.id).await.unwrap();

    let removed = OrderRepo::delete_stale_canceled(&pool, user.id, day, a.id).await.unwrap();
    assert_eq!(removed, 1);
    OrderRepo::insert(&pool, &new_order(user.id, a.id, pa.id, day)).await.unwrap();

    let listed = OrderRepo::list(
        &pool,
        &OrderFilter {
            user_id: Some(user.id),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].status, "ordered");
}

// ---------------------------------------------------------------------------
// Prices
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn only_one_open_price_record_per_item(pool: PgPool) {
    let item = seed_item(&pool, "Hanamaru", "Karaage").await;
    PriceRecordRepo::insert(&pool, item.id, 500, date(2025, 1, 1), None).await.unwrap();

    let err = PriceRecordRepo::insert(&pool, item.id, 550, date(2025, 4, 1), None)
        .await
        .unwrap_err();
    assert_eq!(unique_violation(&err), Some("uq_price_records_open"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn find_for_date_respects_interval_bounds(pool: PgPool) {
    let item = seed_item(&pool, "Hanamaru", "Karaage").await;
    let old = PriceRecordRepo::insert(&pool, item.id, 500, date(2025, 1, 1), None).await.unwrap();
    PriceRecordRepo::close(&pool, old.id, date(2025, 3, 31)).await.unwrap();
    let new = PriceRecordRepo::insert(&pool, item.id, 550, date(2025, 4, 1), None).await.unwrap();

    let march = PriceRecordRepo::find_for_date(&pool, item.id, date(2025, 3, 31)).await.unwrap();
    let april = PriceRecordRepo::find_for_date(&pool, item.id, date(2025, 4, 1)).await.unwrap();
    let before = PriceRecordRepo::find_for_date(&pool, item.id, date(2024, 12, 31)).await.unwrap();

    assert_eq!(march.map(|p| p.id), Some(old.id));
    assert_eq!(april.map(|p| p.id), Some(new.id));
    assert!(before.is_none());
}

// ---------------------------------------------------------------------------
// Calendar
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn calendar_upsert_overwrites(pool: PgPool) {
    let day = date(2025, 6, 10);
    let open = UpsertCalendarDay {
        is_available: true,
        deadline_time: NaiveTime::from_hms_opt(10, 0, 0),
        note: None,
    };
    CalendarRepo::upsert(&pool, day, &open, None).await.unwrap();

    let closed = UpsertCalendarDay {
        is_available: false,
        deadline_time: None,
        note: Some("Holiday".into()),
    };
    let row = CalendarRepo::upsert(&pool, day, &closed, None).await.unwrap();
    assert!(!row.is_available);
    assert_eq!(row.note.as_deref(), Some("Holiday"));

    let available = CalendarRepo::list_available_dates(&pool, day, day).await.unwrap();
    assert!(available.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn weekday_defaults_are_seeded_and_replaceable(pool: PgPool) {
    let seeded = WeekdayDefaultRepo::list(&pool).await.unwrap();
    assert_eq!(seeded.len(), 7);
    assert!(!seeded[0].is_available, "Sunday is closed by default");

    let replaced = WeekdayDefaultRepo::replace_all(
        &pool,
        &[WeekdayDefault {
            weekday: 3,
            is_available: true,
            deadline_time: NaiveTime::from_hms_opt(9, 30, 0),
            note: None,
        }],
    )
    .await
    .unwrap();
    assert_eq!(replaced.len(), 1);
    assert_eq!(WeekdayDefaultRepo::list(&pool).await.unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Runs
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn run_date_can_only_be_claimed_once(pool: PgPool) {
    let run_date = date(2025, 6, 10);
    let first = AutoOrderRunRepo::try_start(&pool, run_date, date(2025, 6, 11)).await.unwrap();
    let second = AutoOrderRunRepo::try_start(&pool, run_date, date(2025, 6, 11)).await.unwrap();
    assert!(first.is_some());
    assert!(second.is_none());

    let run = first.unwrap();
    let user = seed_user(&pool, "sora").await;
    AutoOrderRunRepo::add_item(
        &pool,
        &NewRunItem {
            run_id: run.id,
            user_id: user.id,
            result: "skipped",
            detail: "no template matched".into(),
            order_id: None,
        },
    )
    .await
    .unwrap();

    let done = AutoOrderRunRepo::complete(
        &pool,
        run.id,
        RunCounts {
            created: 0,
            skipped: 1,
            error: 0,
        },
    )
    .await
    .unwrap();
    assert_eq!(done.status, "completed");
    assert_eq!(done.skipped_count, 1);
    assert!(done.completed_at.is_some());
    assert_eq!(AutoOrderRunRepo::list_items(&pool, run.id).await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn release_frees_an_unfinished_claim_only(pool: PgPool) {
    let run_date = date(2025, 6, 10);
    let stuck = AutoOrderRunRepo::try_start(&pool, run_date, date(2025, 6, 11))
        .await
        .unwrap()
        .unwrap();
    let user = seed_user(&pool, "kai").await;
    AutoOrderRunRepo::add_item(
        &pool,
        &NewRunItem {
            run_id: stuck.id,
            user_id: user.id,
            result: "created",
            detail: "order created".into(),
            order_id: None,
        },
    )
    .await
    .unwrap();

    assert!(AutoOrderRunRepo::release(&pool, stuck.id).await.unwrap());
    assert!(AutoOrderRunRepo::list_items(&pool, stuck.id).await.unwrap().is_empty());

    let retry = AutoOrderRunRepo::try_start(&pool, run_date, date(2025, 6, 11))
        .await
        .unwrap()
        .unwrap();
    AutoOrderRunRepo::complete(&pool, retry.id, RunCounts::default()).await.unwrap();
    assert!(!AutoOrderRunRepo::release(&pool, retry.id).await.unwrap());
    assert!(AutoOrderRunRepo::find_by_id(&pool, retry.id).await.unwrap().is_some());
}

// ---------------------------------------------------------------------------
// Users & settings
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn departed_users_are_deactivated(pool: PgPool) {
    let staying = seed_user(&pool, "yui").await;
    let leaving = UserRepo::create(
        &pool,
        &CreateUser {
            name: "kai".into(),
            email: "kai@example.com".into(),
            role: None,
            left_date: Some(date(2025, 6, 9)),
            auto_order_enabled: true,
        },
    )
    .await
    .unwrap();

    let flipped = UserRepo::deactivate_departed(&pool, date(2025, 6, 10)).await.unwrap();
    assert_eq!(flipped, vec![leaving.id]);

    let enabled = UserRepo::list_auto_order_enabled(&pool).await.unwrap();
    assert_eq!(enabled.iter().map(|u| u.id).collect::<Vec<_>>(), vec![staying.id]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn settings_row_defaults_and_updates(pool: PgPool) {
    let settings = SettingsRepo::get(&pool).await.unwrap();
    assert_eq!(settings.max_days_ahead, 30);
    assert_eq!(settings.closing_day, None);

    let updated = SettingsRepo::update(
        &pool,
        &UpdateOrderSettings {
            max_days_ahead: 14,
            closing_day: Some(25),
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.max_days_ahead, 14);
    assert_eq!(updated.closing_day, Some(25));
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn report_excludes_canceled_and_sums_subtotals(pool: PgPool) {
    let user = seed_user(&pool, "nao").await;
    let item = seed_item(&pool, "Hanamaru", "Karaage").await;
    let price = PriceRecordRepo::insert(&pool, item.id, 500, date(2025, 1, 1), None).await.unwrap();

    let mut two = new_order(user.id, item.id, price.id, date(2025, 6, 10));
    two.quantity = 2;
    OrderRepo::insert(&pool, &two).await.unwrap();
    let dropped = OrderRepo::insert(&pool, &new_order(user.id, item.id, price.id, date(2025, 6, 11)))
        .await
        .unwrap();
    OrderRepo::cancel(&pool, dropped.id).await.unwrap();

    let filter = ReportFilter {
        start_date: date(2025, 6, 1),
        end_date: date(2025, 6, 30),
        vendor_id: None,
        user_id: None,
    };
    let lines = ReportRepo::line_items(&pool, &filter).await.unwrap();
    let totals = ReportRepo::totals(&pool, &filter).await.unwrap();

    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].subtotal, 1000);
    assert_eq!(lines[0].vendor_name, "Hanamaru");
    assert_eq!(totals.order_count, 1);
    assert_eq!(totals.total_quantity, 2);
    assert_eq!(totals.total_amount, 1000);
}
