//! Price ledger: time-ranged prices per menu item.
//!
//! Writers lock the menu item row, plan against the item's other records
//! with [`plan_price_write`], apply the auto-close, and write, all in one
//! transaction.

use chrono::NaiveDate;
use serde_json::json;
use bento_core::audit::{actions, tables};
use bento_core::error::CoreError;
use bento_core::pricing::{plan_price_write, price_not_found, validate_price_fields, PriceSpan};
use bento_core::principal::ActingPrincipal;
use bento_core::types::DbId;
use bento_db::models::price::{PriceRecord, PriceRecordInput};
use bento_db::repositories::{MenuItemRepo, PriceRecordRepo};
use sqlx::PgConnection;

use crate::context::EngineContext;
use crate::error::{map_unique, EngineResult};

const UQ_PRICE_RECORDS_OPEN: &str = "uq_price_records_open";

#[derive(Clone)]
pub struct PriceLedger {
    ctx: EngineContext,
}

impl PriceLedger {
    pub fn new(ctx: EngineContext) -> Self {
        Self { ctx }
    }

    /// The record in force for `menu_item_id` on `date`.
    pub async fn resolve_price(&self, menu_item_id: DbId, date: NaiveDate) -> EngineResult<PriceRecord> {
        let mut conn = self.ctx.pool.acquire().await?;
        resolve_in(&mut conn, menu_item_id, date).await
    }

    pub async fn list(&self, menu_item_id: DbId) -> EngineResult<Vec<PriceRecord>> {
        if MenuItemRepo::find_by_id(&self.ctx.pool, menu_item_id).await?.is_none() {
            return Err(CoreError::NotFound {
                entity: "MenuItem",
                id: menu_item_id,
            }
            .into());
        }
        Ok(PriceRecordRepo::list_for_item(&self.ctx.pool, menu_item_id).await?)
    }

    pub async fn create(
        &self,
        principal: &ActingPrincipal,
        menu_item_id: DbId,
        input: &PriceRecordInput,
    ) -> EngineResult<PriceRecord> {
        principal.require_admin()?;
        validate_price_fields(input.price, input.start_date, input.end_date)?;

        let mut tx = self.ctx.pool.begin().await?;
        lock_item(&mut tx, menu_item_id).await?;

        let existing = spans_for_item(&mut tx, menu_item_id).await?;
        let plan = plan_price_write(&existing, None, input.start_date, input.end_date)?;
        if let Some((open_id, end)) = plan.close_open {
            PriceRecordRepo::close(&mut *tx, open_id, end).await?;
        }

        let record = PriceRecordRepo::insert(
            &mut *tx,
            menu_item_id,
            input.price,
            input.start_date,
            input.end_date,
        )
        .await
        .map_err(|e| map_unique(e, open_record_conflict))?;
        tx.commit().await?;

        self.audit_auto_close(principal, plan.close_open, record.id);
        self.ctx.audit(
            principal,
            actions::PRICE_CREATE,
            tables::PRICE_RECORDS,
            Some(record.id),
            json!({
                "menu_item_id": menu_item_id,
                "price": record.price,
                "start_date": record.start_date,
                "end_date": record.end_date,
            }),
        );
        tracing::info!(
            price_record_id = record.id,
            menu_item_id,
            price = record.price,
            "Price record created"
        );
        Ok(record)
    }

    /// Replace a record's price and interval, re-applying the overlap rule
    /// against the item's other records.
    pub async fn update(
        &self,
        principal: &ActingPrincipal,
        price_record_id: DbId,
        input: &PriceRecordInput,
    ) -> EngineResult<PriceRecord> {
        principal.require_admin()?;
        validate_price_fields(input.price, input.start_date, input.end_date)?;

        let mut tx = self.ctx.pool.begin().await?;
        let current = PriceRecordRepo::find_by_id(&mut *tx, price_record_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "PriceRecord",
                id: price_record_id,
            })?;
        lock_item(&mut tx, current.menu_item_id).await?;

        let existing = spans_for_item(&mut tx, current.menu_item_id).await?;
        let plan = plan_price_write(
            &existing,
            Some(price_record_id),
            input.start_date,
            input.end_date,
        )?;
        if let Some((open_id, end)) = plan.close_open {
            PriceRecordRepo::close(&mut *tx, open_id, end).await?;
        }

        let record = PriceRecordRepo::update(
            &mut *tx,
            price_record_id,
            input.price,
            input.start_date,
            input.end_date,
        )
        .await
        .map_err(|e| map_unique(e, open_record_conflict))?;
        tx.commit().await?;

        self.audit_auto_close(principal, plan.close_open, record.id);
        self.ctx.audit(
            principal,
            actions::PRICE_UPDATE,
            tables::PRICE_RECORDS,
            Some(record.id),
            json!({
                "before": {
                    "price": current.price,
                    "start_date": current.start_date,
                    "end_date": current.end_date,
                },
                "after": {
                    "price": record.price,
                    "start_date": record.start_date,
                    "end_date": record.end_date,
                },
            }),
        );
        Ok(record)
    }

    fn audit_auto_close(
        &self,
        principal: &ActingPrincipal,
        closed: Option<(DbId, NaiveDate)>,
        triggered_by: DbId,
    ) {
        if let Some((closed_id, end_date)) = closed {
            tracing::info!(closed_id, %end_date, "Open price record auto-closed");
            self.ctx.audit(
                principal,
                actions::PRICE_AUTO_CLOSE,
                tables::PRICE_RECORDS,
                Some(closed_id),
                json!({ "end_date": end_date, "triggered_by": triggered_by }),
            );
        }
    }
}

/// Resolve a price on an existing connection or transaction.
pub(crate) async fn resolve_in(
    conn: &mut PgConnection,
    menu_item_id: DbId,
    date: NaiveDate,
) -> EngineResult<PriceRecord> {
    PriceRecordRepo::find_for_date(conn, menu_item_id, date)
        .await?
        .ok_or_else(|| price_not_found(menu_item_id, date).into())
}

async fn lock_item(conn: &mut PgConnection, menu_item_id: DbId) -> EngineResult<()> {
    MenuItemRepo::lock_for_update(conn, menu_item_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "MenuItem",
            id: menu_item_id,
        })?;
    Ok(())
}

async fn spans_for_item(conn: &mut PgConnection, menu_item_id: DbId) -> EngineResult<Vec<PriceSpan>> {
    Ok(PriceRecordRepo::list_for_item(conn, menu_item_id)
        .await?
        .iter()
        .map(PriceRecord::span)
        .collect())
}

fn open_record_conflict(constraint: &str) -> Option<CoreError> {
    (constraint == UQ_PRICE_RECORDS_OPEN).then(|| {
        CoreError::Conflict(
            "OverlappingPriceRange: another open-ended price record was written concurrently"
                .into(),
        )
    })
}
