//! Read-only settlement queries over live orders.

use sqlx::PgPool;
use bento_core::ordering::STATUS_ORDERED;

use crate::models::report::{ReportFilter, ReportLine, ReportTotals};

/// Shared FROM/WHERE clause. Parameters: $1 start, $2 end, $3 vendor, $4 user, $5 status.
const REPORT_SCOPE: &str = "\
    FROM orders o
    JOIN users u ON u.id = o.user_id
    JOIN menu_items m ON m.id = o.menu_item_id
    JOIN vendors v ON v.id = m.vendor_id
    WHERE o.order_date BETWEEN $1 AND $2
      AND ($3::BIGINT IS NULL OR v.id = $3)
      AND ($4::BIGINT IS NULL OR o.user_id = $4)
      AND o.status = $5";

pub struct ReportRepo;

impl ReportRepo {
    pub async fn line_items(
        pool: &PgPool,
        filter: &ReportFilter,
    ) -> Result<Vec<ReportLine>, sqlx::Error> {
        let query = format!(
            "SELECT o.id AS order_id, o.order_date, o.user_id, u.name AS user_name,
                    v.id AS vendor_id, v.name AS vendor_name,
                    o.menu_item_id, m.name AS menu_item_name,
                    o.quantity, o.unit_price,
                    (o.quantity::BIGINT * o.unit_price) AS subtotal
             {REPORT_SCOPE}
             ORDER BY o.order_date, u.name, o.id"
        );
        sqlx::query_as::<_, ReportLine>(&query)
            .bind(filter.start_date)
            .bind(filter.end_date)
            .bind(filter.vendor_id)
            .bind(filter.user_id)
            .bind(STATUS_ORDERED)
            .fetch_all(pool)
            .await
    }

    pub async fn totals(pool: &PgPool, filter: &ReportFilter) -> Result<ReportTotals, sqlx::Error> {
        let query = format!(
            "SELECT COUNT(*) AS order_count,
                    COALESCE(SUM(o.quantity), 0)::BIGINT AS total_quantity,
                    COALESCE(SUM(o.quantity::BIGINT * o.unit_price), 0)::BIGINT AS total_amount
             {REPORT_SCOPE}"
        );
        sqlx::query_as::<_, ReportTotals>(&query)
            .bind(filter.start_date)
            .bind(filter.end_date)
            .bind(filter.vendor_id)
            .bind(filter.user_id)
            .bind(STATUS_ORDERED)
            .fetch_one(pool)
            .await
    }
}
