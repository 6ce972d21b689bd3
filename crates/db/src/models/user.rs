//! User rows. Accounts are provisioned by the identity provider; this service
//! reads them and flips `is_active` once a `left_date` has passed.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use bento_core::types::{DbId, Timestamp};

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub role: String,
    pub is_active: bool,
    pub left_date: Option<NaiveDate>,
    pub auto_order_enabled: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// Active and not past a recorded leaving date.
    pub fn can_receive_orders(&self, today: NaiveDate) -> bool {
        self.is_active && self.left_date.map_or(true, |left| left >= today)
    }
}

/// DTO for provisioning a user (seeding and tests).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub role: Option<String>,
    pub left_date: Option<NaiveDate>,
    #[serde(default)]
    pub auto_order_enabled: bool,
}
