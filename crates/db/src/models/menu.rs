//! Vendor and menu item rows.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use bento_core::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Vendors
// ---------------------------------------------------------------------------

/// A row from the `vendors` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Vendor {
    pub id: DbId,
    pub name: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateVendor {
    pub name: String,
}

// ---------------------------------------------------------------------------
// Menu items
// ---------------------------------------------------------------------------

/// A row from the `menu_items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MenuItem {
    pub id: DbId,
    pub vendor_id: DbId,
    pub name: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateMenuItem {
    pub vendor_id: DbId,
    pub name: String,
}
