//! Repository for the `users` table.

use chrono::NaiveDate;
use sqlx::{PgExecutor, PgPool};
use bento_core::roles::ROLE_USER;
use bento_core::types::DbId;

use crate::models::user::{CreateUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, email, role, is_active, left_date, \
                       auto_order_enabled, created_at, updated_at";

/// Provides read access and lifecycle updates for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (name, email, role, left_date, auto_order_enabled)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(input.role.as_deref().unwrap_or(ROLE_USER))
            .bind(input.left_date)
            .bind(input.auto_order_enabled)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id<'e>(
        db: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(db)
            .await
    }

    /// Lock a user row for the rest of the transaction.
    ///
    /// Serializes template writes for one user.
    pub async fn lock_for_update<'e>(
        db: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(db)
            .await
    }

    /// Active users that opted into automatic ordering.
    pub async fn list_auto_order_enabled(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users
             WHERE is_active = true AND auto_order_enabled = true
             ORDER BY id"
        );
        sqlx::query_as::<_, User>(&query).fetch_all(pool).await
    }

    /// Deactivate every active user whose `left_date` is before `today`.
    ///
    /// Returns the IDs that were flipped.
    pub async fn deactivate_departed(
        pool: &PgPool,
        today: NaiveDate,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "UPDATE users SET is_active = false
             WHERE is_active = true AND left_date IS NOT NULL AND left_date < $1
             RETURNING id",
        )
        .bind(today)
        .fetch_all(pool)
        .await
    }
}
