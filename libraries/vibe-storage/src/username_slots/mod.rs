//! Username slot persistence
//!
//! Slot capacity, active selection, and the alias list are partitioned per
//! user id in proper keyed tables. The capacity row is intentionally separate
//! from the alias rows: buying a slot is a local capacity change, not an
//! alias-list change.

use sqlx::{Row, SqlitePool};
use vibe_core::types::{ExtraUsername, UserId, UsernameId, UsernameSlots};

use crate::error::StorageError;

type Result<T> = std::result::Result<T, StorageError>;

/// Load the slot record for a user, creating the in-memory default when no
/// rows exist yet (lazy per-user initialization)
pub async fn get(pool: &SqlitePool, user_id: &UserId) -> Result<UsernameSlots> {
    let slot_row = sqlx::query(
        "SELECT max_slots, active_alias_id FROM username_slots WHERE user_id = ?",
    )
    .bind(user_id.as_str())
    .fetch_optional(pool)
    .await?;

    let (max_slots, active) = match slot_row {
        Some(row) => (
            row.get::<i64, _>("max_slots").max(1) as u32,
            row.get::<Option<String>, _>("active_alias_id")
                .map(UsernameId::new),
        ),
        None => (1, None),
    };

    let alias_rows = sqlx::query(
        "SELECT id, username, created_at, is_active
         FROM username_aliases WHERE user_id = ? ORDER BY position",
    )
    .bind(user_id.as_str())
    .fetch_all(pool)
    .await?;

    let extras = alias_rows
        .iter()
        .map(|row| {
            Ok(ExtraUsername {
                id: UsernameId::new(row.get::<String, _>("id")),
                username: row.get("username"),
                created_at: chrono::DateTime::from_timestamp(row.get::<i64, _>("created_at"), 0)
                    .ok_or_else(|| StorageError::SerializationError("Invalid timestamp".into()))?,
                is_active: row.get::<i64, _>("is_active") != 0,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(UsernameSlots {
        user_id: user_id.clone(),
        max_slots,
        extras,
        active,
    })
}

/// Persist the whole slot record for a user
///
/// Replaces the alias rows and upserts the capacity row in one transaction.
pub async fn save(pool: &SqlitePool, slots: &UsernameSlots) -> Result<()> {
    let now = chrono::Utc::now().timestamp();
    let mut tx = pool.begin().await?;

    sqlx::query(
        "INSERT INTO username_slots (user_id, max_slots, active_alias_id, updated_at)
         VALUES (?, ?, ?, ?)
         ON CONFLICT(user_id) DO UPDATE SET
            max_slots = excluded.max_slots,
            active_alias_id = excluded.active_alias_id,
            updated_at = excluded.updated_at",
    )
    .bind(slots.user_id.as_str())
    .bind(i64::from(slots.max_slots))
    .bind(slots.active.as_ref().map(UsernameId::as_str))
    .bind(now)
    .execute(&mut *tx)
    .await?;

    sqlx::query("DELETE FROM username_aliases WHERE user_id = ?")
        .bind(slots.user_id.as_str())
        .execute(&mut *tx)
        .await?;

    for (position, alias) in slots.extras.iter().enumerate() {
        sqlx::query(
            "INSERT INTO username_aliases (id, user_id, username, created_at, is_active, position)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(alias.id.as_str())
        .bind(slots.user_id.as_str())
        .bind(&alias.username)
        .bind(alias.created_at.timestamp())
        .bind(i64::from(alias.is_active))
        .bind(position as i64)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

/// Update only the purchased slot capacity for a user
pub async fn set_max_slots(pool: &SqlitePool, user_id: &UserId, max_slots: u32) -> Result<()> {
    let now = chrono::Utc::now().timestamp();

    sqlx::query(
        "INSERT INTO username_slots (user_id, max_slots, updated_at)
         VALUES (?, ?, ?)
         ON CONFLICT(user_id) DO UPDATE SET
            max_slots = excluded.max_slots,
            updated_at = excluded.updated_at",
    )
    .bind(user_id.as_str())
    .bind(i64::from(max_slots))
    .bind(now)
    .execute(pool)
    .await?;

    Ok(())
}

/// Delete all slot state for a user
pub async fn delete(pool: &SqlitePool, user_id: &UserId) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM username_aliases WHERE user_id = ?")
        .bind(user_id.as_str())
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM username_slots WHERE user_id = ?")
        .bind(user_id.as_str())
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}
