//! Economy snapshot persistence
//!
//! The economy store writes its whole record here after every mutation so a
//! reload restores the optimistic local state, keyed per user id.

use sqlx::{Row, SqlitePool};
use vibe_core::types::{EconomyRecord, UserId};

use crate::error::StorageError;

type Result<T> = std::result::Result<T, StorageError>;

/// Load the economy snapshot for a user, if one exists
pub async fn get(pool: &SqlitePool, user_id: &UserId) -> Result<Option<EconomyRecord>> {
    let row = sqlx::query(
        "SELECT coins, owned_json, equipped_json, profile_json, is_guest
         FROM economy_snapshots WHERE user_id = ?",
    )
    .bind(user_id.as_str())
    .fetch_optional(pool)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let owned = serde_json::from_str(&row.get::<String, _>("owned_json"))
        .map_err(|e| StorageError::SerializationError(e.to_string()))?;
    let equipped = serde_json::from_str(&row.get::<String, _>("equipped_json"))
        .map_err(|e| StorageError::SerializationError(e.to_string()))?;
    let profile = serde_json::from_str(&row.get::<String, _>("profile_json"))
        .map_err(|e| StorageError::SerializationError(e.to_string()))?;

    Ok(Some(EconomyRecord {
        user_id: user_id.clone(),
        coins: row.get::<i64, _>("coins").max(0) as u64,
        owned,
        equipped,
        profile,
        guest: row.get::<i64, _>("is_guest") != 0,
    }))
}

/// Create or replace the economy snapshot for a user
pub async fn upsert(pool: &SqlitePool, record: &EconomyRecord) -> Result<()> {
    let owned_json = serde_json::to_string(&record.owned)
        .map_err(|e| StorageError::SerializationError(e.to_string()))?;
    let equipped_json = serde_json::to_string(&record.equipped)
        .map_err(|e| StorageError::SerializationError(e.to_string()))?;
    let profile_json = serde_json::to_string(&record.profile)
        .map_err(|e| StorageError::SerializationError(e.to_string()))?;
    let now = chrono::Utc::now().timestamp();

    sqlx::query(
        "INSERT INTO economy_snapshots
         (user_id, coins, owned_json, equipped_json, profile_json, is_guest, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?)
         ON CONFLICT(user_id) DO UPDATE SET
            coins = excluded.coins,
            owned_json = excluded.owned_json,
            equipped_json = excluded.equipped_json,
            profile_json = excluded.profile_json,
            is_guest = excluded.is_guest,
            updated_at = excluded.updated_at",
    )
    .bind(record.user_id.as_str())
    .bind(record.coins as i64)
    .bind(owned_json)
    .bind(equipped_json)
    .bind(profile_json)
    .bind(i64::from(record.guest))
    .bind(now)
    .execute(pool)
    .await?;

    Ok(())
}

/// Delete the economy snapshot for a user
///
/// Returns `true` if a snapshot was deleted.
pub async fn delete(pool: &SqlitePool, user_id: &UserId) -> Result<bool> {
    let result = sqlx::query("DELETE FROM economy_snapshots WHERE user_id = ?")
        .bind(user_id.as_str())
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
