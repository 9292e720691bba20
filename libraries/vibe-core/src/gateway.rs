//! Remote account gateway boundary
//!
//! The gateway is an opaque network collaborator exposing CRUD operations on
//! user records. It offers no retry or transaction semantics; partial-field
//! patches are whole-field last-write-wins.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{
    AccountRecord, ItemCategory, ItemId, RegisterData, ServerStats, SessionIdentity, UserId,
    UserPatch,
};

/// Remote persistence boundary for user account records
#[async_trait]
pub trait AccountGateway: Send + Sync {
    /// Fetch the authoritative record for a user, if it exists
    async fn get_user_by_id(&self, id: &UserId) -> Result<Option<AccountRecord>>;

    /// Authenticate and return the session identity plus snapshot
    async fn login(&self, identifier: &str, password: &str) -> Result<(SessionIdentity, AccountRecord)>;

    /// Create an account and return the session identity plus snapshot
    async fn register(&self, data: &RegisterData) -> Result<(SessionIdentity, AccountRecord)>;

    /// Apply a partial-field patch to a user record
    async fn update_user(&self, id: &UserId, patch: &UserPatch) -> Result<bool>;

    /// Convenience balance credit
    async fn add_coins(&self, id: &UserId, amount: u64) -> Result<bool>;

    /// Convenience guarded balance debit
    async fn spend_coins(&self, id: &UserId, amount: u64) -> Result<bool>;

    /// Append an item id to a per-category inventory array
    async fn add_to_inventory(&self, id: &UserId, category: ItemCategory, item: &ItemId) -> Result<bool>;

    // Admin surface

    /// Grant or revoke the admin flag
    async fn set_admin(&self, id: &UserId, admin: bool) -> Result<bool>;

    /// Grant the premium flag
    async fn set_premium(&self, id: &UserId) -> Result<bool>;

    /// Revoke the premium flag
    async fn remove_premium(&self, id: &UserId) -> Result<bool>;

    /// Delete a user record
    async fn delete_user(&self, id: &UserId) -> Result<bool>;

    /// Fetch all user records
    async fn get_all_users_full(&self) -> Result<Vec<AccountRecord>>;

    /// Fetch aggregate statistics
    async fn get_stats(&self) -> Result<ServerStats>;

    // Presence (advisory only, not a lock)

    /// Record a presence heartbeat
    async fn update_last_seen(&self, id: &UserId) -> Result<()>;

    /// Best-effort mark-offline on session end
    async fn set_offline(&self, id: &UserId) -> Result<()>;
}
