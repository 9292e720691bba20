//! Username slot store
//!
//! Manages the alias usernames a user may register and which one is active,
//! gated by purchasable slot capacity and a per-user rate limiter. Loaded
//! lazily per user from local persistence; the alias list is pushed to the
//! gateway best-effort, while slot capacity is a local-only value.

use std::sync::Arc;

use sqlx::SqlitePool;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use vibe_core::types::{
    is_valid_username, ExtraUsername, UserId, UsernameId, UsernameSlots, USERNAME_MAX_LEN,
    USERNAME_MIN_LEN,
};
use vibe_core::{Result, VibeError};

use crate::outbox::{SyncOp, SyncOutbox};
use crate::rate_limit::RateLimiter;

struct SlotState {
    slots: UsernameSlots,
    primary_username: String,
    limiter: RateLimiter,
}

/// Per-session alias state holder with local write-through persistence
pub struct UsernameSlotStore {
    pool: SqlitePool,
    outbox: Arc<SyncOutbox>,
    state: Mutex<Option<SlotState>>,
}

impl UsernameSlotStore {
    /// Create an unloaded store
    pub fn new(pool: SqlitePool, outbox: Arc<SyncOutbox>) -> Self {
        Self {
            pool,
            outbox,
            state: Mutex::new(None),
        }
    }

    /// Load the slot record for a user (lazy per-user initialization)
    ///
    /// `seed_extras` is the gateway's alias list from the login snapshot; it
    /// populates a device that has no local rows yet.
    pub async fn load(
        &self,
        user_id: &UserId,
        primary_username: &str,
        seed_extras: &[ExtraUsername],
    ) -> Result<()> {
        let mut slots = vibe_storage::username_slots::get(&self.pool, user_id).await?;

        if slots.extras.is_empty() && !seed_extras.is_empty() {
            slots.extras = seed_extras.to_vec();
            slots.active = slots.extras.iter().find(|e| e.is_active).map(|e| e.id.clone());
            // A fresh device starts at the default capacity; raise it so the
            // seeded aliases fit and the next slot is priced past them.
            slots.max_slots = slots.max_slots.max(slots.extras.len() as u32 + 1);
            vibe_storage::username_slots::save(&self.pool, &slots).await?;
            debug!(user_id = %user_id, count = slots.extras.len(), "Seeded aliases from account snapshot");
        }

        *self.state.lock().await = Some(SlotState {
            slots,
            primary_username: primary_username.to_string(),
            limiter: RateLimiter::username_creation(),
        });
        Ok(())
    }

    /// Clone of the current record, for UI consumption
    pub async fn snapshot(&self) -> Result<UsernameSlots> {
        let guard = self.state.lock().await;
        let state = guard.as_ref().ok_or(VibeError::NotAuthenticated)?;
        Ok(state.slots.clone())
    }

    /// Whether another alias fits in the purchased capacity
    pub async fn can_add_more(&self) -> Result<bool> {
        Ok(self.snapshot().await?.can_add_more())
    }

    /// Price of the next slot (doubles per slot already purchased)
    pub async fn next_slot_price(&self) -> Result<u64> {
        Ok(self.snapshot().await?.next_slot_price())
    }

    /// Register a new alias
    ///
    /// Checks, in order: the rate limiter, length, characters, case-insensitive
    /// uniqueness against the primary and existing aliases, and slot capacity.
    /// All failures leave the record untouched.
    pub async fn add_username(&self, candidate: &str) -> Result<ExtraUsername> {
        let mut guard = self.state.lock().await;
        let state = guard.as_mut().ok_or(VibeError::NotAuthenticated)?;

        if let Err(retry_after) = state.limiter.try_admit() {
            return Err(VibeError::RateLimited {
                retry_after_ms: retry_after.as_millis() as u64,
            });
        }

        if !(USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&candidate.len()) {
            return Err(VibeError::invalid_username(format!(
                "must be {USERNAME_MIN_LEN}-{USERNAME_MAX_LEN} characters"
            )));
        }
        if !is_valid_username(candidate) {
            return Err(VibeError::invalid_username(
                "only letters, digits and underscores are allowed",
            ));
        }

        let lowered = candidate.to_lowercase();
        if lowered == state.primary_username.to_lowercase() || state.slots.contains_alias(candidate)
        {
            return Err(VibeError::UsernameTaken(lowered));
        }

        if !state.slots.can_add_more() {
            return Err(VibeError::NoSlots);
        }

        let entry = ExtraUsername::new(candidate);
        state.slots.extras.push(entry.clone());

        vibe_storage::username_slots::save(&self.pool, &state.slots).await?;
        self.sync(&state.slots);
        info!(username = %entry.username, "Registered alias");
        Ok(entry)
    }

    /// Remove an alias
    ///
    /// If it was the active one, the primary username becomes active again.
    pub async fn remove_username(&self, id: &UsernameId) -> Result<()> {
        let mut guard = self.state.lock().await;
        let state = guard.as_mut().ok_or(VibeError::NotAuthenticated)?;

        let before = state.slots.extras.len();
        state.slots.extras.retain(|e| &e.id != id);
        if state.slots.extras.len() == before {
            return Err(VibeError::not_found("Alias", id.as_str()));
        }

        if state.slots.active.as_ref() == Some(id) {
            state.slots.active = None;
        }

        vibe_storage::username_slots::save(&self.pool, &state.slots).await?;
        self.sync(&state.slots);
        Ok(())
    }

    /// Select the active alias, or `None` to activate the primary username
    ///
    /// Re-asserts the exactly-one-active invariant across all entries.
    /// Local-only; not pushed to the gateway.
    pub async fn set_active(&self, id: Option<UsernameId>) -> Result<()> {
        let mut guard = self.state.lock().await;
        let state = guard.as_mut().ok_or(VibeError::NotAuthenticated)?;

        if let Some(ref target) = id {
            if !state.slots.extras.iter().any(|e| &e.id == target) {
                return Err(VibeError::not_found("Alias", target.as_str()));
            }
        }

        state.slots.active = id;
        for entry in &mut state.slots.extras {
            entry.is_active = state.slots.active.as_ref() == Some(&entry.id);
        }

        vibe_storage::username_slots::save(&self.pool, &state.slots).await?;
        Ok(())
    }

    /// Grant one more slot
    ///
    /// Persisted locally keyed by user id; intentionally separate from the
    /// cloud alias-list sync. Returns the new capacity.
    pub async fn increment_max_slots(&self) -> Result<u32> {
        let mut guard = self.state.lock().await;
        let state = guard.as_mut().ok_or(VibeError::NotAuthenticated)?;

        state.slots.max_slots += 1;
        vibe_storage::username_slots::set_max_slots(
            &self.pool,
            &state.slots.user_id,
            state.slots.max_slots,
        )
        .await?;
        Ok(state.slots.max_slots)
    }

    /// Drop the in-memory record on logout
    ///
    /// Registered users keep their rows on disk, so purchased slots survive
    /// re-login. Guest ids are never reused, so their rows are deleted.
    pub async fn clear(&self) {
        let state = self.state.lock().await.take();
        if let Some(state) = state {
            if state.slots.user_id.is_guest() {
                if let Err(e) =
                    vibe_storage::username_slots::delete(&self.pool, &state.slots.user_id).await
                {
                    warn!(user_id = %state.slots.user_id, error = %e, "Failed to delete guest slots");
                }
            }
        }
    }

    fn sync(&self, slots: &UsernameSlots) {
        if !slots.user_id.is_guest() {
            self.outbox
                .enqueue(slots.user_id.clone(), SyncOp::SetExtraUsernames(slots.extras.clone()));
        }
    }
}
