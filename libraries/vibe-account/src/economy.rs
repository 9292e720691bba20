//! Economy store
//!
//! Single source of truth for the logged-in user's coin balance, inventory,
//! and equip state. Mutations are applied locally first (optimistic), written
//! through to the local snapshot table, then pushed to the gateway via the
//! sync outbox. Guest sessions skip the outbox entirely.

use std::sync::Arc;

use sqlx::SqlitePool;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use vibe_catalog::Catalog;
use vibe_core::types::{
    AccountRecord, EconomyRecord, EquipSlot, ItemId, ProfileImageKind, ProfileOverlay, UserId,
};
use vibe_core::{Result, VibeError};

use crate::outbox::{SyncOp, SyncOutbox};

/// In-memory economy state holder with local write-through persistence
pub struct EconomyStore {
    pool: SqlitePool,
    catalog: Arc<Catalog>,
    outbox: Arc<SyncOutbox>,
    state: RwLock<Option<EconomyRecord>>,
}

impl EconomyStore {
    /// Create an unauthenticated store
    pub fn new(pool: SqlitePool, catalog: Arc<Catalog>, outbox: Arc<SyncOutbox>) -> Self {
        Self {
            pool,
            catalog,
            outbox,
            state: RwLock::new(None),
        }
    }

    /// Whether a session record is loaded
    pub async fn is_active(&self) -> bool {
        self.state.read().await.is_some()
    }

    /// Current session user id, if any
    pub async fn user_id(&self) -> Option<UserId> {
        self.state.read().await.as_ref().map(|r| r.user_id.clone())
    }

    /// Clone of the current record, for UI consumption
    pub async fn snapshot(&self) -> Result<EconomyRecord> {
        self.state
            .read()
            .await
            .clone()
            .ok_or(VibeError::NotAuthenticated)
    }

    /// Current coin balance
    pub async fn coins(&self) -> Result<u64> {
        Ok(self.snapshot().await?.coins)
    }

    /// Replace the whole record with an authoritative gateway snapshot
    pub async fn apply_snapshot(&self, account: &AccountRecord) -> Result<()> {
        let user_id = UserId::new(account.id.clone());
        let record = EconomyRecord {
            coins: account.coins,
            owned: account.all_owned_ids().cloned().collect(),
            equipped: account.equipped.clone(),
            profile: account.profile_overlay(),
            guest: false,
            user_id,
        };

        vibe_storage::economy::upsert(&self.pool, &record).await?;
        *self.state.write().await = Some(record);
        Ok(())
    }

    /// Start a local-only guest session with the starter bundle
    pub async fn start_guest(&self) -> Result<EconomyRecord> {
        let mut record = EconomyRecord::new(
            UserId::generate_guest(),
            EconomyRecord::GUEST_STARTING_COINS,
        );
        for item in self.catalog.starter_items() {
            record.owned.insert(item.id.clone());
        }

        vibe_storage::economy::upsert(&self.pool, &record).await?;
        info!(user_id = %record.user_id, "Started guest session");
        *self.state.write().await = Some(record.clone());
        Ok(record)
    }

    /// Restore a previously persisted snapshot (reload support)
    ///
    /// Returns `false` when no snapshot exists for the user.
    pub async fn resume(&self, user_id: &UserId) -> Result<bool> {
        match vibe_storage::economy::get(&self.pool, user_id).await? {
            Some(record) => {
                *self.state.write().await = Some(record);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Add coins to the balance
    ///
    /// Returns the new balance. Also used as the refund half of compensating
    /// sequences; it never fails on amount.
    pub async fn credit(&self, amount: u64) -> Result<u64> {
        let mut guard = self.state.write().await;
        let record = guard.as_mut().ok_or(VibeError::NotAuthenticated)?;

        record.coins = record.coins.saturating_add(amount);
        let coins = record.coins;

        vibe_storage::economy::upsert(&self.pool, record).await?;
        self.sync(record, SyncOp::SetCoins(coins));
        Ok(coins)
    }

    /// Remove coins from the balance, guarded by a sufficient-funds check
    ///
    /// Fails with `InsufficientFunds` and leaves the balance unchanged when
    /// `amount` exceeds it. Returns the new balance on success.
    pub async fn debit(&self, amount: u64) -> Result<u64> {
        let mut guard = self.state.write().await;
        let record = guard.as_mut().ok_or(VibeError::NotAuthenticated)?;

        if record.coins < amount {
            return Err(VibeError::InsufficientFunds {
                needed: amount,
                available: record.coins,
            });
        }

        record.coins -= amount;
        let coins = record.coins;

        vibe_storage::economy::upsert(&self.pool, record).await?;
        self.sync(record, SyncOp::SetCoins(coins));
        Ok(coins)
    }

    /// Purchase a catalog item
    ///
    /// Fails with `AlreadyOwned` for owned ids and `InsufficientFunds` when
    /// the price exceeds the balance; both leave the record untouched.
    /// Buying a pack grants the pack id and every resolvable member id in the
    /// same local mutation, at the pack's listed (discounted) price.
    pub async fn purchase_item(&self, item_id: &ItemId) -> Result<()> {
        let item = self
            .catalog
            .get(item_id)
            .ok_or_else(|| VibeError::not_found("Catalog item", item_id.as_str()))?;

        let mut guard = self.state.write().await;
        let record = guard.as_mut().ok_or(VibeError::NotAuthenticated)?;

        if record.owns(&item.id) {
            return Err(VibeError::AlreadyOwned(item.id.clone()));
        }
        if record.coins < item.price {
            return Err(VibeError::InsufficientFunds {
                needed: item.price,
                available: record.coins,
            });
        }

        record.coins -= item.price;

        let mut granted = vec![item];
        if item.pack.is_some() {
            for member in self.catalog.pack_items(&item.id) {
                if !record.owns(&member.id) {
                    granted.push(member);
                }
            }
        }
        for grant in &granted {
            record.owned.insert(grant.id.clone());
        }

        let coins = record.coins;
        debug!(
            item = %item.id,
            price = item.price,
            granted = granted.len(),
            balance = coins,
            "Purchased item"
        );

        vibe_storage::economy::upsert(&self.pool, record).await?;
        self.sync(record, SyncOp::SetCoins(coins));
        for grant in &granted {
            self.sync(
                record,
                SyncOp::AddToInventory {
                    category: grant.category,
                    item: grant.id.clone(),
                },
            );
        }
        Ok(())
    }

    /// Equip an item into a slot, or unequip with `None`
    ///
    /// Last write wins per slot. Ownership is not verified here; the UI only
    /// offers owned items.
    pub async fn equip(&self, slot: EquipSlot, item: Option<ItemId>) -> Result<()> {
        let mut guard = self.state.write().await;
        let record = guard.as_mut().ok_or(VibeError::NotAuthenticated)?;

        match item {
            Some(id) => {
                record.equipped.insert(slot, id);
            }
            None => {
                record.equipped.remove(&slot);
            }
        }

        vibe_storage::economy::upsert(&self.pool, record).await?;
        self.sync(record, SyncOp::SetEquipped(record.equipped.clone()));
        Ok(())
    }

    /// Set or clear an image-type profile field
    ///
    /// Setting an image requires the premium flag; the request is rejected
    /// before any mutation. Clearing is always allowed.
    pub async fn set_profile_image(
        &self,
        kind: ProfileImageKind,
        value: Option<String>,
    ) -> Result<()> {
        let mut guard = self.state.write().await;
        let record = guard.as_mut().ok_or(VibeError::NotAuthenticated)?;

        if value.is_some() && !record.profile.premium {
            return Err(VibeError::PremiumRequired);
        }

        let mut patch = vibe_core::types::UserPatch::default();
        match kind {
            ProfileImageKind::Banner => {
                record.profile.banner_image = value.clone();
                patch.banner_image = value;
            }
            ProfileImageKind::Background => {
                record.profile.background_image = value.clone();
                patch.background_image = value;
            }
            ProfileImageKind::MiniProfileBackground => {
                record.profile.mini_profile_background = value.clone();
                patch.mini_profile_background = value;
            }
        }

        vibe_storage::economy::upsert(&self.pool, record).await?;
        self.sync(record, SyncOp::Patch(patch));
        Ok(())
    }

    /// Overlay gateway-refreshed profile fields
    ///
    /// Deliberately leaves coins, inventory, and equipped state alone so an
    /// in-flight local purchase is never clobbered.
    pub async fn overlay_profile(&self, overlay: ProfileOverlay) -> Result<()> {
        let mut guard = self.state.write().await;
        let record = guard.as_mut().ok_or(VibeError::NotAuthenticated)?;

        record.profile = overlay;
        vibe_storage::economy::upsert(&self.pool, record).await?;
        Ok(())
    }

    /// Drop the in-memory record on logout
    ///
    /// Registered users keep their snapshot row on disk, partitioned by user
    /// id. Guest ids are never reused, so their rows are deleted instead of
    /// accumulating.
    pub async fn clear(&self) {
        let record = self.state.write().await.take();
        if let Some(record) = record {
            if record.guest {
                if let Err(e) = vibe_storage::economy::delete(&self.pool, &record.user_id).await {
                    warn!(user_id = %record.user_id, error = %e, "Failed to delete guest snapshot");
                }
            }
        }
    }

    fn sync(&self, record: &EconomyRecord, op: SyncOp) {
        if !record.guest {
            self.outbox.enqueue(record.user_id.clone(), op);
        }
    }
}
