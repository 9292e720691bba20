//! Best-effort sync outbox
//!
//! Every optimistic local mutation enqueues a `SyncOp` here instead of firing
//! a bare network call. A single worker drains the queue in FIFO order and
//! delivers each op to the gateway with bounded retry and exponential
//! backoff. Callers never block on delivery, and a final failure is logged
//! and dropped without rolling back local state.
//!
//! The single worker also means ops issued by this client reach the gateway
//! in the order they were applied locally.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use vibe_core::types::{EquipSlot, ExtraUsername, ItemCategory, ItemId, UserId, UserPatch};
use vibe_core::{AccountGateway, Result};

/// Delivery attempts per op before it is dropped
const MAX_ATTEMPTS: u32 = 3;
/// Base backoff between attempts; doubles per retry
const BACKOFF_BASE: Duration = Duration::from_millis(500);

/// A pending remote mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOp {
    /// Overwrite the coin balance
    SetCoins(u64),
    /// Append an item to a per-category inventory array
    AddToInventory { category: ItemCategory, item: ItemId },
    /// Overwrite the equipped-slot map
    SetEquipped(BTreeMap<EquipSlot, ItemId>),
    /// Overwrite the alias list
    SetExtraUsernames(Vec<ExtraUsername>),
    /// Arbitrary partial-field patch
    Patch(UserPatch),
}

/// Handle to the outbox worker
pub struct SyncOutbox {
    tx: mpsc::UnboundedSender<(UserId, SyncOp)>,
    worker: JoinHandle<()>,
}

impl SyncOutbox {
    /// Spawn the worker draining ops to the given gateway
    pub fn spawn(gateway: Arc<dyn AccountGateway>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(run_worker(gateway, rx));
        Self { tx, worker }
    }

    /// Enqueue a sync op for a user; never blocks
    pub fn enqueue(&self, user_id: UserId, op: SyncOp) {
        if self.tx.send((user_id, op)).is_err() {
            debug!("Outbox worker stopped, dropping sync op");
        }
    }

    /// Stop the worker, dropping any queued ops
    pub fn abort(&self) {
        self.worker.abort();
    }
}

impl Drop for SyncOutbox {
    fn drop(&mut self) {
        self.worker.abort();
    }
}

async fn run_worker(
    gateway: Arc<dyn AccountGateway>,
    mut rx: mpsc::UnboundedReceiver<(UserId, SyncOp)>,
) {
    while let Some((user_id, op)) = rx.recv().await {
        let mut backoff = BACKOFF_BASE;

        for attempt in 1..=MAX_ATTEMPTS {
            match deliver(gateway.as_ref(), &user_id, &op).await {
                Ok(()) => break,
                Err(e) if attempt < MAX_ATTEMPTS => {
                    debug!(
                        user_id = %user_id,
                        attempt,
                        error = %e,
                        "Sync delivery failed, retrying"
                    );
                    tokio::time::sleep(backoff).await;
                    backoff *= 2;
                }
                Err(e) => {
                    // Local and remote state may now diverge until the next
                    // full refresh pulls corrected fields.
                    warn!(user_id = %user_id, op = ?op, error = %e, "Dropping sync op");
                }
            }
        }
    }
}

async fn deliver(gateway: &dyn AccountGateway, user_id: &UserId, op: &SyncOp) -> Result<()> {
    match op {
        SyncOp::SetCoins(coins) => {
            gateway.update_user(user_id, &UserPatch::coins(*coins)).await?;
        }
        SyncOp::AddToInventory { category, item } => {
            gateway.add_to_inventory(user_id, *category, item).await?;
        }
        SyncOp::SetEquipped(equipped) => {
            gateway
                .update_user(user_id, &UserPatch::equipped(equipped.clone()))
                .await?;
        }
        SyncOp::SetExtraUsernames(extras) => {
            gateway
                .update_user(user_id, &UserPatch::extra_usernames(extras.clone()))
                .await?;
        }
        SyncOp::Patch(patch) => {
            gateway.update_user(user_id, patch).await?;
        }
    }
    Ok(())
}
