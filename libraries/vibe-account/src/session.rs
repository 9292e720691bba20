//! Account session facade
//!
//! One `AccountSession` per running client. It owns the economy and username
//! stores (explicitly constructed, dependency-injected; no ambient globals),
//! the registration rate limiter, the sync outbox, and the presence
//! heartbeat.

use std::sync::Arc;
use std::time::Duration;

use sqlx::SqlitePool;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use vibe_catalog::Catalog;
use vibe_core::types::{RegisterData, SessionIdentity, UserId};
use vibe_core::{AccountGateway, Result, VibeError};

use crate::economy::EconomyStore;
use crate::outbox::SyncOutbox;
use crate::rate_limit::RateLimiter;
use crate::usernames::UsernameSlotStore;

/// Presence ping cadence while authenticated
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(120);

/// Session lifecycle and store container for one client
pub struct AccountSession {
    gateway: Arc<dyn AccountGateway>,
    economy: Arc<EconomyStore>,
    usernames: Arc<UsernameSlotStore>,
    register_limiter: Mutex<RateLimiter>,
    identity: RwLock<Option<SessionIdentity>>,
    heartbeat: Mutex<Option<JoinHandle<()>>>,
}

impl AccountSession {
    /// Create an unauthenticated session
    ///
    /// Spawns the sync outbox worker against the given gateway.
    pub fn new(pool: SqlitePool, gateway: Arc<dyn AccountGateway>, catalog: Arc<Catalog>) -> Self {
        let outbox = Arc::new(SyncOutbox::spawn(Arc::clone(&gateway)));
        let economy = Arc::new(EconomyStore::new(
            pool.clone(),
            catalog,
            Arc::clone(&outbox),
        ));
        let usernames = Arc::new(UsernameSlotStore::new(pool, Arc::clone(&outbox)));

        Self {
            gateway,
            economy,
            usernames,
            register_limiter: Mutex::new(RateLimiter::registration()),
            identity: RwLock::new(None),
            heartbeat: Mutex::new(None),
        }
    }

    /// The session's economy store
    pub fn economy(&self) -> &Arc<EconomyStore> {
        &self.economy
    }

    /// The session's username slot store
    pub fn usernames(&self) -> &Arc<UsernameSlotStore> {
        &self.usernames
    }

    /// Current session identity, if authenticated
    pub async fn identity(&self) -> Option<SessionIdentity> {
        self.identity.read().await.clone()
    }

    /// Whether a session (registered or guest) is active
    pub async fn is_authenticated(&self) -> bool {
        self.identity.read().await.is_some()
    }

    /// Log in against the gateway
    ///
    /// On success the whole economy record is replaced with the gateway's
    /// authoritative snapshot, the slot store loads lazily, and the presence
    /// heartbeat starts. On failure the session stays unauthenticated.
    pub async fn login(&self, identifier: &str, password: &str) -> Result<SessionIdentity> {
        let (identity, account) = self.gateway.login(identifier, password).await?;

        self.economy.apply_snapshot(&account).await?;
        self.usernames
            .load(&identity.user_id, &identity.username, &account.extra_usernames)
            .await?;

        info!(user_id = %identity.user_id, username = %identity.username, "Logged in");
        self.start_heartbeat(identity.user_id.clone()).await;
        *self.identity.write().await = Some(identity.clone());
        Ok(identity)
    }

    /// Register a new account, gated by the registration rate limiter
    pub async fn register(&self, data: RegisterData) -> Result<SessionIdentity> {
        if let Err(retry_after) = self.register_limiter.lock().await.try_admit() {
            return Err(VibeError::RateLimited {
                retry_after_ms: retry_after.as_millis() as u64,
            });
        }

        let (identity, account) = self.gateway.register(&data).await?;

        self.economy.apply_snapshot(&account).await?;
        self.usernames
            .load(&identity.user_id, &identity.username, &account.extra_usernames)
            .await?;

        info!(user_id = %identity.user_id, username = %identity.username, "Registered");
        self.start_heartbeat(identity.user_id.clone()).await;
        *self.identity.write().await = Some(identity.clone());
        Ok(identity)
    }

    /// Start a local-only guest session
    ///
    /// No gateway calls and no heartbeat; the record never syncs.
    pub async fn login_as_guest(&self) -> Result<SessionIdentity> {
        let record = self.economy.start_guest().await?;
        self.usernames.load(&record.user_id, "guest", &[]).await?;

        let identity = SessionIdentity {
            user_id: record.user_id,
            username: "guest".to_string(),
        };
        *self.identity.write().await = Some(identity.clone());
        Ok(identity)
    }

    /// End the session
    ///
    /// Marks presence offline (best-effort), stops the heartbeat, and clears
    /// both stores. Registered users keep their per-user rows on disk; guest
    /// rows are removed since their ids are never reused.
    pub async fn logout(&self) {
        let identity = self.identity.write().await.take();

        if let Some(identity) = identity {
            if !identity.user_id.is_guest() {
                if let Err(e) = self.gateway.set_offline(&identity.user_id).await {
                    warn!(user_id = %identity.user_id, error = %e, "Failed to mark offline");
                }
            }
            info!(user_id = %identity.user_id, "Logged out");
        }

        self.stop_heartbeat().await;
        self.economy.clear().await;
        self.usernames.clear().await;
    }

    /// Pull the authoritative record and overlay the profile subset
    ///
    /// Balance and inventory are deliberately not overwritten here, so an
    /// in-flight local purchase is never clobbered. No-op for guests.
    pub async fn refresh_from_account(&self) -> Result<()> {
        let Some(identity) = self.identity().await else {
            return Err(VibeError::NotAuthenticated);
        };
        if identity.user_id.is_guest() {
            return Ok(());
        }

        let account = self
            .gateway
            .get_user_by_id(&identity.user_id)
            .await?
            .ok_or_else(|| VibeError::not_found("User", identity.user_id.as_str()))?;

        self.economy.overlay_profile(account.profile_overlay()).await
    }

    /// Buy one username slot
    ///
    /// Compensating sequence: debit the slot price, then grant the slot; if
    /// the grant fails the debit is refunded. Returns the new capacity.
    pub async fn buy_username_slot(&self) -> Result<u32> {
        let price = self.usernames.next_slot_price().await?;
        self.economy.debit(price).await?;

        match self.usernames.increment_max_slots().await {
            Ok(max_slots) => {
                info!(price, max_slots, "Purchased username slot");
                Ok(max_slots)
            }
            Err(e) => {
                warn!(error = %e, "Slot grant failed, refunding debit");
                if let Err(refund_err) = self.economy.credit(price).await {
                    warn!(error = %refund_err, "Refund failed, balances may diverge");
                }
                Err(e)
            }
        }
    }

    async fn start_heartbeat(&self, user_id: UserId) {
        let gateway = Arc::clone(&self.gateway);
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(HEARTBEAT_INTERVAL);
            loop {
                interval.tick().await;
                if let Err(e) = gateway.update_last_seen(&user_id).await {
                    debug!(user_id = %user_id, error = %e, "Heartbeat failed");
                }
            }
        });

        if let Some(previous) = self.heartbeat.lock().await.replace(handle) {
            previous.abort();
        }
    }

    async fn stop_heartbeat(&self) {
        if let Some(handle) = self.heartbeat.lock().await.take() {
            handle.abort();
        }
    }
}

impl Drop for AccountSession {
    fn drop(&mut self) {
        // The heartbeat task holds no session references, but leaving it
        // running past the session would keep pinging the gateway.
        if let Ok(mut guard) = self.heartbeat.try_lock() {
            if let Some(handle) = guard.take() {
                handle.abort();
            }
        }
    }
}
