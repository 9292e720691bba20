//! Shared test helpers: an in-memory account gateway double and session setup

// Not every test binary uses every helper
#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use vibe_account::AccountSession;
use vibe_catalog::Catalog;
use vibe_core::types::{
    AccountRecord, ItemCategory, ItemId, RegisterData, ServerStats, SessionIdentity, UserId,
    UserPatch,
};
use vibe_core::{AccountGateway, Result, VibeError};

/// In-memory stand-in for the remote account gateway
#[derive(Default)]
pub struct MemoryGateway {
    users: Mutex<HashMap<String, AccountRecord>>,
    credentials: Mutex<HashMap<String, (String, String)>>, // username -> (password, user_id)
    /// Number of calls that fail before the gateway recovers
    fail_remaining: AtomicU32,
    pub last_seen_calls: AtomicU32,
    pub set_offline_calls: AtomicU32,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `n` mutating calls fail with a gateway error
    pub fn fail_times(&self, n: u32) {
        self.fail_remaining.store(n, Ordering::SeqCst);
    }

    fn check_failure(&self) -> Result<()> {
        let remaining = self.fail_remaining.load(Ordering::SeqCst);
        if remaining > 0 {
            self.fail_remaining.store(remaining - 1, Ordering::SeqCst);
            return Err(VibeError::gateway("injected failure"));
        }
        Ok(())
    }

    /// Seed an account with credentials, starter items, and 1000 coins
    pub async fn seed_user(&self, username: &str, password: &str) -> UserId {
        let user_id = UserId::generate();
        let catalog = Catalog::builtin();

        let mut inventory: BTreeMap<ItemCategory, Vec<ItemId>> = BTreeMap::new();
        for item in catalog.starter_items() {
            inventory.entry(item.category).or_default().push(item.id.clone());
        }

        let record = AccountRecord {
            id: user_id.as_str().to_string(),
            username: username.to_string(),
            coins: 1000,
            inventory,
            ..AccountRecord::default()
        };

        self.users
            .lock()
            .await
            .insert(user_id.as_str().to_string(), record);
        self.credentials.lock().await.insert(
            username.to_string(),
            (password.to_string(), user_id.as_str().to_string()),
        );
        user_id
    }

    /// Direct record access for assertions
    pub async fn record(&self, user_id: &UserId) -> Option<AccountRecord> {
        self.users.lock().await.get(user_id.as_str()).cloned()
    }

    /// Direct record mutation for test setup
    pub async fn mutate_record(&self, user_id: &UserId, f: impl FnOnce(&mut AccountRecord)) {
        if let Some(record) = self.users.lock().await.get_mut(user_id.as_str()) {
            f(record);
        }
    }
}

#[async_trait]
impl AccountGateway for MemoryGateway {
    async fn get_user_by_id(&self, id: &UserId) -> Result<Option<AccountRecord>> {
        self.check_failure()?;
        Ok(self.users.lock().await.get(id.as_str()).cloned())
    }

    async fn login(
        &self,
        identifier: &str,
        password: &str,
    ) -> Result<(SessionIdentity, AccountRecord)> {
        self.check_failure()?;
        let credentials = self.credentials.lock().await;
        let Some((stored_password, user_id)) = credentials.get(identifier) else {
            return Err(VibeError::gateway("invalid credentials"));
        };
        if stored_password != password {
            return Err(VibeError::gateway("invalid credentials"));
        }

        let record = self
            .users
            .lock()
            .await
            .get(user_id)
            .cloned()
            .ok_or_else(|| VibeError::not_found("User", user_id.clone()))?;
        let identity = SessionIdentity {
            user_id: UserId::new(user_id.clone()),
            username: record.username.clone(),
        };
        Ok((identity, record))
    }

    async fn register(&self, data: &RegisterData) -> Result<(SessionIdentity, AccountRecord)> {
        self.check_failure()?;
        if self.credentials.lock().await.contains_key(&data.username) {
            return Err(VibeError::UsernameTaken(data.username.clone()));
        }
        let user_id = self.seed_user(&data.username, &data.password).await;
        let record = self.record(&user_id).await.expect("just seeded");
        let identity = SessionIdentity {
            user_id,
            username: data.username.clone(),
        };
        Ok((identity, record))
    }

    async fn update_user(&self, id: &UserId, patch: &UserPatch) -> Result<bool> {
        self.check_failure()?;
        let mut users = self.users.lock().await;
        let Some(record) = users.get_mut(id.as_str()) else {
            return Ok(false);
        };

        if let Some(coins) = patch.coins {
            record.coins = coins;
        }
        if let Some(ref equipped) = patch.equipped {
            record.equipped = equipped.clone();
        }
        if let Some(ref extras) = patch.extra_usernames {
            record.extra_usernames = extras.clone();
        }
        if let Some(ref avatar) = patch.avatar {
            record.avatar = Some(avatar.clone());
        }
        if let Some(ref banner) = patch.banner_image {
            record.banner_image = Some(banner.clone());
        }
        if let Some(ref background) = patch.background_image {
            record.background_image = Some(background.clone());
        }
        if let Some(ref status) = patch.status {
            record.status = Some(status.clone());
        }
        if let Some(ref bg) = patch.mini_profile_background {
            record.mini_profile_background = Some(bg.clone());
        }
        if let Some(ref socials) = patch.socials {
            record.socials = socials.clone();
        }
        Ok(true)
    }

    async fn add_coins(&self, id: &UserId, amount: u64) -> Result<bool> {
        self.check_failure()?;
        let mut users = self.users.lock().await;
        let Some(record) = users.get_mut(id.as_str()) else {
            return Ok(false);
        };
        record.coins = record.coins.saturating_add(amount);
        Ok(true)
    }

    async fn spend_coins(&self, id: &UserId, amount: u64) -> Result<bool> {
        self.check_failure()?;
        let mut users = self.users.lock().await;
        let Some(record) = users.get_mut(id.as_str()) else {
            return Ok(false);
        };
        if record.coins < amount {
            return Ok(false);
        }
        record.coins -= amount;
        Ok(true)
    }

    async fn add_to_inventory(
        &self,
        id: &UserId,
        category: ItemCategory,
        item: &ItemId,
    ) -> Result<bool> {
        self.check_failure()?;
        let mut users = self.users.lock().await;
        let Some(record) = users.get_mut(id.as_str()) else {
            return Ok(false);
        };
        let items = record.inventory.entry(category).or_default();
        if !items.contains(item) {
            items.push(item.clone());
        }
        Ok(true)
    }

    async fn set_admin(&self, id: &UserId, admin: bool) -> Result<bool> {
        let mut users = self.users.lock().await;
        let Some(record) = users.get_mut(id.as_str()) else {
            return Ok(false);
        };
        record.is_admin = admin;
        Ok(true)
    }

    async fn set_premium(&self, id: &UserId) -> Result<bool> {
        let mut users = self.users.lock().await;
        let Some(record) = users.get_mut(id.as_str()) else {
            return Ok(false);
        };
        record.premium = true;
        Ok(true)
    }

    async fn remove_premium(&self, id: &UserId) -> Result<bool> {
        let mut users = self.users.lock().await;
        let Some(record) = users.get_mut(id.as_str()) else {
            return Ok(false);
        };
        record.premium = false;
        Ok(true)
    }

    async fn delete_user(&self, id: &UserId) -> Result<bool> {
        Ok(self.users.lock().await.remove(id.as_str()).is_some())
    }

    async fn get_all_users_full(&self) -> Result<Vec<AccountRecord>> {
        Ok(self.users.lock().await.values().cloned().collect())
    }

    async fn get_stats(&self) -> Result<ServerStats> {
        let users = self.users.lock().await;
        Ok(ServerStats {
            total_users: users.len() as u64,
            premium_users: users.values().filter(|u| u.premium).count() as u64,
            total_coins: users.values().map(|u| u.coins).sum(),
            ..ServerStats::default()
        })
    }

    async fn update_last_seen(&self, _id: &UserId) -> Result<()> {
        self.last_seen_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn set_offline(&self, _id: &UserId) -> Result<()> {
        self.set_offline_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Build a session backed by an in-memory database and gateway
pub async fn new_session() -> (AccountSession, Arc<MemoryGateway>) {
    let pool = vibe_storage::create_pool("sqlite::memory:").await.unwrap();
    vibe_storage::run_migrations(&pool).await.unwrap();

    let gateway = Arc::new(MemoryGateway::new());
    let session = AccountSession::new(
        pool,
        Arc::clone(&gateway) as Arc<dyn AccountGateway>,
        Arc::new(Catalog::builtin()),
    );
    (session, gateway)
}

/// Poll until `check` passes or a short timeout elapses
///
/// Used to observe the asynchronous outbox delivery without racing it.
pub async fn wait_until<F, Fut>(mut check: F)
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    for _ in 0..200 {
        if check().await {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not reached within timeout");
}
