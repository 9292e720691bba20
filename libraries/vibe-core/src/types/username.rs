//! Extra-username slot records
//!
//! Slot 1 is always the account's primary username and is implicit; only
//! additional aliases are stored here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{UserId, UsernameId};

/// Minimum alias length
pub const USERNAME_MIN_LEN: usize = 3;
/// Maximum alias length
pub const USERNAME_MAX_LEN: usize = 20;
/// Base price for the first additional slot
pub const SLOT_BASE_PRICE: u64 = 200;

/// A registered alias username
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtraUsername {
    /// Entry id
    pub id: UsernameId,
    /// The alias, stored lowercased
    pub username: String,
    /// When the alias was registered
    pub created_at: DateTime<Utc>,
    /// Whether this alias is the active one
    pub is_active: bool,
}

impl ExtraUsername {
    /// Create a new, inactive alias entry with a generated id
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            id: UsernameId::generate(),
            username: username.into().to_lowercase(),
            created_at: Utc::now(),
            is_active: false,
        }
    }
}

/// Per-user alias slot record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsernameSlots {
    /// Owning user
    pub user_id: UserId,

    /// Total slots including the implicit primary slot; always >= 1
    pub max_slots: u32,

    /// Ordered alias list; invariant: `extras.len() <= max_slots - 1`
    pub extras: Vec<ExtraUsername>,

    /// Active alias id, or None when the primary username is active
    pub active: Option<UsernameId>,
}

impl UsernameSlots {
    /// Create the lazily-initialized default record for a user
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            max_slots: 1,
            extras: Vec::new(),
            active: None,
        }
    }

    /// Whether another alias fits in the purchased capacity
    pub fn can_add_more(&self) -> bool {
        (self.extras.len() as u32) < self.max_slots.saturating_sub(1)
    }

    /// Price of the next slot: doubles per slot already purchased
    pub fn next_slot_price(&self) -> u64 {
        SLOT_BASE_PRICE << (self.max_slots.saturating_sub(1).min(32))
    }

    /// Case-insensitive membership check against the extras list
    pub fn contains_alias(&self, candidate: &str) -> bool {
        let lowered = candidate.to_lowercase();
        self.extras.iter().any(|e| e.username == lowered)
    }
}

/// Whether a candidate alias satisfies length and character rules
pub fn is_valid_username(candidate: &str) -> bool {
    (USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&candidate.len())
        && candidate.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
