//! Authoritative account snapshot and partial-update shapes
//!
//! These mirror what the remote account gateway stores per user. The local
//! stores consume `AccountRecord` on login and emit `UserPatch` updates.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EquipSlot, ExtraUsername, ItemCategory, ItemId, ProfileOverlay, UserId};

/// Full user record as held by the gateway
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRecord {
    /// Stable user id
    pub id: String,

    /// Primary username
    pub username: String,

    /// Moni balance
    pub coins: u64,

    /// Owned item ids grouped by category
    #[serde(default)]
    pub inventory: BTreeMap<ItemCategory, Vec<ItemId>>,

    /// Equipped item per slot
    #[serde(default)]
    pub equipped: BTreeMap<EquipSlot, ItemId>,

    /// Registered alias usernames
    #[serde(default)]
    pub extra_usernames: Vec<ExtraUsername>,

    /// Avatar image path or token
    pub avatar: Option<String>,

    /// Image-type banner
    pub banner_image: Option<String>,

    /// Image-type profile background
    pub background_image: Option<String>,

    /// Free-form status line
    pub status: Option<String>,

    /// Mini-profile background image
    pub mini_profile_background: Option<String>,

    /// Social links keyed by platform name
    #[serde(default)]
    pub socials: BTreeMap<String, String>,

    /// Premium flag
    #[serde(default)]
    pub premium: bool,

    /// Admin flag
    #[serde(default)]
    pub is_admin: bool,

    /// Last presence ping
    pub last_seen: Option<DateTime<Utc>>,
}

impl AccountRecord {
    /// Flatten the per-category inventory into a single id list
    pub fn all_owned_ids(&self) -> impl Iterator<Item = &ItemId> {
        self.inventory.values().flatten()
    }

    /// Extract the profile-overlay subset of this record
    pub fn profile_overlay(&self) -> ProfileOverlay {
        ProfileOverlay {
            avatar: self.avatar.clone(),
            banner_image: self.banner_image.clone(),
            background_image: self.background_image.clone(),
            status: self.status.clone(),
            premium: self.premium,
            mini_profile_background: self.mini_profile_background.clone(),
            socials: self.socials.clone(),
        }
    }
}

/// Partial-field patch applied by `update_user`
///
/// Only set fields are written; the gateway applies whole-field
/// last-write-wins semantics per field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coins: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equipped: Option<BTreeMap<EquipSlot, ItemId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_usernames: Option<Vec<ExtraUsername>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mini_profile_background: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub socials: Option<BTreeMap<String, String>>,
}

impl UserPatch {
    /// Patch that only updates the coin balance
    pub fn coins(coins: u64) -> Self {
        Self {
            coins: Some(coins),
            ..Self::default()
        }
    }

    /// Patch that only updates the equipped map
    pub fn equipped(equipped: BTreeMap<EquipSlot, ItemId>) -> Self {
        Self {
            equipped: Some(equipped),
            ..Self::default()
        }
    }

    /// Patch that only updates the alias list
    pub fn extra_usernames(extras: Vec<ExtraUsername>) -> Self {
        Self {
            extra_usernames: Some(extras),
            ..Self::default()
        }
    }
}

/// Registration payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterData {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Aggregate statistics exposed to the admin surface
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerStats {
    pub total_users: u64,
    pub online_users: u64,
    pub premium_users: u64,
    pub total_coins: u64,
}

/// Gateway identity of a logged-in session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    /// Stable user id
    pub user_id: UserId,
    /// Primary username
    pub username: String,
}
