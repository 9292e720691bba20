//! Economy record: coin balance, owned items, equipped slots
//!
//! This is the local, optimistically-mutated mirror of the user's account
//! economy. The gateway holds the authoritative copy; last write wins.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::{ItemId, UserId};

/// Cosmetic categories that hold at most one equipped item each
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EquipSlot {
    Banner,
    Frame,
    Title,
    Background,
    ProfileColor,
}

impl EquipSlot {
    /// Stable string form used on the wire and in storage
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Banner => "banner",
            Self::Frame => "frame",
            Self::Title => "title",
            Self::Background => "background",
            Self::ProfileColor => "profileColor",
        }
    }

    /// Parse from the stable string form
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "banner" => Some(Self::Banner),
            "frame" => Some(Self::Frame),
            "title" => Some(Self::Title),
            "background" => Some(Self::Background),
            "profileColor" => Some(Self::ProfileColor),
            _ => None,
        }
    }
}

/// Image-type profile fields gated behind the premium flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProfileImageKind {
    Banner,
    Background,
    MiniProfileBackground,
}

/// Profile fields refreshed from the gateway without touching the economy
///
/// `refresh_from_account` overlays exactly these fields so an in-flight
/// local purchase is never clobbered by a stale remote balance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileOverlay {
    /// Avatar image path or token
    pub avatar: Option<String>,
    /// Image-type banner (premium feature)
    pub banner_image: Option<String>,
    /// Image-type profile background (premium feature)
    pub background_image: Option<String>,
    /// Free-form status line
    pub status: Option<String>,
    /// Premium flag
    pub premium: bool,
    /// Mini-profile background image (premium feature)
    pub mini_profile_background: Option<String>,
    /// Social links keyed by platform name
    #[serde(default)]
    pub socials: BTreeMap<String, String>,
}

/// The logged-in user's economy state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EconomyRecord {
    /// Owning user
    pub user_id: UserId,

    /// Moni balance; debits are guarded so this is never observed negative
    pub coins: u64,

    /// Owned catalog item ids (uniqueness enforced by the set)
    pub owned: BTreeSet<ItemId>,

    /// Equipped item per slot; absent key means the slot is unequipped
    pub equipped: BTreeMap<EquipSlot, ItemId>,

    /// Gateway-refreshed profile fields
    #[serde(default)]
    pub profile: ProfileOverlay,

    /// Whether this is a local-only guest session
    #[serde(default)]
    pub guest: bool,
}

impl EconomyRecord {
    /// Starting balance for a registered account
    pub const REGISTERED_STARTING_COINS: u64 = 1000;

    /// Starting balance for a guest session
    pub const GUEST_STARTING_COINS: u64 = 100;

    /// Create a fresh record with the given starting balance
    pub fn new(user_id: UserId, coins: u64) -> Self {
        let guest = user_id.is_guest();
        Self {
            user_id,
            coins,
            owned: BTreeSet::new(),
            equipped: BTreeMap::new(),
            profile: ProfileOverlay::default(),
            guest,
        }
    }

    /// Whether the user owns the given item
    pub fn owns(&self, id: &ItemId) -> bool {
        self.owned.contains(id)
    }

    /// Item currently equipped in a slot, if any
    pub fn equipped_in(&self, slot: EquipSlot) -> Option<&ItemId> {
        self.equipped.get(&slot)
    }
}
