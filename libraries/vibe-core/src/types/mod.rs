//! Domain types for the account/economy core

mod account;
mod economy;
mod ids;
mod item;
mod username;

pub use account::{AccountRecord, RegisterData, ServerStats, SessionIdentity, UserPatch};
pub use economy::{EconomyRecord, EquipSlot, ProfileImageKind, ProfileOverlay};
pub use ids::{ItemId, UserId, UsernameId};
pub use item::{CatalogItem, ItemCategory, PackInfo, Rarity};
pub use username::{
    is_valid_username, ExtraUsername, UsernameSlots, SLOT_BASE_PRICE, USERNAME_MAX_LEN,
    USERNAME_MIN_LEN,
};
