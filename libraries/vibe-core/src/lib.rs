//! Vibe Player Core
//!
//! Platform-agnostic domain types, traits, and error handling for the
//! Vibe Player account/economy layer.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `EconomyRecord`, `CatalogItem`, `UsernameSlots`, etc.
//! - **Boundaries**: the `AccountGateway` trait for the remote persistence
//!   collaborator
//! - **Error Handling**: unified `VibeError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use vibe_core::types::{EconomyRecord, EquipSlot, ItemId, UserId};
//!
//! let mut record = EconomyRecord::new(UserId::new("u-1"), 1000);
//! record.owned.insert(ItemId::new("banner_sunset"));
//! record
//!     .equipped
//!     .insert(EquipSlot::Banner, ItemId::new("banner_sunset"));
//! assert!(record.owns(&ItemId::new("banner_sunset")));
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod gateway;
pub mod types;

// Re-export commonly used types
pub use error::{Result, VibeError};
pub use gateway::AccountGateway;

pub use types::{
    // Account snapshots and patches
    AccountRecord, RegisterData, ServerStats, SessionIdentity, UserPatch,
    // Catalog
    CatalogItem, ItemCategory, PackInfo, Rarity,
    // Economy
    EconomyRecord, EquipSlot, ProfileImageKind, ProfileOverlay,
    // Usernames
    ExtraUsername, UsernameSlots,
    // Ids
    ItemId, UserId, UsernameId,
};
