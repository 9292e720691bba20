/// Core error types for Vibe Player account handling
use thiserror::Error;

use crate::types::ItemId;

/// Result type alias using `VibeError`
pub type Result<T> = std::result::Result<T, VibeError>;

/// Core error type for the account/economy layer
#[derive(Error, Debug)]
pub enum VibeError {
    /// Spend or purchase requested with balance below price
    #[error("Insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: u64, available: u64 },

    /// Purchase of an item already in the inventory
    #[error("Item already owned: {0}")]
    AlreadyOwned(ItemId),

    /// Sliding-window quota exceeded
    #[error("Rate limited, try again in {retry_after_ms} ms")]
    RateLimited { retry_after_ms: u64 },

    /// Username collides case-insensitively with an existing one
    #[error("Username taken: {0}")]
    UsernameTaken(String),

    /// No free username slots left
    #[error("No username slots available")]
    NoSlots,

    /// Username failed length or character validation
    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    /// Image-type profile fields require the premium flag
    #[error("Premium required")]
    PremiumRequired,

    /// Operation requires an authenticated session
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Remote account gateway failure
    #[error("Gateway error: {0}")]
    Gateway(String),

    /// Local persistence failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl VibeError {
    /// Create a gateway error
    pub fn gateway(msg: impl Into<String>) -> Self {
        Self::Gateway(msg.into())
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Create an invalid username error
    pub fn invalid_username(msg: impl Into<String>) -> Self {
        Self::InvalidUsername(msg.into())
    }
}
