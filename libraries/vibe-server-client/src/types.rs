//! Types for the account server API requests and responses.
//!
//! User records travel on the wire as [`vibe_core::types::AccountRecord`];
//! only the envelope types live here.

use serde::{Deserialize, Serialize};
use vibe_core::types::AccountRecord;

/// Configuration for connecting to an account server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Base URL of the server (e.g., "https://accounts.example.com")
    pub url: String,
    /// Current session token (if authenticated)
    pub token: Option<String>,
}

impl ServerConfig {
    /// Create a new server config with just the URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            token: None,
        }
    }

    /// Create a config with an existing session token.
    pub fn with_token(url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            token: Some(token.into()),
        }
    }
}

/// Request body for the login endpoint.
#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub identifier: String,
    pub password: String,
}

/// Response from successful login or registration.
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: AccountRecord,
}

/// Request body for balance adjustments.
#[derive(Debug, Serialize)]
pub struct CoinsRequest {
    pub amount: u64,
}

/// Request body for inventory grants.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryRequest {
    pub category: String,
    pub item_id: String,
}

/// Request body for the admin-flag endpoint.
#[derive(Debug, Serialize)]
pub struct AdminRequest {
    pub admin: bool,
}

/// Information about the account server.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}
