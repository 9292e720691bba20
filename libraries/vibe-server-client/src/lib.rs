//! Vibe Player Account Server Client
//!
//! HTTP client library implementing the remote account gateway against the
//! account server's REST API.
//!
//! # Features
//!
//! - **Authentication**: login and registration with session-token storage
//! - **Account sync**: record fetch, partial patches, balance and inventory
//!   mutations
//! - **Presence**: heartbeat and mark-offline endpoints
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use vibe_core::AccountGateway;
//! use vibe_server_client::{AccountServerClient, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServerConfig::new("https://accounts.example.com");
//!     let client = AccountServerClient::new(config)?;
//!
//!     let info = client.test_connection().await?;
//!     println!("Connected to {} v{}", info.name, info.version);
//!
//!     let (identity, account) = client.login("user", "password").await?;
//!     println!("Logged in as {} with {} coins", identity.username, account.coins);
//!
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]

mod client;
mod error;
mod types;

pub use client::AccountServerClient;
pub use error::{AccountClientError, Result};
pub use types::{AuthResponse, LoginRequest, ServerConfig, ServerInfo};
