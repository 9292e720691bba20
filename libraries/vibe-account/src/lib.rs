//! Vibe Player Account
//!
//! The user economy and inventory state machine: coin balance, ownable and
//! equippable items, alias username slots, and their synchronization contract
//! with the remote account gateway.
//!
//! # Architecture
//!
//! - **`EconomyStore`**: optimistic local mutations with guarded debits,
//!   write-through snapshots, and best-effort gateway sync.
//! - **`UsernameSlotStore`**: alias registration gated by purchased slot
//!   capacity and a sliding-window rate limiter.
//! - **`SyncOutbox`**: FIFO fire-and-forget delivery with bounded retry.
//! - **`AccountSession`**: session lifecycle (login/register/guest/logout),
//!   presence heartbeat, and the compensating slot-purchase sequence.
//!
//! Stores are explicitly constructed and dependency-injected (one set per
//! session), never ambient globals, so they unit-test without a UI runtime.

#![forbid(unsafe_code)]

pub mod economy;
pub mod outbox;
pub mod rate_limit;
pub mod session;
pub mod usernames;

pub use economy::EconomyStore;
pub use outbox::{SyncOp, SyncOutbox};
pub use rate_limit::RateLimiter;
pub use session::AccountSession;
pub use usernames::UsernameSlotStore;
