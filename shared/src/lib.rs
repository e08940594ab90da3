//! Shared types for the Comanda suite
//!
//! Domain row models, status enums, money helpers and the change-feed
//! vocabulary used by both the data-access client and the terminal app.

pub mod feed;
pub mod models;
pub mod money;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

// Change feed re-exports (for convenient access)
pub use feed::{ChangeAction, ChangeEvent};
