//! Comanda Client - data access for the hosted restaurant backend
//!
//! One generic surface for everything the app needs from the platform:
//! row queries with filters and embedded children, row writes, named backend
//! functions, the auth session, and the realtime change feed.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod feed;
pub mod query;

pub use auth::{AuthUser, Session};
pub use client::Backend;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use feed::FeedSubscription;
pub use query::RowQuery;

// Change feed re-exports for convenience
pub use shared::feed::{ChangeAction, ChangeEvent};
