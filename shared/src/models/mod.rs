//! Data models
//!
//! Row types for the hosted backend tables, consumed as-is by the app.
//! All IDs are UUID strings assigned server-side; `XxxCreate` payloads omit
//! them, `XxxUpdate` payloads serialize only the fields they patch.

pub mod dining_table;
pub mod inventory;
pub mod invoice;
pub mod order;
pub mod payment;
pub mod product;
pub mod profile;
pub mod purchase;

// Re-exports
pub use dining_table::*;
pub use inventory::*;
pub use invoice::*;
pub use order::*;
pub use payment::*;
pub use product::*;
pub use profile::*;
pub use purchase::*;
