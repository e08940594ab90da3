//! Profile Model

use serde::{Deserialize, Serialize};

/// User profile row, keyed by the auth user id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub full_name: Option<String>,
    /// "admin", "waiter", "kitchen", ... Informational only; enforcement
    /// is row-level security on the backend.
    pub role: Option<String>,
}

impl Profile {
    pub fn display_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or("(sin nombre)")
    }
}
