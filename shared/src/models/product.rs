//! Product and Category Models

use serde::{Deserialize, Serialize};

/// Product category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub display_order: Option<i32>,
}

/// Product entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub category_id: Option<String>,
    pub name: String,
    /// Unit price in euros
    pub price: f64,
    /// IVA rate in percent (0, 4, 10 or 21)
    pub tax_rate: Option<f64>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub description: Option<String>,
}

fn default_active() -> bool {
    true
}
