//! Inventory Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Inventory item entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: String,
    pub name: String,
    /// Stock unit ("kg", "l", "ud", ...)
    pub unit: String,
    pub quantity: f64,
    /// Threshold below which the item counts as low stock
    pub min_quantity: f64,
    /// Cost per unit in euros
    pub unit_cost: f64,
    pub supplier_id: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl InventoryItem {
    pub fn is_low(&self) -> bool {
        self.quantity <= self.min_quantity
    }

    /// Stock value in euros.
    pub fn stock_value(&self) -> f64 {
        self.quantity * self.unit_cost
    }
}

/// Parameters for the `adjust_inventory_quantity` backend function.
///
/// The adjustment is applied server-side so concurrent terminals cannot
/// lose each other's deltas to a read-modify-write race.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockAdjustment {
    pub item_id: String,
    pub delta: f64,
    pub reason: Option<String>,
}

/// Result of the `inventory_stats` backend function.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InventoryStats {
    pub item_count: i64,
    /// Total stock value in euros
    pub stock_value: f64,
    pub low_stock_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(quantity: f64, min_quantity: f64) -> InventoryItem {
        InventoryItem {
            id: "i1".into(),
            name: "Harina".into(),
            unit: "kg".into(),
            quantity,
            min_quantity,
            unit_cost: 0.80,
            supplier_id: None,
            updated_at: None,
        }
    }

    #[test]
    fn low_stock_includes_the_threshold() {
        assert!(item(2.0, 5.0).is_low());
        assert!(item(5.0, 5.0).is_low());
        assert!(!item(5.1, 5.0).is_low());
    }

    #[test]
    fn stock_value_multiplies_quantity_by_cost() {
        assert!((item(10.0, 1.0).stock_value() - 8.0).abs() < 1e-9);
    }
}
