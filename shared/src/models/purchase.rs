//! Purchase and Supplier Models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money;

/// Purchase status
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PurchaseStatus {
    #[default]
    Ordered,
    Received,
    Cancelled,
    #[serde(untagged)]
    Unknown(String),
}

impl PurchaseStatus {
    /// Display label, total over every wire value.
    pub fn label(&self) -> &str {
        match self {
            PurchaseStatus::Ordered => "Pedida",
            PurchaseStatus::Received => "Recibida",
            PurchaseStatus::Cancelled => "Cancelada",
            PurchaseStatus::Unknown(other) => other,
        }
    }
}

/// Supplier entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Supplier {
    pub id: String,
    pub name: String,
    pub contact: Option<String>,
    pub phone: Option<String>,
}

/// Purchase line item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseItem {
    pub id: String,
    pub purchase_id: String,
    pub inventory_item_id: Option<String>,
    pub name: String,
    pub quantity: f64,
    /// Cost per unit in euros
    pub unit_cost: f64,
}

impl PurchaseItem {
    /// Line total in euros, computed in cents to avoid drift.
    pub fn line_total(&self) -> f64 {
        let quantity_cents = (self.quantity * money::eur_to_cents(self.unit_cost) as f64).round();
        money::cents_to_eur(quantity_cents as i64)
    }
}

/// Purchase entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Purchase {
    pub id: String,
    pub supplier_id: Option<String>,
    pub supplier_name: Option<String>,
    pub status: PurchaseStatus,
    /// Total in euros
    pub total: f64,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub received_at: Option<DateTime<Utc>>,
    /// Embedded child rows, present when the query selects them
    #[serde(default)]
    pub items: Vec<PurchaseItem>,
}

/// Create purchase payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseCreate {
    pub supplier_id: Option<String>,
    pub supplier_name: Option<String>,
    pub status: PurchaseStatus,
    pub total: f64,
    pub note: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_status_keeps_its_wire_value() {
        let status: PurchaseStatus = serde_json::from_str("\"IN_TRANSIT\"").unwrap();
        assert_eq!(status.label(), "IN_TRANSIT");
    }

    #[test]
    fn line_total_handles_fractional_quantities() {
        let item = PurchaseItem {
            id: "p1".into(),
            purchase_id: "c1".into(),
            inventory_item_id: None,
            name: "Tomate".into(),
            quantity: 2.5,
            unit_cost: 1.20,
        };
        assert!((item.line_total() - 3.0).abs() < 1e-9);
    }
}
