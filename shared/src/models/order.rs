//! Order Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money;

/// Order status
///
/// The kitchen lifecycle is PENDING → PREPARING → READY → DELIVERED →
/// COMPLETED; CANCELLED can be reached from any open state. Transitions are
/// plain column writes, screens decide which actions to offer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Preparing,
    Ready,
    Delivered,
    Completed,
    Cancelled,
    #[serde(untagged)]
    Unknown(String),
}

impl OrderStatus {
    /// Display label, total over every wire value.
    pub fn label(&self) -> &str {
        match self {
            OrderStatus::Pending => "Pendiente",
            OrderStatus::Preparing => "En preparación",
            OrderStatus::Ready => "Listo",
            OrderStatus::Delivered => "Servido",
            OrderStatus::Completed => "Completado",
            OrderStatus::Cancelled => "Cancelado",
            OrderStatus::Unknown(other) => other,
        }
    }

    /// Next status along the kitchen lifecycle, if any.
    pub fn advance(&self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Pending => Some(OrderStatus::Preparing),
            OrderStatus::Preparing => Some(OrderStatus::Ready),
            OrderStatus::Ready => Some(OrderStatus::Delivered),
            OrderStatus::Delivered => Some(OrderStatus::Completed),
            _ => None,
        }
    }

    /// Still on the floor or in the kitchen.
    pub fn is_open(&self) -> bool {
        !matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// Shown on the kitchen display.
    pub fn in_kitchen(&self) -> bool {
        matches!(
            self,
            OrderStatus::Pending | OrderStatus::Preparing | OrderStatus::Ready
        )
    }
}

/// Order line item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: String,
    pub order_id: String,
    pub product_id: Option<String>,
    pub name: String,
    pub quantity: i32,
    /// Unit price in euros
    pub unit_price: f64,
    pub note: Option<String>,
    pub status: OrderStatus,
}

impl OrderItem {
    /// Line total in euros, computed in cents to avoid drift.
    pub fn line_total(&self) -> f64 {
        money::cents_to_eur(money::eur_to_cents(self.unit_price) * self.quantity as i64)
    }
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub table_id: Option<String>,
    pub table_name: Option<String>,
    pub status: OrderStatus,
    pub guest_count: Option<i32>,
    pub note: Option<String>,
    /// Subtotal in euros
    pub subtotal: f64,
    /// Total in euros
    pub total: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    /// Embedded child rows, present when the query selects them
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub table_id: Option<String>,
    pub table_name: Option<String>,
    pub status: OrderStatus,
    pub guest_count: Option<i32>,
    pub note: Option<String>,
    pub subtotal: f64,
    pub total: f64,
}

impl OrderCreate {
    /// Fresh pending order for a table being seated.
    pub fn for_table(table_id: &str, table_name: &str, guest_count: i32) -> Self {
        Self {
            table_id: Some(table_id.to_string()),
            table_name: Some(table_name.to_string()),
            status: OrderStatus::Pending,
            guest_count: Some(guest_count),
            note: None,
            subtotal: 0.0,
            total: 0.0,
        }
    }
}

/// Create order item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemCreate {
    pub order_id: String,
    pub product_id: Option<String>,
    pub name: String,
    pub quantity: i32,
    pub unit_price: f64,
    pub note: Option<String>,
    pub status: OrderStatus,
}

/// Update status payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusPatch {
    pub status: OrderStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_walks_the_kitchen_lifecycle() {
        let mut status = OrderStatus::Pending;
        let mut seen = vec![status.clone()];
        while let Some(next) = status.advance() {
            status = next;
            seen.push(status.clone());
        }
        assert_eq!(
            seen,
            vec![
                OrderStatus::Pending,
                OrderStatus::Preparing,
                OrderStatus::Ready,
                OrderStatus::Delivered,
                OrderStatus::Completed,
            ]
        );
    }

    #[test]
    fn terminal_states_do_not_advance() {
        assert_eq!(OrderStatus::Completed.advance(), None);
        assert_eq!(OrderStatus::Cancelled.advance(), None);
        assert_eq!(OrderStatus::Unknown("HELD".into()).advance(), None);
    }

    #[test]
    fn kitchen_filter_matches_active_preparation() {
        assert!(OrderStatus::Pending.in_kitchen());
        assert!(OrderStatus::Preparing.in_kitchen());
        assert!(OrderStatus::Ready.in_kitchen());
        assert!(!OrderStatus::Delivered.in_kitchen());
        assert!(!OrderStatus::Completed.in_kitchen());
    }

    #[test]
    fn line_total_is_exact_in_cents() {
        let item = OrderItem {
            id: "i1".into(),
            order_id: "o1".into(),
            product_id: None,
            name: "Café".into(),
            quantity: 3,
            unit_price: 1.10,
            note: None,
            status: OrderStatus::Pending,
        };
        assert!((item.line_total() - 3.30).abs() < 1e-9);
    }

    #[test]
    fn order_decodes_without_embedded_items() {
        let json = serde_json::json!({
            "id": "o1",
            "table_id": null,
            "table_name": "M5",
            "status": "PENDING",
            "guest_count": 2,
            "note": null,
            "subtotal": 0.0,
            "total": 0.0,
            "created_at": "2024-03-11T12:00:00Z",
            "updated_at": null
        });
        let order: Order = serde_json::from_value(json).unwrap();
        assert!(order.items.is_empty());
        assert_eq!(order.status, OrderStatus::Pending);
    }
}
