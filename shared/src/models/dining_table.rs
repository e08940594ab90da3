//! Dining Table Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Dining table status
///
/// Stored as a plain text column; values written by older app versions may
/// not match any known variant, so decoding keeps them as `Unknown`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableStatus {
    #[default]
    Available,
    Occupied,
    Reserved,
    Payment,
    #[serde(untagged)]
    Unknown(String),
}

impl TableStatus {
    /// Display label, total over every wire value.
    pub fn label(&self) -> &str {
        match self {
            TableStatus::Available => "Libre",
            TableStatus::Occupied => "Ocupada",
            TableStatus::Reserved => "Reservada",
            TableStatus::Payment => "Cobrando",
            TableStatus::Unknown(other) => other,
        }
    }

    /// Seating covers free tables and arriving reservations.
    pub fn can_seat(&self) -> bool {
        matches!(self, TableStatus::Available | TableStatus::Reserved)
    }

    /// Requesting the bill needs a seated order.
    pub fn can_bill(&self) -> bool {
        *self == TableStatus::Occupied
    }

    /// Freeing closes out a seated or paying table.
    pub fn can_free(&self) -> bool {
        matches!(self, TableStatus::Occupied | TableStatus::Payment)
    }

    /// Only free tables take a reservation.
    pub fn can_reserve(&self) -> bool {
        *self == TableStatus::Available
    }
}

/// Dining table entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTable {
    pub id: String,
    pub name: String,
    pub zone: Option<String>,
    pub capacity: i32,
    pub status: TableStatus,
    /// Open order currently seated at this table
    pub current_order_id: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Update dining table payload (PATCH semantics: absent fields untouched)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiningTableUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TableStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_order_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_known_values() {
        let json = serde_json::to_string(&TableStatus::Payment).unwrap();
        assert_eq!(json, "\"PAYMENT\"");
        let back: TableStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, TableStatus::Payment);
    }

    #[test]
    fn status_keeps_unknown_values() {
        let status: TableStatus = serde_json::from_str("\"BLOCKED\"").unwrap();
        assert_eq!(status, TableStatus::Unknown("BLOCKED".to_string()));
        assert_eq!(status.label(), "BLOCKED");
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"BLOCKED\"");
    }

    #[test]
    fn labels_are_total() {
        for status in [
            TableStatus::Available,
            TableStatus::Occupied,
            TableStatus::Reserved,
            TableStatus::Payment,
            TableStatus::Unknown("X".into()),
        ] {
            assert!(!status.label().is_empty());
        }
    }

    #[test]
    fn action_sets_gate_on_status() {
        assert!(TableStatus::Available.can_seat());
        assert!(TableStatus::Reserved.can_seat());
        assert!(!TableStatus::Occupied.can_seat());
        assert!(!TableStatus::Payment.can_seat());

        assert!(TableStatus::Occupied.can_bill());
        assert!(!TableStatus::Payment.can_bill());
        assert!(!TableStatus::Available.can_bill());

        assert!(TableStatus::Occupied.can_free());
        assert!(TableStatus::Payment.can_free());
        assert!(!TableStatus::Available.can_free());
        assert!(!TableStatus::Reserved.can_free());

        assert!(TableStatus::Available.can_reserve());
        assert!(!TableStatus::Occupied.can_reserve());
        assert!(!TableStatus::Reserved.can_reserve());
    }

    #[test]
    fn unknown_status_permits_no_action() {
        let status = TableStatus::Unknown("BLOCKED".to_string());
        assert!(!status.can_seat());
        assert!(!status.can_bill());
        assert!(!status.can_free());
        assert!(!status.can_reserve());
    }

    #[test]
    fn update_serializes_only_present_fields() {
        let patch = DiningTableUpdate {
            status: Some(TableStatus::Occupied),
            ..Default::default()
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "OCCUPIED" }));
    }
}
