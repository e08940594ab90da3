//! Change feed vocabulary
//!
//! Row-change notifications delivered over the backend's realtime channel.
//! The client crate decodes wire frames into these types; the app only ever
//! sees `ChangeEvent`s.

use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;

/// Kind of row change
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeAction {
    Insert,
    Update,
    Delete,
}

impl std::fmt::Display for ChangeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChangeAction::Insert => write!(f, "INSERT"),
            ChangeAction::Update => write!(f, "UPDATE"),
            ChangeAction::Delete => write!(f, "DELETE"),
        }
    }
}

/// A single row change on a subscribed table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub table: String,
    pub action: ChangeAction,
    /// New row values (INSERT/UPDATE)
    #[serde(default)]
    pub record: Option<serde_json::Value>,
    /// Previous row values (UPDATE/DELETE)
    #[serde(default)]
    pub old_record: Option<serde_json::Value>,
}

impl ChangeEvent {
    /// Decode the new row into a typed model. `None` when the payload is
    /// absent or does not match.
    pub fn record_as<T: DeserializeOwned>(&self) -> Option<T> {
        self.record
            .clone()
            .and_then(|v| serde_json::from_value(v).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Payment;

    #[test]
    fn action_parses_wire_strings() {
        let action: ChangeAction = serde_json::from_str("\"INSERT\"").unwrap();
        assert_eq!(action, ChangeAction::Insert);
        assert_eq!(action.to_string(), "INSERT");
    }

    #[test]
    fn record_decodes_into_the_row_model() {
        let event = ChangeEvent {
            table: "payments".into(),
            action: ChangeAction::Insert,
            record: Some(serde_json::json!({
                "id": "p1",
                "order_id": "o1",
                "invoice_id": null,
                "method": "CARD",
                "amount": 24.90,
                "reference": null,
                "paid_at": "2024-03-11T14:30:00Z"
            })),
            old_record: None,
        };

        let payment: Payment = event.record_as().unwrap();
        assert_eq!(payment.id, "p1");
        assert!((payment.amount - 24.90).abs() < 1e-9);
    }

    #[test]
    fn record_as_tolerates_missing_payloads() {
        let event = ChangeEvent {
            table: "payments".into(),
            action: ChangeAction::Delete,
            record: None,
            old_record: Some(serde_json::json!({ "id": "p1" })),
        };
        assert!(event.record_as::<Payment>().is_none());
    }
}
