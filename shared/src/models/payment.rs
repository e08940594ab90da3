//! Payment Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Payment method
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Card,
    Transfer,
    Other,
    #[serde(untagged)]
    Unknown(String),
}

impl PaymentMethod {
    /// Display label, total over every wire value.
    pub fn label(&self) -> &str {
        match self {
            PaymentMethod::Cash => "Efectivo",
            PaymentMethod::Card => "Tarjeta",
            PaymentMethod::Transfer => "Transferencia",
            PaymentMethod::Other => "Otro",
            PaymentMethod::Unknown(other) => other,
        }
    }
}

/// Payment entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    pub order_id: Option<String>,
    pub invoice_id: Option<String>,
    pub method: PaymentMethod,
    /// Amount in euros
    pub amount: f64,
    pub reference: Option<String>,
    pub paid_at: DateTime<Utc>,
}

/// Create payment payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentCreate {
    pub order_id: Option<String>,
    pub invoice_id: Option<String>,
    pub method: PaymentMethod,
    pub amount: f64,
    pub reference: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_labels_are_total() {
        for method in [
            PaymentMethod::Cash,
            PaymentMethod::Card,
            PaymentMethod::Transfer,
            PaymentMethod::Other,
            PaymentMethod::Unknown("BIZUM".into()),
        ] {
            assert!(!method.label().is_empty());
        }
    }

    #[test]
    fn unknown_method_survives_a_round_trip() {
        let method: PaymentMethod = serde_json::from_str("\"BIZUM\"").unwrap();
        assert_eq!(serde_json::to_string(&method).unwrap(), "\"BIZUM\"");
    }
}
