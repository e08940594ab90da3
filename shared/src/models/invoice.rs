//! Invoice Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Invoice status
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceStatus {
    #[default]
    Draft,
    Issued,
    Paid,
    Void,
    #[serde(untagged)]
    Unknown(String),
}

impl InvoiceStatus {
    /// Display label, total over every wire value.
    pub fn label(&self) -> &str {
        match self {
            InvoiceStatus::Draft => "Borrador",
            InvoiceStatus::Issued => "Emitida",
            InvoiceStatus::Paid => "Pagada",
            InvoiceStatus::Void => "Anulada",
            InvoiceStatus::Unknown(other) => other,
        }
    }
}

/// Invoice entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub id: String,
    /// Assigned when the invoice is issued
    pub number: Option<String>,
    pub order_id: Option<String>,
    pub customer_name: Option<String>,
    /// NIF/CIF of the customer
    pub customer_tax_id: Option<String>,
    /// Amounts in euros
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
    pub status: InvoiceStatus,
    pub issued_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Issue payload: assigns the number and stamps the issue time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceIssue {
    pub number: String,
    pub status: InvoiceStatus,
    pub issued_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_labels_are_total() {
        for status in [
            InvoiceStatus::Draft,
            InvoiceStatus::Issued,
            InvoiceStatus::Paid,
            InvoiceStatus::Void,
            InvoiceStatus::Unknown("RECTIFIED".into()),
        ] {
            assert!(!status.label().is_empty());
        }
    }
}
