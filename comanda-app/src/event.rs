//! Events flowing from background tasks into the UI loop
//!
//! Every backend call runs in a spawned task and reports back with one of
//! these. The UI thread never awaits a request.

use comanda_client::{ChangeEvent, Session};
use shared::models::{
    Category, DiningTable, InventoryItem, InventoryStats, Invoice, Order, Payment, Product,
    Profile, Purchase, Supplier,
};

use crate::reports::ReportData;
use crate::screens::Screen;

#[derive(Debug)]
pub enum AppEvent {
    SignedIn {
        session: Session,
        profile: Option<Profile>,
    },
    SignInFailed(String),
    SignedOut,

    TablesLoaded(Vec<DiningTable>),
    OrdersLoaded(Vec<Order>),
    KitchenLoaded(Vec<Order>),
    CatalogLoaded {
        products: Vec<Product>,
        categories: Vec<Category>,
    },
    InventoryLoaded {
        items: Vec<InventoryItem>,
        stats: Option<InventoryStats>,
    },
    PurchasesLoaded {
        purchases: Vec<Purchase>,
        suppliers: Vec<Supplier>,
    },
    InvoicesLoaded(Vec<Invoice>),
    PaymentsLoaded(Vec<Payment>),
    ReportLoaded(Box<ReportData>),

    /// A row change arrived on the payments feed
    PaymentChanged(ChangeEvent),

    Toast(Toast),
    /// Ask the UI loop to re-fetch a screen (sent after mutations)
    Refresh(Screen),
}

/// Follow-up work an event asks of the UI loop
pub enum Effect {
    Refresh(Screen),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

/// Short status message shown in the footer
#[derive(Debug, Clone)]
pub struct Toast {
    pub text: String,
    pub level: ToastLevel,
}

impl Toast {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: ToastLevel::Info,
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: ToastLevel::Success,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: ToastLevel::Error,
        }
    }
}
