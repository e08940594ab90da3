//! Application state
//!
//! Everything the UI renders lives here: the session, per-screen row caches,
//! dialogs, toasts and the polling clock. Mutation happens in exactly two
//! places: key handlers and [`App::apply`].

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use comanda_client::{ChangeEvent, FeedSubscription, Session};
use shared::feed::ChangeAction;
use shared::models::{
    Category, DiningTable, InventoryItem, InventoryStats, Invoice, Order, Payment, Product,
    Profile, Purchase, Supplier,
};
use tui_input::Input;
use tui_logger::TuiWidgetState;

use crate::dialog::Dialog;
use crate::event::{AppEvent, Effect, Toast};
use crate::reports::{ReportData, ReportRange};
use crate::screens::Screen;

const TOAST_TTL: Duration = Duration::from_secs(4);
const TOAST_QUEUE_LIMIT: usize = 4;

/// Cached rows plus the selected index
pub struct ListCache<T> {
    pub rows: Vec<T>,
    pub selected: usize,
}

impl<T> Default for ListCache<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            selected: 0,
        }
    }
}

impl<T> ListCache<T> {
    /// Replace the rows, clamping the selection into range.
    pub fn set(&mut self, rows: Vec<T>) {
        self.rows = rows;
        if self.selected >= self.rows.len() {
            self.selected = self.rows.len().saturating_sub(1);
        }
    }

    pub fn current(&self) -> Option<&T> {
        self.rows.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if !self.rows.is_empty() {
            self.selected = (self.selected + 1).min(self.rows.len() - 1);
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Email,
    Password,
}

/// Sign-in form state
pub struct LoginForm {
    pub email: Input,
    pub password: Input,
    pub focus: LoginField,
    pub busy: bool,
    pub error: Option<String>,
}

impl Default for LoginForm {
    fn default() -> Self {
        Self {
            email: Input::default(),
            password: Input::default(),
            focus: LoginField::Email,
            busy: false,
            error: None,
        }
    }
}

/// A toast on screen, stamped when it appeared
pub struct ActiveToast {
    pub toast: Toast,
    pub shown_at: Instant,
}

pub struct App {
    pub screen: Screen,
    pub session: Option<Session>,
    pub profile: Option<Profile>,
    pub login: LoginForm,
    pub dialog: Option<Dialog>,

    pub tables: ListCache<DiningTable>,
    pub orders: ListCache<Order>,
    pub kitchen: ListCache<Order>,
    pub products: Vec<Product>,
    pub categories: Vec<Category>,
    pub inventory: ListCache<InventoryItem>,
    pub inventory_stats: InventoryStats,
    pub purchases: ListCache<Purchase>,
    pub suppliers: Vec<Supplier>,
    pub invoices: ListCache<Invoice>,
    /// Newest first; patched in place by feed events while subscribed
    pub payments: Vec<Payment>,
    pub report: ReportData,
    pub report_range: ReportRange,

    /// Live while the payments screen is visible
    pub feed: Option<FeedSubscription>,
    pub show_logs: bool,
    pub logger_state: TuiWidgetState,
    toasts: VecDeque<ActiveToast>,
    last_poll: HashMap<Screen, Instant>,
}

impl App {
    pub fn new() -> Self {
        Self {
            screen: Screen::Tables,
            session: None,
            profile: None,
            login: LoginForm::default(),
            dialog: None,
            tables: ListCache::default(),
            orders: ListCache::default(),
            kitchen: ListCache::default(),
            products: Vec::new(),
            categories: Vec::new(),
            inventory: ListCache::default(),
            inventory_stats: InventoryStats::default(),
            purchases: ListCache::default(),
            suppliers: Vec::new(),
            invoices: ListCache::default(),
            payments: Vec::new(),
            report: ReportData::default(),
            report_range: ReportRange::default(),
            feed: None,
            show_logs: false,
            logger_state: TuiWidgetState::new(),
            toasts: VecDeque::new(),
            last_poll: HashMap::new(),
        }
    }

    /// Name shown in the header.
    pub fn display_name(&self) -> String {
        if let Some(profile) = &self.profile {
            return profile.display_name().to_string();
        }
        self.session
            .as_ref()
            .and_then(|s| s.user.email.clone())
            .unwrap_or_else(|| "usuario".to_string())
    }

    /// Fold a background event into the state. Returns follow-up work for
    /// the UI loop.
    pub fn apply(&mut self, event: AppEvent) -> Option<Effect> {
        match event {
            AppEvent::SignedIn { session, profile } => {
                let name = profile
                    .as_ref()
                    .map(|p| p.display_name().to_string())
                    .or_else(|| session.user.email.clone())
                    .unwrap_or_else(|| "usuario".to_string());
                self.session = Some(session);
                self.profile = profile;
                self.login = LoginForm::default();
                self.push_toast(Toast::success(format!("Sesión iniciada: {name}")));
                Some(Effect::Refresh(self.screen))
            }
            AppEvent::SignInFailed(message) => {
                self.login.busy = false;
                self.login.error = Some(message);
                None
            }
            AppEvent::SignedOut => {
                self.reset_session();
                None
            }
            AppEvent::TablesLoaded(rows) => {
                self.tables.set(rows);
                None
            }
            AppEvent::OrdersLoaded(rows) => {
                self.orders.set(rows);
                None
            }
            AppEvent::KitchenLoaded(rows) => {
                self.kitchen.set(rows);
                None
            }
            AppEvent::CatalogLoaded {
                products,
                categories,
            } => {
                self.products = products;
                self.categories = categories;
                None
            }
            AppEvent::InventoryLoaded { items, stats } => {
                self.inventory.set(items);
                if let Some(stats) = stats {
                    self.inventory_stats = stats;
                }
                None
            }
            AppEvent::PurchasesLoaded {
                purchases,
                suppliers,
            } => {
                self.purchases.set(purchases);
                self.suppliers = suppliers;
                None
            }
            AppEvent::InvoicesLoaded(rows) => {
                self.invoices.set(rows);
                None
            }
            AppEvent::PaymentsLoaded(rows) => {
                self.payments = rows;
                None
            }
            AppEvent::ReportLoaded(data) => {
                self.report = *data;
                None
            }
            AppEvent::PaymentChanged(change) => {
                self.apply_payment_change(change);
                None
            }
            AppEvent::Toast(toast) => {
                self.push_toast(toast);
                None
            }
            AppEvent::Refresh(screen) => Some(Effect::Refresh(screen)),
        }
    }

    /// Patch the payments cache from a feed event instead of re-fetching.
    fn apply_payment_change(&mut self, change: ChangeEvent) {
        match change.action {
            ChangeAction::Insert | ChangeAction::Update => {
                let Some(payment) = change.record_as::<Payment>() else {
                    tracing::warn!(action = %change.action, "payment change without a decodable record");
                    return;
                };
                if let Some(slot) = self.payments.iter_mut().find(|p| p.id == payment.id) {
                    *slot = payment;
                } else {
                    self.payments.insert(0, payment);
                }
            }
            ChangeAction::Delete => {
                let old_id = change
                    .old_record
                    .as_ref()
                    .and_then(|v| v.get("id"))
                    .and_then(|v| v.as_str())
                    .map(str::to_string);
                if let Some(id) = old_id {
                    self.payments.retain(|p| p.id != id);
                }
            }
        }
    }

    fn reset_session(&mut self) {
        self.session = None;
        self.profile = None;
        self.dialog = None;
        self.feed = None;
        self.login = LoginForm::default();
        self.screen = Screen::Tables;
        self.tables = ListCache::default();
        self.orders = ListCache::default();
        self.kitchen = ListCache::default();
        self.products = Vec::new();
        self.categories = Vec::new();
        self.inventory = ListCache::default();
        self.inventory_stats = InventoryStats::default();
        self.purchases = ListCache::default();
        self.suppliers = Vec::new();
        self.invoices = ListCache::default();
        self.payments = Vec::new();
        self.report = ReportData::default();
        self.last_poll.clear();
        self.push_toast(Toast::info("Sesión cerrada"));
    }

    // ---- toasts ----

    pub fn push_toast(&mut self, toast: Toast) {
        self.toasts.push_back(ActiveToast {
            toast,
            shown_at: Instant::now(),
        });
        while self.toasts.len() > TOAST_QUEUE_LIMIT {
            self.toasts.pop_front();
        }
    }

    pub fn prune_toasts(&mut self, now: Instant) {
        while let Some(front) = self.toasts.front() {
            if now.duration_since(front.shown_at) >= TOAST_TTL {
                self.toasts.pop_front();
            } else {
                break;
            }
        }
    }

    pub fn latest_toast(&self) -> Option<&ActiveToast> {
        self.toasts.back()
    }

    // ---- polling ----

    /// True when the current screen wants a re-fetch, at most once per its
    /// interval. Screens without an interval never fire.
    pub fn poll_due(&mut self, now: Instant) -> bool {
        let Some(interval) = self.screen.poll_interval() else {
            return false;
        };
        match self.last_poll.get(&self.screen) {
            Some(last) if now.duration_since(*last) < interval => false,
            _ => {
                self.last_poll.insert(self.screen, now);
                true
            }
        }
    }

    pub fn mark_polled(&mut self, screen: Screen) {
        self.last_poll.insert(screen, Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::PaymentMethod;

    fn payment(id: &str, amount: f64) -> Payment {
        Payment {
            id: id.into(),
            order_id: None,
            invoice_id: None,
            method: PaymentMethod::Card,
            amount,
            reference: None,
            paid_at: chrono::Utc::now(),
        }
    }

    fn insert_event(id: &str, amount: f64) -> ChangeEvent {
        ChangeEvent {
            table: "payments".into(),
            action: ChangeAction::Insert,
            record: serde_json::to_value(payment(id, amount)).ok(),
            old_record: None,
        }
    }

    #[test]
    fn list_cache_clamps_the_selection() {
        let mut cache = ListCache::default();
        cache.set(vec![1, 2, 3]);
        cache.select_next();
        cache.select_next();
        assert_eq!(cache.current(), Some(&3));
        cache.select_next();
        assert_eq!(cache.selected, 2);
        cache.set(vec![1]);
        assert_eq!(cache.current(), Some(&1));
        cache.set(Vec::new());
        assert!(cache.current().is_none());
        cache.select_prev();
        assert_eq!(cache.selected, 0);
    }

    #[test]
    fn feed_insert_lands_newest_first_and_dedupes() {
        let mut app = App::new();
        app.payments = vec![payment("a", 10.0)];
        app.apply(AppEvent::PaymentChanged(insert_event("b", 20.0)));
        assert_eq!(app.payments.len(), 2);
        assert_eq!(app.payments[0].id, "b");

        // A replay of the same row replaces instead of duplicating
        app.apply(AppEvent::PaymentChanged(insert_event("b", 25.0)));
        assert_eq!(app.payments.len(), 2);
        assert!((app.payments[0].amount - 25.0).abs() < 1e-9);
    }

    #[test]
    fn feed_delete_removes_by_old_record_id() {
        let mut app = App::new();
        app.payments = vec![payment("a", 10.0), payment("b", 20.0)];
        app.apply(AppEvent::PaymentChanged(ChangeEvent {
            table: "payments".into(),
            action: ChangeAction::Delete,
            record: None,
            old_record: Some(serde_json::json!({ "id": "a" })),
        }));
        assert_eq!(app.payments.len(), 1);
        assert_eq!(app.payments[0].id, "b");
    }

    #[test]
    fn poll_due_respects_the_interval() {
        let mut app = App::new();
        app.screen = Screen::Kitchen;
        let t0 = Instant::now();
        assert!(app.poll_due(t0));
        assert!(!app.poll_due(t0 + Duration::from_secs(2)));
        assert!(app.poll_due(t0 + Duration::from_secs(6)));
    }

    #[test]
    fn pushed_screens_never_poll() {
        let mut app = App::new();
        app.screen = Screen::Payments;
        assert!(!app.poll_due(Instant::now()));
    }

    #[test]
    fn toasts_expire_and_cap() {
        let mut app = App::new();
        for i in 0..6 {
            app.push_toast(Toast::info(format!("t{i}")));
        }
        assert_eq!(app.latest_toast().unwrap().toast.text, "t5");
        app.prune_toasts(Instant::now() + TOAST_TTL);
        assert!(app.latest_toast().is_none());
    }
}
