//! Screens
//!
//! One module per screen: a `draw` over the shared state plus a `handle_key`
//! for its own bindings. Global keys (tabs, refresh, quit) live in the main
//! loop.

pub mod inventory;
pub mod invoices;
pub mod kitchen;
pub mod login;
pub mod orders;
pub mod payments;
pub mod purchases;
pub mod reports;
pub mod tables;

use std::time::Duration;

/// The eight screens, in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Tables,
    Orders,
    Kitchen,
    Inventory,
    Purchases,
    Invoices,
    Payments,
    Reports,
}

impl Screen {
    pub const ALL: [Screen; 8] = [
        Screen::Tables,
        Screen::Orders,
        Screen::Kitchen,
        Screen::Inventory,
        Screen::Purchases,
        Screen::Invoices,
        Screen::Payments,
        Screen::Reports,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Screen::Tables => "Mesas",
            Screen::Orders => "Comandas",
            Screen::Kitchen => "Cocina",
            Screen::Inventory => "Almacén",
            Screen::Purchases => "Compras",
            Screen::Invoices => "Facturas",
            Screen::Payments => "Pagos",
            Screen::Reports => "Informes",
        }
    }

    /// Poll cadence while the screen is visible. `None` means no polling:
    /// payments are pushed over the change feed and reports load on demand.
    pub fn poll_interval(self) -> Option<Duration> {
        match self {
            Screen::Kitchen => Some(Duration::from_secs(5)),
            Screen::Tables => Some(Duration::from_secs(10)),
            Screen::Orders => Some(Duration::from_secs(15)),
            Screen::Inventory | Screen::Purchases | Screen::Invoices => {
                Some(Duration::from_secs(30))
            }
            Screen::Payments | Screen::Reports => None,
        }
    }

    pub fn key_hints(self) -> &'static str {
        match self {
            Screen::Tables => "[s] sentar  [b] cuenta  [f] liberar  [v] reservar",
            Screen::Orders => "[n] nueva  [i] artículo  [a] avanzar  [c] cancelar",
            Screen::Kitchen => "[a] avanzar  [d] servido",
            Screen::Inventory => "[+]/[-] ajustar stock",
            Screen::Purchases => "[n] nueva  [R] recibida",
            Screen::Invoices => "[i] emitir  [p] cobrar  [v] anular  [x] exportar",
            Screen::Payments => "en vivo",
            Screen::Reports => "[d/w/m] rango  [e] CSV  [h] HTML",
        }
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|s| *s == self).unwrap_or(0)
    }

    pub fn next(self) -> Screen {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Screen {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_order_wraps_both_ways() {
        assert_eq!(Screen::Tables.next(), Screen::Orders);
        assert_eq!(Screen::Reports.next(), Screen::Tables);
        assert_eq!(Screen::Tables.prev(), Screen::Reports);
    }

    #[test]
    fn kitchen_polls_fastest() {
        let kitchen = Screen::Kitchen.poll_interval().unwrap();
        for screen in Screen::ALL {
            if let Some(interval) = screen.poll_interval() {
                assert!(kitchen <= interval);
            }
        }
    }

    #[test]
    fn pushed_screens_do_not_poll() {
        assert!(Screen::Payments.poll_interval().is_none());
        assert!(Screen::Reports.poll_interval().is_none());
    }
}
