//! Status colors and shared styles

use ratatui::style::{Color, Modifier, Style};
use shared::models::{InvoiceStatus, OrderStatus, PaymentMethod, PurchaseStatus, TableStatus};

/// Palette for per-category bars and breakdown rows
pub const CHART_COLORS: [Color; 10] = [
    Color::Blue,
    Color::Green,
    Color::Yellow,
    Color::Magenta,
    Color::Cyan,
    Color::LightBlue,
    Color::LightGreen,
    Color::LightYellow,
    Color::LightMagenta,
    Color::LightCyan,
];

pub fn chart_color(index: usize) -> Color {
    CHART_COLORS[index % CHART_COLORS.len()]
}

pub fn table_status_color(status: &TableStatus) -> Color {
    match status {
        TableStatus::Available => Color::Green,
        TableStatus::Occupied => Color::Yellow,
        TableStatus::Reserved => Color::Magenta,
        TableStatus::Payment => Color::Cyan,
        TableStatus::Unknown(_) => Color::DarkGray,
    }
}

pub fn order_status_color(status: &OrderStatus) -> Color {
    match status {
        OrderStatus::Pending => Color::Yellow,
        OrderStatus::Preparing => Color::LightBlue,
        OrderStatus::Ready => Color::Green,
        OrderStatus::Delivered => Color::Cyan,
        OrderStatus::Completed => Color::DarkGray,
        OrderStatus::Cancelled => Color::Red,
        OrderStatus::Unknown(_) => Color::DarkGray,
    }
}

pub fn invoice_status_color(status: &InvoiceStatus) -> Color {
    match status {
        InvoiceStatus::Draft => Color::DarkGray,
        InvoiceStatus::Issued => Color::Yellow,
        InvoiceStatus::Paid => Color::Green,
        InvoiceStatus::Void => Color::Red,
        InvoiceStatus::Unknown(_) => Color::DarkGray,
    }
}

pub fn purchase_status_color(status: &PurchaseStatus) -> Color {
    match status {
        PurchaseStatus::Ordered => Color::Yellow,
        PurchaseStatus::Received => Color::Green,
        PurchaseStatus::Cancelled => Color::Red,
        PurchaseStatus::Unknown(_) => Color::DarkGray,
    }
}

pub fn method_color(method: &PaymentMethod) -> Color {
    match method {
        PaymentMethod::Cash => Color::Green,
        PaymentMethod::Card => Color::Blue,
        PaymentMethod::Transfer => Color::Cyan,
        PaymentMethod::Other => Color::Magenta,
        PaymentMethod::Unknown(_) => Color::DarkGray,
    }
}

/// Highlight for the selected row in lists and tables
pub fn selected_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

pub fn dim_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_values_fall_back_to_gray() {
        assert_eq!(
            table_status_color(&TableStatus::Unknown("X".into())),
            Color::DarkGray
        );
        assert_eq!(
            order_status_color(&OrderStatus::Unknown("X".into())),
            Color::DarkGray
        );
        assert_eq!(
            invoice_status_color(&InvoiceStatus::Unknown("X".into())),
            Color::DarkGray
        );
        assert_eq!(
            purchase_status_color(&PurchaseStatus::Unknown("X".into())),
            Color::DarkGray
        );
        assert_eq!(
            method_color(&PaymentMethod::Unknown("X".into())),
            Color::DarkGray
        );
    }

    #[test]
    fn chart_colors_wrap_around() {
        assert_eq!(chart_color(0), chart_color(CHART_COLORS.len()));
    }
}
