//! Modal dialogs
//!
//! One small state machine per dialog. Esc always cancels; Enter validates
//! and fires the action, closing only when the input made sense. Validation
//! failures toast and keep the dialog open.

use crossterm::event::{Event, KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph};
use shared::models::PaymentMethod;
use shared::money::format_eur;
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;

use crate::actions::{self, Ctx};
use crate::event::Toast;
use crate::state::App;
use crate::theme;
use crate::ui::centered_rect;

/// Methods offered when collecting an invoice
pub const PAY_METHODS: [PaymentMethod; 4] = [
    PaymentMethod::Cash,
    PaymentMethod::Card,
    PaymentMethod::Transfer,
    PaymentMethod::Other,
];

pub enum Dialog {
    SeatTable {
        table_id: String,
        table_name: String,
        guests: Input,
    },
    NewOrder {
        table_name: Input,
        guests: Input,
        focus: usize,
    },
    AddItem {
        order_id: String,
        selected: usize,
        quantity: Input,
    },
    NewPurchase {
        supplier: Input,
        total: Input,
        note: Input,
        focus: usize,
    },
    PayInvoice {
        invoice_id: String,
        selected: usize,
    },
    ConfirmSignOut,
}

#[derive(PartialEq)]
enum Outcome {
    Keep,
    Close,
}

pub fn handle_key(app: &mut App, ctx: &Ctx, key: KeyEvent) {
    if key.code == KeyCode::Esc {
        app.dialog = None;
        return;
    }
    // Take the dialog out so handlers can borrow the rest of the state
    let Some(mut dialog) = app.dialog.take() else {
        return;
    };
    let outcome = match &mut dialog {
        Dialog::ConfirmSignOut => on_confirm_sign_out(ctx, key),
        Dialog::SeatTable {
            table_id,
            table_name,
            guests,
        } => on_seat_table(app, ctx, key, table_id, table_name, guests),
        Dialog::NewOrder {
            table_name,
            guests,
            focus,
        } => on_new_order(app, ctx, key, table_name, guests, focus),
        Dialog::AddItem {
            order_id,
            selected,
            quantity,
        } => on_add_item(app, ctx, key, order_id, selected, quantity),
        Dialog::NewPurchase {
            supplier,
            total,
            note,
            focus,
        } => on_new_purchase(app, ctx, key, supplier, total, note, focus),
        Dialog::PayInvoice {
            invoice_id,
            selected,
        } => on_pay_invoice(app, ctx, key, invoice_id, selected),
    };
    if outcome == Outcome::Keep {
        app.dialog = Some(dialog);
    }
}

fn on_confirm_sign_out(ctx: &Ctx, key: KeyEvent) -> Outcome {
    match key.code {
        KeyCode::Enter | KeyCode::Char('s') | KeyCode::Char('y') => {
            actions::sign_out(ctx);
            Outcome::Close
        }
        KeyCode::Char('n') => Outcome::Close,
        _ => Outcome::Keep,
    }
}

fn on_seat_table(
    app: &mut App,
    ctx: &Ctx,
    key: KeyEvent,
    table_id: &str,
    table_name: &str,
    guests: &mut Input,
) -> Outcome {
    match key.code {
        KeyCode::Enter => match parse_guests(guests.value()) {
            Some(n) => {
                actions::seat_table(ctx, table_id, table_name, n);
                Outcome::Close
            }
            None => {
                app.push_toast(Toast::error("Comensales: entre 1 y 99"));
                Outcome::Keep
            }
        },
        _ => {
            guests.handle_event(&Event::Key(key));
            Outcome::Keep
        }
    }
}

fn on_new_order(
    app: &mut App,
    ctx: &Ctx,
    key: KeyEvent,
    table_name: &mut Input,
    guests: &mut Input,
    focus: &mut usize,
) -> Outcome {
    match key.code {
        KeyCode::Tab | KeyCode::Down | KeyCode::Up => {
            *focus = (*focus + 1) % 2;
            Outcome::Keep
        }
        KeyCode::Enter => {
            let name = table_name.value().trim().to_string();
            if name.is_empty() {
                app.push_toast(Toast::error("Falta el nombre de la mesa"));
                return Outcome::Keep;
            }
            match parse_guests(guests.value()) {
                Some(n) => {
                    actions::create_order(ctx, name, n);
                    Outcome::Close
                }
                None => {
                    app.push_toast(Toast::error("Comensales: entre 1 y 99"));
                    Outcome::Keep
                }
            }
        }
        _ => {
            let field = if *focus == 0 { table_name } else { guests };
            field.handle_event(&Event::Key(key));
            Outcome::Keep
        }
    }
}

fn on_add_item(
    app: &mut App,
    ctx: &Ctx,
    key: KeyEvent,
    order_id: &str,
    selected: &mut usize,
    quantity: &mut Input,
) -> Outcome {
    match key.code {
        KeyCode::Up => {
            *selected = selected.saturating_sub(1);
            Outcome::Keep
        }
        KeyCode::Down => {
            if !app.products.is_empty() {
                *selected = (*selected + 1).min(app.products.len() - 1);
            }
            Outcome::Keep
        }
        KeyCode::Enter => {
            let Some(product) = app.products.get(*selected).cloned() else {
                app.push_toast(Toast::error("No hay productos en la carta"));
                return Outcome::Close;
            };
            let Some(n) = parse_quantity(quantity.value()) else {
                app.push_toast(Toast::error("Cantidad no válida"));
                return Outcome::Keep;
            };
            let Some(order) = app.orders.rows.iter().find(|o| o.id == order_id).cloned() else {
                app.push_toast(Toast::error("La comanda ya no está en pantalla"));
                return Outcome::Close;
            };
            actions::add_order_item(ctx, &order, &product, n);
            Outcome::Close
        }
        _ => {
            quantity.handle_event(&Event::Key(key));
            Outcome::Keep
        }
    }
}

fn on_new_purchase(
    app: &mut App,
    ctx: &Ctx,
    key: KeyEvent,
    supplier: &mut Input,
    total: &mut Input,
    note: &mut Input,
    focus: &mut usize,
) -> Outcome {
    match key.code {
        KeyCode::Tab | KeyCode::Down => {
            *focus = (*focus + 1) % 3;
            Outcome::Keep
        }
        KeyCode::Up => {
            *focus = (*focus + 2) % 3;
            Outcome::Keep
        }
        KeyCode::Enter => {
            let name = supplier.value().trim().to_string();
            if name.is_empty() {
                app.push_toast(Toast::error("Falta el proveedor"));
                return Outcome::Keep;
            }
            let Some(amount) = parse_amount(total.value()) else {
                app.push_toast(Toast::error("Importe no válido"));
                return Outcome::Keep;
            };
            // Reuse the supplier row when the name matches one we know
            let supplier_id = app
                .suppliers
                .iter()
                .find(|s| s.name.eq_ignore_ascii_case(&name))
                .map(|s| s.id.clone());
            let note = Some(note.value().trim())
                .filter(|n| !n.is_empty())
                .map(str::to_string);
            actions::create_purchase(ctx, supplier_id, name, amount, note);
            Outcome::Close
        }
        _ => {
            let field = match *focus {
                0 => supplier,
                1 => total,
                _ => note,
            };
            field.handle_event(&Event::Key(key));
            Outcome::Keep
        }
    }
}

fn on_pay_invoice(
    app: &mut App,
    ctx: &Ctx,
    key: KeyEvent,
    invoice_id: &str,
    selected: &mut usize,
) -> Outcome {
    match key.code {
        KeyCode::Up => {
            *selected = selected.saturating_sub(1);
            Outcome::Keep
        }
        KeyCode::Down => {
            *selected = (*selected + 1).min(PAY_METHODS.len() - 1);
            Outcome::Keep
        }
        KeyCode::Enter => {
            let Some(invoice) = app
                .invoices
                .rows
                .iter()
                .find(|i| i.id == invoice_id)
                .cloned()
            else {
                app.push_toast(Toast::error("La factura ya no está en pantalla"));
                return Outcome::Close;
            };
            actions::pay_invoice(ctx, &invoice, PAY_METHODS[*selected].clone());
            Outcome::Close
        }
        _ => Outcome::Keep,
    }
}

// ---- parsing ----

fn parse_guests(raw: &str) -> Option<i32> {
    raw.trim().parse().ok().filter(|n| (1..=99).contains(n))
}

fn parse_quantity(raw: &str) -> Option<i32> {
    raw.trim().parse().ok().filter(|n| (1..=999).contains(n))
}

/// Accepts the decimal comma ("12,50") as well as the dot.
fn parse_amount(raw: &str) -> Option<f64> {
    raw.trim()
        .replace(',', ".")
        .parse()
        .ok()
        .filter(|v: &f64| v.is_finite() && *v > 0.0)
}

// ---- drawing ----

pub fn draw(f: &mut Frame, app: &App) {
    let Some(dialog) = &app.dialog else {
        return;
    };
    match dialog {
        Dialog::ConfirmSignOut => draw_confirm_sign_out(f),
        Dialog::SeatTable {
            table_name, guests, ..
        } => draw_seat_table(f, table_name, guests),
        Dialog::NewOrder {
            table_name,
            guests,
            focus,
        } => draw_new_order(f, table_name, guests, *focus),
        Dialog::AddItem {
            selected, quantity, ..
        } => draw_add_item(f, app, *selected, quantity),
        Dialog::NewPurchase {
            supplier,
            total,
            note,
            focus,
        } => draw_new_purchase(f, supplier, total, note, *focus),
        Dialog::PayInvoice {
            invoice_id,
            selected,
        } => draw_pay_invoice(f, app, invoice_id, *selected),
    }
}

fn dialog_block(title: &str) -> Block<'_> {
    Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
}

fn field_line<'a>(label: &str, input: &'a Input, focused: bool) -> Line<'a> {
    let value_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let mut spans = vec![
        Span::styled(format!("{label}: "), theme::dim_style()),
        Span::styled(input.value(), value_style),
    ];
    if focused {
        spans.push(Span::styled("▌", value_style));
    }
    Line::from(spans)
}

const HINT: &str = "[Enter] confirmar   [Esc] cancelar";

fn hint_line() -> Line<'static> {
    Line::from(Span::styled(HINT, theme::dim_style()))
}

fn draw_confirm_sign_out(f: &mut Frame) {
    let area = centered_rect(44, 6, f.area());
    f.render_widget(Clear, area);
    let text = vec![
        Line::from("¿Cerrar la sesión?"),
        Line::from(""),
        Line::from(Span::styled(
            "[Enter/s] sí   [n/Esc] no",
            theme::dim_style(),
        )),
    ];
    f.render_widget(
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(dialog_block("Salir")),
        area,
    );
}

fn draw_seat_table(f: &mut Frame, table_name: &str, guests: &Input) {
    let area = centered_rect(44, 7, f.area());
    f.render_widget(Clear, area);
    let text = vec![
        Line::from(format!("Mesa {table_name}")),
        Line::from(""),
        field_line("Comensales", guests, true),
        Line::from(""),
        hint_line(),
    ];
    f.render_widget(
        Paragraph::new(text).block(dialog_block("Sentar mesa")),
        area,
    );
}

fn draw_new_order(f: &mut Frame, table_name: &Input, guests: &Input, focus: usize) {
    let area = centered_rect(48, 8, f.area());
    f.render_widget(Clear, area);
    let text = vec![
        field_line("Mesa / nombre", table_name, focus == 0),
        Line::from(""),
        field_line("Comensales", guests, focus == 1),
        Line::from(""),
        hint_line(),
    ];
    f.render_widget(
        Paragraph::new(text).block(dialog_block("Nueva comanda")),
        area,
    );
}

fn draw_add_item(f: &mut Frame, app: &App, selected: usize, quantity: &Input) {
    let area = centered_rect(56, 16, f.area());
    f.render_widget(Clear, area);
    let block = dialog_block("Añadir artículo");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    let items: Vec<ListItem> = app
        .products
        .iter()
        .map(|p| {
            ListItem::new(Line::from(vec![
                Span::raw(p.name.clone()),
                Span::styled(format!("  {}", format_eur(p.price)), theme::dim_style()),
            ]))
        })
        .collect();
    let mut state = ListState::default();
    if !app.products.is_empty() {
        state.select(Some(selected.min(app.products.len() - 1)));
    }
    let list = List::new(items)
        .highlight_style(theme::selected_style())
        .highlight_symbol("> ");
    f.render_stateful_widget(list, chunks[0], &mut state);

    f.render_widget(Paragraph::new(field_line("Cantidad", quantity, true)), chunks[1]);
    f.render_widget(Paragraph::new(hint_line()), chunks[2]);
}

fn draw_new_purchase(f: &mut Frame, supplier: &Input, total: &Input, note: &Input, focus: usize) {
    let area = centered_rect(52, 10, f.area());
    f.render_widget(Clear, area);
    let text = vec![
        field_line("Proveedor", supplier, focus == 0),
        Line::from(""),
        field_line("Importe (€)", total, focus == 1),
        Line::from(""),
        field_line("Nota", note, focus == 2),
        Line::from(""),
        hint_line(),
    ];
    f.render_widget(
        Paragraph::new(text).block(dialog_block("Nueva compra")),
        area,
    );
}

fn draw_pay_invoice(f: &mut Frame, app: &App, invoice_id: &str, selected: usize) {
    let area = centered_rect(44, 11, f.area());
    f.render_widget(Clear, area);

    let total = app
        .invoices
        .rows
        .iter()
        .find(|i| i.id == invoice_id)
        .map(|i| format_eur(i.total))
        .unwrap_or_default();

    let mut text = vec![Line::from(format!("Total: {total}")), Line::from("")];
    for (i, method) in PAY_METHODS.iter().enumerate() {
        let style = if i == selected {
            theme::selected_style()
        } else {
            Style::default().fg(theme::method_color(method))
        };
        text.push(Line::from(Span::styled(
            format!(" {} ", method.label()),
            style,
        )));
    }
    text.push(Line::from(""));
    text.push(hint_line());

    f.render_widget(
        Paragraph::new(text).block(dialog_block("Cobrar factura")),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guests_must_be_a_small_positive_number() {
        assert_eq!(parse_guests("4"), Some(4));
        assert_eq!(parse_guests(" 12 "), Some(12));
        assert_eq!(parse_guests("0"), None);
        assert_eq!(parse_guests("100"), None);
        assert_eq!(parse_guests("dos"), None);
        assert_eq!(parse_guests(""), None);
    }

    #[test]
    fn amounts_accept_the_decimal_comma() {
        assert_eq!(parse_amount("12,50"), Some(12.50));
        assert_eq!(parse_amount("12.50"), Some(12.50));
        assert_eq!(parse_amount(" 3 "), Some(3.0));
        assert_eq!(parse_amount("-1"), None);
        assert_eq!(parse_amount("0"), None);
        assert_eq!(parse_amount("abc"), None);
    }

    #[test]
    fn quantity_defaults_are_strict() {
        assert_eq!(parse_quantity("1"), Some(1));
        assert_eq!(parse_quantity("999"), Some(999));
        assert_eq!(parse_quantity("1000"), None);
        assert_eq!(parse_quantity(""), None);
    }
}
