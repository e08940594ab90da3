//! Invoices screen
//!
//! Draft → Issued → Paid, with Void as the escape hatch. Issuing assigns the
//! document number; paying records the payment row before the status patch.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Row, Table, TableState};
use shared::models::InvoiceStatus;
use shared::money::format_eur;

use crate::actions::{self, Ctx};
use crate::dialog::Dialog;
use crate::event::Toast;
use crate::state::App;
use crate::theme;
use crate::ui::empty_hint;

pub fn handle_key(app: &mut App, ctx: &Ctx, key: KeyEvent) {
    match key.code {
        KeyCode::Up => app.invoices.select_prev(),
        KeyCode::Down => app.invoices.select_next(),
        KeyCode::Char('i') => {
            let Some(invoice) = app.invoices.current() else {
                return;
            };
            let (id, status) = (invoice.id.clone(), invoice.status.clone());
            if status == InvoiceStatus::Draft {
                actions::issue_invoice(ctx, &id);
            } else {
                app.push_toast(Toast::error("Solo se emiten borradores"));
            }
        }
        KeyCode::Char('p') => {
            let Some(invoice) = app.invoices.current() else {
                return;
            };
            let (id, status) = (invoice.id.clone(), invoice.status.clone());
            if status == InvoiceStatus::Issued {
                app.dialog = Some(Dialog::PayInvoice {
                    invoice_id: id,
                    selected: 0,
                });
            } else {
                app.push_toast(Toast::error("La factura no está emitida"));
            }
        }
        KeyCode::Char('v') => {
            let Some(invoice) = app.invoices.current() else {
                return;
            };
            let (id, status) = (invoice.id.clone(), invoice.status.clone());
            if matches!(status, InvoiceStatus::Draft | InvoiceStatus::Issued) {
                actions::void_invoice(ctx, &id);
            } else {
                app.push_toast(Toast::error("La factura no se puede anular"));
            }
        }
        KeyCode::Char('x') => {
            let Some(invoice) = app.invoices.current().cloned() else {
                return;
            };
            actions::export_invoice_html(ctx, app, &invoice);
        }
        _ => {}
    }
}

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Facturas ({}) ", app.invoices.rows.len()));
    if app.invoices.is_empty() {
        f.render_widget(block, area);
        empty_hint(f, area, "Sin facturas");
        return;
    }

    let header = Row::new(["Número", "Cliente", "Base", "IVA", "Total", "Estado", "Emitida"])
        .style(Style::default().add_modifier(Modifier::BOLD))
        .bottom_margin(1);
    let rows = app.invoices.rows.iter().map(|invoice| {
        let issued = invoice
            .issued_at
            .map(|t| {
                t.with_timezone(&chrono::Local)
                    .format("%d/%m %H:%M")
                    .to_string()
            })
            .unwrap_or_else(|| "—".to_string());
        Row::new(vec![
            Cell::from(invoice.number.clone().unwrap_or_else(|| "—".to_string())),
            Cell::from(
                invoice
                    .customer_name
                    .clone()
                    .unwrap_or_else(|| "(sin cliente)".to_string()),
            ),
            Cell::from(format_eur(invoice.subtotal)),
            Cell::from(format_eur(invoice.tax)),
            Cell::from(format_eur(invoice.total)),
            Cell::from(Span::styled(
                invoice.status.label().to_string(),
                Style::default().fg(theme::invoice_status_color(&invoice.status)),
            )),
            Cell::from(issued),
        ])
    });
    let widths = [
        Constraint::Length(16),
        Constraint::Min(16),
        Constraint::Length(11),
        Constraint::Length(10),
        Constraint::Length(11),
        Constraint::Length(10),
        Constraint::Length(12),
    ];

    let mut state = TableState::default();
    state.select(Some(app.invoices.selected));
    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(theme::selected_style())
        .highlight_symbol("> ");
    f.render_stateful_widget(table, area, &mut state);
}
