//! Purchases screen
//!
//! Supplier orders on the left, lines of the selected one on the right.
//! Receiving a purchase is the backend's cue to restock linked inventory.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use shared::models::{Purchase, PurchaseStatus};
use shared::money::format_eur;
use tui_input::Input;

use crate::actions::{self, Ctx};
use crate::dialog::Dialog;
use crate::event::Toast;
use crate::state::App;
use crate::theme;
use crate::ui::empty_hint;

pub fn handle_key(app: &mut App, ctx: &Ctx, key: KeyEvent) {
    match key.code {
        KeyCode::Up => app.purchases.select_prev(),
        KeyCode::Down => app.purchases.select_next(),
        KeyCode::Char('R') => {
            let Some(purchase) = app.purchases.current() else {
                return;
            };
            let (id, status) = (purchase.id.clone(), purchase.status.clone());
            if status == PurchaseStatus::Ordered {
                actions::receive_purchase(ctx, &id);
            } else {
                app.push_toast(Toast::error("La compra no está pendiente"));
            }
        }
        KeyCode::Char('n') => {
            app.dialog = Some(Dialog::NewPurchase {
                supplier: Input::default(),
                total: Input::default(),
                note: Input::default(),
                focus: 0,
            });
        }
        _ => {}
    }
}

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);
    draw_list(f, app, chunks[0]);
    draw_detail(f, app, chunks[1]);
}

fn draw_list(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Compras ({}) ", app.purchases.rows.len()));
    if app.purchases.is_empty() {
        f.render_widget(block, area);
        empty_hint(f, area, "Sin compras registradas");
        return;
    }

    let items: Vec<ListItem> = app
        .purchases
        .rows
        .iter()
        .map(|purchase| {
            let date = purchase
                .created_at
                .with_timezone(&chrono::Local)
                .format("%d/%m");
            let supplier = purchase
                .supplier_name
                .as_deref()
                .unwrap_or("(sin proveedor)");
            ListItem::new(Line::from(vec![
                Span::styled(format!("{date}  "), theme::dim_style()),
                Span::raw(format!("{supplier:<18.18}")),
                Span::raw(format!("{:>10}  ", format_eur(purchase.total))),
                Span::styled(
                    purchase.status.label().to_string(),
                    Style::default().fg(theme::purchase_status_color(&purchase.status)),
                ),
            ]))
        })
        .collect();

    let mut state = ListState::default();
    state.select(Some(app.purchases.selected));
    let list = List::new(items)
        .block(block)
        .highlight_style(theme::selected_style())
        .highlight_symbol("> ");
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_detail(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Detalle ");
    let Some(purchase) = app.purchases.current() else {
        f.render_widget(block, area);
        return;
    };

    let mut lines = detail_lines(purchase);
    lines.truncate(area.height.saturating_sub(2) as usize);
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn detail_lines(purchase: &Purchase) -> Vec<Line<'static>> {
    let supplier = purchase
        .supplier_name
        .as_deref()
        .unwrap_or("(sin proveedor)");
    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                supplier.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(" · "),
            Span::styled(
                purchase.status.label().to_string(),
                Style::default().fg(theme::purchase_status_color(&purchase.status)),
            ),
        ]),
        Line::from(""),
    ];

    if purchase.items.is_empty() {
        lines.push(Line::from(Span::styled("(sin líneas)", theme::dim_style())));
    }
    for item in &purchase.items {
        lines.push(Line::from(format!(
            "{:>8}× {:<20.20} {:>10}",
            format!("{:.2}", item.quantity).replace('.', ","),
            item.name,
            format_eur(item.line_total()),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("Total {:>30}", format_eur(purchase.total)),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    if let Some(note) = &purchase.note {
        lines.push(Line::from(Span::styled(
            format!("Nota: {note}"),
            theme::dim_style(),
        )));
    }
    lines.push(Line::from(Span::styled(
        format!(
            "Pedida {}",
            purchase
                .created_at
                .with_timezone(&chrono::Local)
                .format("%d/%m %H:%M")
        ),
        theme::dim_style(),
    )));
    if let Some(received) = purchase.received_at {
        lines.push(Line::from(Span::styled(
            format!(
                "Recibida {}",
                received.with_timezone(&chrono::Local).format("%d/%m %H:%M")
            ),
            theme::dim_style(),
        )));
    }
    lines
}
