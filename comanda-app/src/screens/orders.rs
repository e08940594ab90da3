//! Orders screen
//!
//! Today's orders on the left, the selected one broken down on the right.
//! Lifecycle actions work on the selection; new orders and new lines go
//! through dialogs.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use shared::models::{Order, OrderStatus};
use shared::money::format_eur;
use tui_input::Input;

use crate::actions::{self, Ctx};
use crate::dialog::Dialog;
use crate::event::Toast;
use crate::screens::Screen;
use crate::state::App;
use crate::theme;
use crate::ui::empty_hint;

pub fn handle_key(app: &mut App, ctx: &Ctx, key: KeyEvent) {
    match key.code {
        KeyCode::Up => app.orders.select_prev(),
        KeyCode::Down => app.orders.select_next(),
        KeyCode::Char('a') => {
            let Some(order) = app.orders.current() else {
                return;
            };
            let (id, status) = (order.id.clone(), order.status.clone());
            match status.advance() {
                Some(next) => actions::set_order_status(ctx, &id, next, Screen::Orders),
                None => app.push_toast(Toast::error("La comanda ya está cerrada")),
            }
        }
        KeyCode::Char('c') => {
            let Some(order) = app.orders.current() else {
                return;
            };
            let (id, status) = (order.id.clone(), order.status.clone());
            if status.is_open() {
                actions::set_order_status(ctx, &id, OrderStatus::Cancelled, Screen::Orders);
            } else {
                app.push_toast(Toast::error("La comanda ya está cerrada"));
            }
        }
        KeyCode::Char('n') => {
            app.dialog = Some(Dialog::NewOrder {
                table_name: Input::default(),
                guests: Input::new("2".to_string()),
                focus: 0,
            });
        }
        KeyCode::Char('i') => {
            let Some(order) = app.orders.current() else {
                return;
            };
            let (id, status) = (order.id.clone(), order.status.clone());
            if !status.is_open() {
                app.push_toast(Toast::error("La comanda ya está cerrada"));
                return;
            }
            if app.products.is_empty() {
                actions::load_catalog(ctx);
                app.push_toast(Toast::info("Cargando la carta, prueba de nuevo"));
                return;
            }
            app.dialog = Some(Dialog::AddItem {
                order_id: id,
                selected: 0,
                quantity: Input::new("1".to_string()),
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
        .title(format!(" Comandas de hoy ({}) ", app.orders.rows.len()));
    if app.orders.is_empty() {
        f.render_widget(block, area);
        empty_hint(f, area, "Sin comandas hoy");
        return;
    }

    let items: Vec<ListItem> = app
        .orders
        .rows
        .iter()
        .map(|order| {
            let time = order
                .created_at
                .with_timezone(&chrono::Local)
                .format("%H:%M");
            let table = order.table_name.as_deref().unwrap_or("—");
            let guests = order
                .guest_count
                .map(|g| format!("{g}p"))
                .unwrap_or_default();
            ListItem::new(Line::from(vec![
                Span::styled(format!("{time}  "), theme::dim_style()),
                Span::styled(
                    format!("{table:<8.8}"),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!("{guests:<4}")),
                Span::raw(format!("{:>10}  ", format_eur(order.total))),
                Span::styled(
                    order.status.label().to_string(),
                    Style::default().fg(theme::order_status_color(&order.status)),
                ),
            ]))
        })
        .collect();

    let mut state = ListState::default();
    state.select(Some(app.orders.selected));
    let list = List::new(items)
        .block(block)
        .highlight_style(theme::selected_style())
        .highlight_symbol("> ");
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_detail(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Detalle ");
    let Some(order) = app.orders.current() else {
        f.render_widget(block, area);
        return;
    };

    let mut lines = detail_lines(order);
    lines.truncate(area.height.saturating_sub(2) as usize);
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn detail_lines(order: &Order) -> Vec<Line<'static>> {
    let table = order.table_name.as_deref().unwrap_or("—");
    let guests = order
        .guest_count
        .map(|g| format!("{g} comensales"))
        .unwrap_or_else(|| "sin comensales".to_string());
    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                table.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(" · {guests} · ")),
            Span::styled(
                order.status.label().to_string(),
                Style::default().fg(theme::order_status_color(&order.status)),
            ),
        ]),
        Line::from(""),
    ];

    if order.items.is_empty() {
        lines.push(Line::from(Span::styled("(sin artículos)", theme::dim_style())));
    }
    for item in &order.items {
        lines.push(Line::from(format!(
            "{:>3}× {:<24.24} {:>10}",
            item.quantity,
            item.name,
            format_eur(item.line_total()),
        )));
        if let Some(note) = &item.note {
            lines.push(Line::from(Span::styled(
                format!("      {note}"),
                theme::dim_style(),
            )));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("Total {:>29}", format_eur(order.total)),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    if let Some(note) = &order.note {
        lines.push(Line::from(Span::styled(
            format!("Nota: {note}"),
            theme::dim_style(),
        )));
    }
    lines.push(Line::from(Span::styled(
        format!(
            "Creada {}",
            order
                .created_at
                .with_timezone(&chrono::Local)
                .format("%H:%M")
        ),
        theme::dim_style(),
    )));
    lines
}
