//! Kitchen display
//!
//! Three columns mirror the preparation pipeline. Tickets come pre-sorted
//! oldest first, so Up/Down walks them in age order across columns.

use chrono::{DateTime, Utc};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};
use shared::models::{Order, OrderStatus};

use crate::actions::{self, Ctx};
use crate::screens::Screen;
use crate::state::App;
use crate::theme;
use crate::ui::empty_hint;

/// A ticket waiting longer than this shows its age in red.
const LATE_MINUTES: i64 = 20;

const COLUMNS: [OrderStatus; 3] = [
    OrderStatus::Pending,
    OrderStatus::Preparing,
    OrderStatus::Ready,
];

pub fn handle_key(app: &mut App, ctx: &Ctx, key: KeyEvent) {
    match key.code {
        KeyCode::Up | KeyCode::Left => app.kitchen.select_prev(),
        KeyCode::Down | KeyCode::Right => app.kitchen.select_next(),
        KeyCode::Char('a') => {
            let Some(order) = app.kitchen.current() else {
                return;
            };
            let (id, status) = (order.id.clone(), order.status.clone());
            if let Some(next) = status.advance() {
                actions::set_order_status(ctx, &id, next, Screen::Kitchen);
            }
        }
        KeyCode::Char('d') => {
            let Some(order) = app.kitchen.current() else {
                return;
            };
            let id = order.id.clone();
            actions::set_order_status(ctx, &id, OrderStatus::Delivered, Screen::Kitchen);
        }
        _ => {}
    }
}

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    if app.kitchen.is_empty() {
        let block = Block::default().borders(Borders::ALL).title(" Cocina ");
        f.render_widget(block, area);
        empty_hint(f, area, "Nada en cocina");
        return;
    }

    let now = Utc::now();
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);
    for (column, status) in COLUMNS.iter().enumerate() {
        draw_column(f, app, chunks[column], status, now);
    }
}

fn draw_column(f: &mut Frame, app: &App, area: Rect, status: &OrderStatus, now: DateTime<Utc>) {
    let tickets: Vec<(usize, &Order)> = app
        .kitchen
        .rows
        .iter()
        .enumerate()
        .filter(|(_, order)| order.status == *status)
        .collect();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ({}) ", status.label(), tickets.len()))
        .border_style(Style::default().fg(theme::order_status_color(status)));

    let selected = tickets
        .iter()
        .position(|(index, _)| *index == app.kitchen.selected);
    let items: Vec<ListItem> = tickets
        .iter()
        .map(|(_, order)| ticket_item(order, now))
        .collect();

    let mut state = ListState::default();
    state.select(selected);
    let list = List::new(items)
        .block(block)
        .highlight_style(theme::selected_style());
    f.render_stateful_widget(list, area, &mut state);
}

fn ticket_item(order: &Order, now: DateTime<Utc>) -> ListItem<'static> {
    let minutes = (now - order.created_at).num_minutes().max(0);
    let age_style = if minutes >= LATE_MINUTES {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        theme::dim_style()
    };
    let table = order.table_name.clone().unwrap_or_else(|| "—".to_string());
    let mut lines = vec![Line::from(vec![
        Span::styled(table, Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" · "),
        Span::styled(age_label(minutes), age_style),
    ])];
    if order.items.is_empty() {
        lines.push(Line::from(Span::styled(
            "  (sin artículos)",
            theme::dim_style(),
        )));
    }
    for item in &order.items {
        lines.push(Line::from(format!("  {}× {:.20}", item.quantity, item.name)));
    }
    lines.push(Line::from(""));
    ListItem::new(lines)
}

fn age_label(minutes: i64) -> String {
    if minutes >= 60 {
        format!("{}h{:02}", minutes / 60, minutes % 60)
    } else {
        format!("{minutes}m")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn age_label_switches_to_hours() {
        assert_eq!(age_label(0), "0m");
        assert_eq!(age_label(59), "59m");
        assert_eq!(age_label(60), "1h00");
        assert_eq!(age_label(125), "2h05");
    }
}
