//! Inventory screen
//!
//! Stock table with the `inventory_stats` summary on top. Quantity nudges go
//! through the backend function so concurrent terminals cannot clobber each
//! other.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};
use shared::money::format_eur;

use crate::actions::{self, Ctx};
use crate::state::App;
use crate::theme;
use crate::ui::empty_hint;

pub fn handle_key(app: &mut App, ctx: &Ctx, key: KeyEvent) {
    match key.code {
        KeyCode::Up => app.inventory.select_prev(),
        KeyCode::Down => app.inventory.select_next(),
        KeyCode::Char('+') => adjust(app, ctx, 1.0),
        KeyCode::Char('-') => adjust(app, ctx, -1.0),
        _ => {}
    }
}

fn adjust(app: &App, ctx: &Ctx, delta: f64) {
    let Some(item) = app.inventory.current() else {
        return;
    };
    actions::adjust_stock(ctx, &item.id, delta);
}

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);
    draw_stats(f, app, chunks[0]);
    draw_table(f, app, chunks[1]);
}

fn draw_stats(f: &mut Frame, app: &App, area: Rect) {
    let boxes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    let stats = &app.inventory_stats;
    stat_box(
        f,
        boxes[0],
        "Artículos",
        stats.item_count.to_string(),
        Color::White,
    );
    stat_box(
        f,
        boxes[1],
        "Valor de almacén",
        format_eur(stats.stock_value),
        Color::Cyan,
    );
    stat_box(
        f,
        boxes[2],
        "Bajo mínimo",
        stats.low_stock_count.to_string(),
        if stats.low_stock_count > 0 {
            Color::Red
        } else {
            Color::Green
        },
    );
}

fn stat_box(f: &mut Frame, area: Rect, label: &str, value: String, color: Color) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {label} "));
    let text = Paragraph::new(Line::from(Span::styled(
        value,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(block);
    f.render_widget(text, area);
}

fn draw_table(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Almacén ({}) ", app.inventory.rows.len()));
    if app.inventory.is_empty() {
        f.render_widget(block, area);
        empty_hint(f, area, "Sin artículos en almacén");
        return;
    }

    let header = Row::new(["Artículo", "Unidad", "Cantidad", "Mínimo", "Coste", "Valor"])
        .style(Style::default().add_modifier(Modifier::BOLD))
        .bottom_margin(1);
    let rows = app.inventory.rows.iter().map(|item| {
        let style = if item.is_low() {
            Style::default().fg(Color::Red)
        } else {
            Style::default()
        };
        Row::new(vec![
            Cell::from(item.name.clone()),
            Cell::from(item.unit.clone()),
            Cell::from(fmt_qty(item.quantity)),
            Cell::from(fmt_qty(item.min_quantity)),
            Cell::from(format_eur(item.unit_cost)),
            Cell::from(format_eur(item.stock_value())),
        ])
        .style(style)
    });
    let widths = [
        Constraint::Min(20),
        Constraint::Length(7),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(12),
        Constraint::Length(12),
    ];

    let mut state = TableState::default();
    state.select(Some(app.inventory.selected));
    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(theme::selected_style())
        .highlight_symbol("> ");
    f.render_stateful_widget(table, area, &mut state);
}

/// Quantities print with a decimal comma, same locale as the amounts.
fn fmt_qty(quantity: f64) -> String {
    format!("{quantity:.2}").replace('.', ",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantities_use_decimal_comma() {
        assert_eq!(fmt_qty(3.5), "3,50");
        assert_eq!(fmt_qty(0.0), "0,00");
        assert_eq!(fmt_qty(12.345), "12,35");
    }
}
