//! Tables screen
//!
//! Card grid, four per row, grouped by the zone/name sort the fetch asks
//! for. Border color is the table status; arrows move the selection.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};
use shared::models::{DiningTable, TableStatus};
use tui_input::Input;

use crate::actions::{self, Ctx};
use crate::dialog::Dialog;
use crate::event::Toast;
use crate::state::App;
use crate::theme;
use crate::ui::empty_hint;

const COLUMNS: usize = 4;
const CELL_HEIGHT: u16 = 5;

pub fn handle_key(app: &mut App, ctx: &Ctx, key: KeyEvent) {
    match key.code {
        KeyCode::Left => app.tables.select_prev(),
        KeyCode::Right => app.tables.select_next(),
        KeyCode::Up => {
            app.tables.selected = app.tables.selected.saturating_sub(COLUMNS);
        }
        KeyCode::Down => {
            if !app.tables.is_empty() {
                app.tables.selected =
                    (app.tables.selected + COLUMNS).min(app.tables.rows.len() - 1);
            }
        }
        KeyCode::Char('s') => {
            let Some(table) = app.tables.current() else {
                return;
            };
            let (id, name, status) = (table.id.clone(), table.name.clone(), table.status.clone());
            if status.can_seat() {
                app.dialog = Some(Dialog::SeatTable {
                    table_id: id,
                    table_name: name,
                    guests: Input::new("2".to_string()),
                });
            } else {
                app.push_toast(Toast::error("La mesa no está libre"));
            }
        }
        KeyCode::Char('b') => {
            let Some(table) = app.tables.current() else {
                return;
            };
            let (id, status) = (table.id.clone(), table.status.clone());
            if status.can_bill() {
                actions::set_table_status(ctx, &id, TableStatus::Payment, "Cuenta solicitada");
            } else {
                app.push_toast(Toast::error("La mesa no tiene comanda abierta"));
            }
        }
        KeyCode::Char('f') => {
            let Some(table) = app.tables.current().cloned() else {
                return;
            };
            if table.status.can_free() {
                actions::free_table(ctx, &table);
            } else if table.status == TableStatus::Reserved {
                actions::set_table_status(ctx, &table.id, TableStatus::Available, "Reserva anulada");
            } else {
                app.push_toast(Toast::error("La mesa ya está libre"));
            }
        }
        KeyCode::Char('v') => {
            let Some(table) = app.tables.current() else {
                return;
            };
            let (id, status) = (table.id.clone(), table.status.clone());
            if status.can_reserve() {
                actions::set_table_status(ctx, &id, TableStatus::Reserved, "Mesa reservada");
            } else {
                app.push_toast(Toast::error("Solo se reservan mesas libres"));
            }
        }
        _ => {}
    }
}

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let tables = &app.tables.rows;
    if tables.is_empty() {
        empty_hint(f, area, "Sin mesas");
        return;
    }

    let visible_rows = (area.height / CELL_HEIGHT).max(1) as usize;
    let total_rows = tables.len().div_ceil(COLUMNS);
    let selected_row = app.tables.selected / COLUMNS;
    let first_row = if selected_row >= visible_rows {
        selected_row + 1 - visible_rows
    } else {
        0
    };

    for (offset, row_index) in (first_row..total_rows).take(visible_rows).enumerate() {
        let row_area = Rect {
            x: area.x,
            y: area.y + offset as u16 * CELL_HEIGHT,
            width: area.width,
            height: CELL_HEIGHT,
        };
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, COLUMNS as u32); COLUMNS])
            .split(row_area);
        for col in 0..COLUMNS {
            let index = row_index * COLUMNS + col;
            let Some(table) = tables.get(index) else {
                break;
            };
            draw_card(f, cells[col], table, index == app.tables.selected);
        }
    }
}

fn draw_card(f: &mut Frame, area: Rect, table: &DiningTable, selected: bool) {
    let color = theme::table_status_color(&table.status);
    let border_style = if selected {
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(color)
    };
    let zone = table.zone.as_deref().unwrap_or("—");
    let occupancy = if table.current_order_id.is_some() {
        format!("{} plazas · comanda abierta", table.capacity)
    } else {
        format!("{} plazas", table.capacity)
    };
    let lines = vec![
        Line::from(vec![
            Span::styled(
                table.name.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("  {zone}"), theme::dim_style()),
        ]),
        Line::from(occupancy),
        Line::from(Span::styled(
            table.status.label().to_string(),
            Style::default().fg(color),
        )),
    ];
    f.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).border_style(border_style)),
        area,
    );
}
