//! Reports screen
//!
//! Four aggregations over one fetched window. Changing the range refetches;
//! everything else is recomputed from the cached rows on each frame.

use std::rc::Rc;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use shared::money::{self, format_eur};

use crate::actions::{self, Ctx};
use crate::reports::{self, ReportRange};
use crate::state::App;
use crate::theme;
use crate::ui::empty_hint;

pub fn handle_key(app: &mut App, ctx: &Ctx, key: KeyEvent) {
    match key.code {
        KeyCode::Char('d') => set_range(app, ctx, ReportRange::Today),
        KeyCode::Char('w') => set_range(app, ctx, ReportRange::Week),
        KeyCode::Char('m') => set_range(app, ctx, ReportRange::Month),
        KeyCode::Char('e') => actions::export_report_csv(ctx, app),
        KeyCode::Char('h') => actions::export_report_html(ctx, app),
        _ => {}
    }
}

fn set_range(app: &mut App, ctx: &Ctx, range: ReportRange) {
    if app.report_range == range {
        return;
    }
    app.report_range = range;
    actions::load_report(ctx, range);
}

pub fn draw(f: &mut Frame, app: &App, ctx: &Ctx, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Ratio(1, 2),
            Constraint::Ratio(1, 2),
        ])
        .split(area);
    draw_selector(f, app, chunks[0]);

    let top = split_half(chunks[1]);
    let bottom = split_half(chunks[2]);
    draw_sales(f, app, ctx, top[0]);
    draw_methods(f, app, top[1]);
    draw_suppliers(f, app, bottom[0]);
    draw_top(f, app, bottom[1]);
}

fn split_half(area: Rect) -> Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)])
        .split(area)
}

fn draw_selector(f: &mut Frame, app: &App, area: Rect) {
    let mut spans = Vec::new();
    for (key, range) in [
        ("d", ReportRange::Today),
        ("w", ReportRange::Week),
        ("m", ReportRange::Month),
    ] {
        let style = if app.report_range == range {
            theme::selected_style()
        } else {
            Style::default()
        };
        spans.push(Span::raw(" "));
        spans.push(Span::styled(format!(" [{key}] {} ", range.label()), style));
    }
    spans.push(Span::styled(
        "   [e] exportar CSV  [h] exportar HTML",
        theme::dim_style(),
    ));
    let block = Block::default().borders(Borders::ALL).title(" Rango ");
    f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn draw_sales(f: &mut Frame, app: &App, ctx: &Ctx, area: Rect) {
    let days = reports::sales_by_day(&app.report.orders, ctx.cutoff_hour);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Ventas por día ");
    if days.is_empty() {
        f.render_widget(block, area);
        empty_hint(f, area, "Sin ventas");
        return;
    }

    let total_orders: usize = days.iter().map(|d| d.orders).sum();
    let total_cents: i64 = days.iter().map(|d| money::eur_to_cents(d.revenue)).sum();
    let header = Row::new(["Día", "Comandas", "Ingresos", "Ticket medio"])
        .style(Style::default().add_modifier(Modifier::BOLD))
        .bottom_margin(1);
    let mut rows: Vec<Row> = days
        .iter()
        .map(|d| {
            Row::new(vec![
                Cell::from(d.day.format("%d/%m").to_string()),
                Cell::from(d.orders.to_string()),
                Cell::from(format_eur(d.revenue)),
                Cell::from(format_eur(d.average_ticket)),
            ])
        })
        .collect();
    rows.push(
        Row::new(vec![
            Cell::from("Total"),
            Cell::from(total_orders.to_string()),
            Cell::from(format_eur(money::cents_to_eur(total_cents))),
            Cell::from(""),
        ])
        .style(Style::default().add_modifier(Modifier::BOLD)),
    );
    let widths = [
        Constraint::Length(6),
        Constraint::Length(9),
        Constraint::Min(11),
        Constraint::Min(12),
    ];
    f.render_widget(Table::new(rows, widths).header(header).block(block), area);
}

fn draw_methods(f: &mut Frame, app: &App, area: Rect) {
    let breakdown = reports::payments_by_method(&app.report.payments);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Pagos por método ");
    if breakdown.is_empty() {
        f.render_widget(block, area);
        empty_hint(f, area, "Sin pagos");
        return;
    }

    let header = Row::new(["Método", "Nº", "Total", "%"])
        .style(Style::default().add_modifier(Modifier::BOLD))
        .bottom_margin(1);
    let rows = breakdown.iter().map(|row| {
        Row::new(vec![
            Cell::from(Span::styled(
                row.method.label().to_string(),
                Style::default().fg(theme::method_color(&row.method)),
            )),
            Cell::from(row.count.to_string()),
            Cell::from(format_eur(row.total)),
            Cell::from(fmt_pct(row.share)),
        ])
    });
    let widths = [
        Constraint::Min(14),
        Constraint::Length(5),
        Constraint::Length(11),
        Constraint::Length(7),
    ];
    f.render_widget(Table::new(rows, widths).header(header).block(block), area);
}

fn draw_suppliers(f: &mut Frame, app: &App, area: Rect) {
    let breakdown = reports::purchases_by_supplier(&app.report.purchases);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Compras por proveedor ");
    if breakdown.is_empty() {
        f.render_widget(block, area);
        empty_hint(f, area, "Sin compras");
        return;
    }

    let header = Row::new(["Proveedor", "Nº", "Total", "%"])
        .style(Style::default().add_modifier(Modifier::BOLD))
        .bottom_margin(1);
    let rows = breakdown.iter().enumerate().map(|(i, row)| {
        Row::new(vec![
            Cell::from(Span::styled(
                row.supplier.clone(),
                Style::default().fg(theme::chart_color(i)),
            )),
            Cell::from(row.count.to_string()),
            Cell::from(format_eur(row.total)),
            Cell::from(fmt_pct(row.share)),
        ])
    });
    let widths = [
        Constraint::Min(16),
        Constraint::Length(5),
        Constraint::Length(11),
        Constraint::Length(7),
    ];
    f.render_widget(Table::new(rows, widths).header(header).block(block), area);
}

fn draw_top(f: &mut Frame, app: &App, area: Rect) {
    let ranking = reports::top_products(&app.report.orders, actions::TOP_PRODUCTS);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Productos más vendidos ");
    if ranking.is_empty() {
        f.render_widget(block, area);
        empty_hint(f, area, "Sin ventas");
        return;
    }

    let header = Row::new(["#", "Producto", "Uds", "Ingresos"])
        .style(Style::default().add_modifier(Modifier::BOLD))
        .bottom_margin(1);
    let rows = ranking.iter().enumerate().map(|(i, row)| {
        Row::new(vec![
            Cell::from(format!("{}", i + 1)),
            Cell::from(row.name.clone()),
            Cell::from(row.quantity.to_string()),
            Cell::from(format_eur(row.revenue)),
        ])
    });
    let widths = [
        Constraint::Length(3),
        Constraint::Min(18),
        Constraint::Length(6),
        Constraint::Length(11),
    ];
    f.render_widget(Table::new(rows, widths).header(header).block(block), area);
}

/// Percentages print with a decimal comma, same locale as the amounts.
fn fmt_pct(share: f64) -> String {
    format!("{share:.1} %").replace('.', ",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentages_use_decimal_comma() {
        assert_eq!(fmt_pct(33.333), "33,3 %");
        assert_eq!(fmt_pct(100.0), "100,0 %");
    }
}
