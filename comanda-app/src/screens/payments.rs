//! Payments screen
//!
//! Kept live by the change feed while visible; rows arrive pushed, not
//! polled. The method gauges are recomputed from the rows on every frame.

use crossterm::event::KeyEvent;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Gauge, List, ListItem};
use shared::money::format_eur;

use crate::actions::Ctx;
use crate::reports;
use crate::state::App;
use crate::theme;
use crate::ui::empty_hint;

/// No keys of its own: rows arrive over the feed, newest on top.
pub fn handle_key(_app: &mut App, _ctx: &Ctx, _key: KeyEvent) {}

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let breakdown = reports::payments_by_method(&app.payments);
    let gauge_height = breakdown.len().max(1) as u16 + 2;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(gauge_height), Constraint::Min(0)])
        .split(area);
    draw_breakdown(f, app, chunks[0], &breakdown);
    draw_list(f, app, chunks[1]);
}

fn draw_breakdown(f: &mut Frame, app: &App, area: Rect, breakdown: &[reports::MethodBreakdown]) {
    let mut title = vec![Span::raw(" Desglose por método ")];
    if app.feed.is_some() {
        title.push(Span::styled(
            "● en vivo ",
            Style::default().fg(Color::Green),
        ));
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Line::from(title));
    let inner = block.inner(area);
    f.render_widget(block, area);
    if breakdown.is_empty() {
        f.render_widget(
            Line::from(Span::styled("Sin pagos", theme::dim_style())),
            inner,
        );
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(1); breakdown.len()])
        .split(inner);
    for (i, row) in breakdown.iter().enumerate() {
        if i >= rows.len() {
            break;
        }
        let gauge = Gauge::default()
            .ratio((row.share / 100.0).clamp(0.0, 1.0))
            .gauge_style(
                Style::default()
                    .fg(theme::method_color(&row.method))
                    .bg(Color::DarkGray),
            )
            .label(format!(
                "{} · {} · {:.0}%",
                row.method.label(),
                format_eur(row.total),
                row.share
            ))
            .use_unicode(true);
        f.render_widget(gauge, rows[i]);
    }
}

fn draw_list(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Últimos pagos ({}) ", app.payments.len()));
    if app.payments.is_empty() {
        f.render_widget(block, area);
        empty_hint(f, area, "Sin pagos registrados");
        return;
    }

    let items: Vec<ListItem> = app
        .payments
        .iter()
        .map(|payment| {
            let time = payment
                .paid_at
                .with_timezone(&chrono::Local)
                .format("%d/%m %H:%M");
            ListItem::new(Line::from(vec![
                Span::styled(format!("{time}  "), theme::dim_style()),
                Span::styled(
                    format!("{:<14.14}", payment.method.label()),
                    Style::default().fg(theme::method_color(&payment.method)),
                ),
                Span::raw(format!("{:>10}  ", format_eur(payment.amount))),
                Span::styled(
                    payment.reference.clone().unwrap_or_default(),
                    theme::dim_style(),
                ),
            ]))
        })
        .collect();

    f.render_widget(List::new(items).block(block), area);
}
