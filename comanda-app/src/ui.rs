//! Frame layout
//!
//! One pass per frame: header tabs, the active screen, the optional log
//! pane, a footer with key hints and the latest toast. Dialogs paint last so
//! they sit on top.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Tabs};
use tui_logger::{TuiLoggerLevelOutput, TuiLoggerWidget};

use crate::actions::Ctx;
use crate::dialog;
use crate::event::ToastLevel;
use crate::screens::{self, Screen};
use crate::state::App;
use crate::theme;

pub fn draw(f: &mut Frame, app: &App, ctx: &Ctx) {
    if app.session.is_none() {
        screens::login::draw(f, app);
        return;
    }

    let mut constraints = vec![Constraint::Length(3), Constraint::Min(0)];
    if app.show_logs {
        constraints.push(Constraint::Length(10));
    }
    constraints.push(Constraint::Length(1));
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(f.area());

    draw_header(f, app, chunks[0]);
    draw_body(f, app, ctx, chunks[1]);
    if app.show_logs {
        draw_logs(f, app, chunks[2]);
    }
    draw_footer(f, app, chunks[chunks.len() - 1]);

    dialog::draw(f, app);
}

fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(28)])
        .split(area);

    let titles: Vec<Line> = Screen::ALL
        .iter()
        .enumerate()
        .map(|(i, screen)| Line::from(format!("{} {}", i + 1, screen.title())))
        .collect();
    let tabs = Tabs::new(titles)
        .select(app.screen.index())
        .highlight_style(theme::selected_style())
        .block(Block::default().borders(Borders::ALL).title(" COMANDA "));
    f.render_widget(tabs, chunks[0]);

    let clock = chrono::Local::now().format("%H:%M");
    let who = Paragraph::new(Line::from(vec![
        Span::styled(
            app.display_name(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" · {clock} "), theme::dim_style()),
    ]))
    .alignment(Alignment::Right)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(who, chunks[1]);
}

fn draw_body(f: &mut Frame, app: &App, ctx: &Ctx, area: Rect) {
    match app.screen {
        Screen::Tables => screens::tables::draw(f, app, area),
        Screen::Orders => screens::orders::draw(f, app, area),
        Screen::Kitchen => screens::kitchen::draw(f, app, area),
        Screen::Inventory => screens::inventory::draw(f, app, area),
        Screen::Purchases => screens::purchases::draw(f, app, area),
        Screen::Invoices => screens::invoices::draw(f, app, area),
        Screen::Payments => screens::payments::draw(f, app, area),
        Screen::Reports => screens::reports::draw(f, app, ctx, area),
    }
}

fn draw_logs(f: &mut Frame, app: &App, area: Rect) {
    let widget = TuiLoggerWidget::default()
        .block(
            Block::default()
                .title(" Registro · [PgUp]/[PgDn] desplazar, [l] cerrar ")
                .border_style(Style::default().fg(Color::White).add_modifier(Modifier::DIM))
                .borders(Borders::ALL),
        )
        .output_separator('|')
        .output_timestamp(Some("%H:%M:%S".to_string()))
        .output_level(Some(TuiLoggerLevelOutput::Abbreviated))
        .output_target(false)
        .output_file(false)
        .output_line(false)
        .style(Style::default().fg(Color::White))
        .state(&app.logger_state);
    f.render_widget(widget, area);
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(44)])
        .split(area);

    let hints = format!(
        " {}   [Tab] pestaña  [r] actualizar  [l] registro  [q] salir",
        app.screen.key_hints()
    );
    f.render_widget(
        Paragraph::new(Span::styled(hints, theme::dim_style())),
        chunks[0],
    );

    if let Some(active) = app.latest_toast() {
        let style = Style::default()
            .fg(toast_color(&active.toast.level))
            .add_modifier(Modifier::BOLD);
        let text = Paragraph::new(Span::styled(format!("{} ", active.toast.text), style))
            .alignment(Alignment::Right);
        f.render_widget(text, chunks[1]);
    }
}

fn toast_color(level: &ToastLevel) -> Color {
    match level {
        ToastLevel::Info => Color::Cyan,
        ToastLevel::Success => Color::Green,
        ToastLevel::Error => Color::Red,
    }
}

/// Fixed-size rect centered in `area`, clamped to fit.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;
    Rect::new(x, y, width, height)
}

/// Dim placeholder centered inside an otherwise empty panel.
pub fn empty_hint(f: &mut Frame, area: Rect, text: &str) {
    let rect = centered_rect(area.width.saturating_sub(2), 1, area);
    let line = Line::from(Span::styled(text.to_string(), theme::dim_style()));
    f.render_widget(Paragraph::new(line).alignment(Alignment::Center), rect);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_rect_stays_inside_the_area() {
        let area = Rect::new(2, 3, 40, 20);
        let rect = centered_rect(10, 5, area);
        assert_eq!(rect, Rect::new(17, 10, 10, 5));

        let oversized = centered_rect(100, 100, area);
        assert_eq!(oversized, area);
    }
}
