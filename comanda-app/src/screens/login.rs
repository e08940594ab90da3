//! Sign-in screen
//!
//! Shown until a session exists. Tab moves between fields, Enter submits;
//! the form locks while the sign-in is in flight.

use crossterm::event::{Event, KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;

use crate::actions::{self, Ctx};
use crate::state::{App, LoginField};
use crate::theme;
use crate::ui::centered_rect;

pub fn handle_key(app: &mut App, ctx: &Ctx, key: KeyEvent) {
    if app.login.busy {
        return;
    }
    match key.code {
        KeyCode::Tab | KeyCode::Down | KeyCode::Up | KeyCode::BackTab => {
            app.login.focus = match app.login.focus {
                LoginField::Email => LoginField::Password,
                LoginField::Password => LoginField::Email,
            };
        }
        KeyCode::Enter => {
            let email = app.login.email.value().trim().to_string();
            let password = app.login.password.value().to_string();
            if email.is_empty() || password.is_empty() {
                app.login.error = Some("Introduce correo y contraseña".to_string());
                return;
            }
            app.login.busy = true;
            app.login.error = None;
            actions::sign_in(ctx, email, password);
        }
        _ => {
            let field = match app.login.focus {
                LoginField::Email => &mut app.login.email,
                LoginField::Password => &mut app.login.password,
            };
            field.handle_event(&Event::Key(key));
        }
    }
}

pub fn draw(f: &mut Frame, app: &App) {
    let panel = centered_rect(54, 14, f.area());
    let block = Block::default()
        .title(" COMANDA · acceso ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let inner = block.inner(panel);
    f.render_widget(block, panel);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // spacer
            Constraint::Length(3), // email
            Constraint::Length(3), // password
            Constraint::Length(1), // status
            Constraint::Length(1), // spacer
            Constraint::Length(1), // hint
        ])
        .split(inner);

    draw_field(
        f,
        chunks[1],
        "Correo",
        &app.login.email,
        app.login.focus == LoginField::Email,
        false,
    );
    draw_field(
        f,
        chunks[2],
        "Contraseña",
        &app.login.password,
        app.login.focus == LoginField::Password,
        true,
    );

    let status = if app.login.busy {
        Line::from(Span::styled("Conectando…", Style::default().fg(Color::Yellow)))
    } else if let Some(error) = &app.login.error {
        Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        ))
    } else {
        Line::from("")
    };
    f.render_widget(Paragraph::new(status).alignment(Alignment::Center), chunks[3]);

    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            "[Tab] cambiar campo   [Enter] entrar   [Esc] salir",
            theme::dim_style(),
        )))
        .alignment(Alignment::Center),
        chunks[5],
    );
}

fn draw_field(f: &mut Frame, area: Rect, label: &str, input: &Input, focused: bool, mask: bool) {
    let style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Gray)
    };
    let shown = if mask {
        "•".repeat(input.value().chars().count())
    } else {
        input.value().to_string()
    };
    let width = area.width.max(3) - 3;
    let scroll = input.visual_scroll(width as usize);
    f.render_widget(
        Paragraph::new(shown)
            .style(style)
            .scroll((0, scroll as u16))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(style)
                    .title(format!(" {label} ")),
            ),
        area,
    );
    if focused {
        f.set_cursor_position((
            area.x + ((input.visual_cursor().max(scroll) - scroll) as u16) + 1,
            area.y + 1,
        ));
    }
}
