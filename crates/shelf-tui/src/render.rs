//! Pure view/render functions for the TUI.
//!
//! Functions here take `&AppState`, draw to a ratatui Frame, and never mutate
//! state or return effects.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use shelf_core::auth::Route;

use crate::features::{auth, catalog, toast};
use crate::overlays::OverlayExt;
use crate::overlays::render_utils::centered_rect;
use crate::state::{AppState, TuiState};

const HEADER_HEIGHT: u16 = 1;

const SPINNER_FRAMES: &[&str] = &["◐", "◓", "◑", "◒"];

fn spinner(state: &TuiState) -> &'static str {
    SPINNER_FRAMES[(state.spinner_frame / 4) % SPINNER_FRAMES.len()]
}

/// Renders the entire TUI to the frame.
pub fn render(app: &AppState, frame: &mut Frame) {
    let area = frame.area();
    let state = &app.tui;

    if state.booting {
        auth::render_splash(frame, area, spinner(state));
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(HEADER_HEIGHT), Constraint::Min(1)])
        .split(area);
    render_header(frame, chunks[0], state);
    let body = chunks[1];

    match &state.route {
        Route::Login { from } => {
            let busy = if state.tasks.register.is_running() {
                Some(format!("{} Creating account…", spinner(state)))
            } else if state.tasks.login.is_running() {
                Some(format!("{} Signing in…", spinner(state)))
            } else if state.tasks.password_reset.is_running() {
                Some(format!("{} Sending reset link…", spinner(state)))
            } else {
                None
            };
            auth::render_login(frame, body, &state.login, busy.as_deref(), from.as_deref());
        }
        Route::Products => catalog::render_catalog(frame, body, &state.catalog, spinner(state)),
        Route::NotFound { path } => render_not_found(frame, body, path),
    }

    app.overlay.render(frame, body);
    toast::render_toasts(frame, body, &state.toasts);
}

fn render_header(frame: &mut Frame, area: Rect, state: &TuiState) {
    let mut spans = vec![Span::styled(
        " shelf ",
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];
    spans.push(Span::styled(
        format!(" {}", state.route),
        Style::default().fg(Color::DarkGray),
    ));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);

    let who = match (&state.auth.user, state.auth.tier) {
        (Some(user), Some(tier)) => format!("{} ({}) ", user.display_name(), tier.label()),
        (None, Some(tier)) => format!("signed in ({}) ", tier.label()),
        (_, None) => "not signed in ".to_string(),
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(who, Style::default().fg(Color::Gray))))
            .alignment(Alignment::Right),
        area,
    );
}

fn render_not_found(frame: &mut Frame, area: Rect, path: &str) {
    let rect = centered_rect(60, 4, area);
    let lines = vec![
        Line::from(Span::styled(
            "404 - Page not found",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(path.to_string(), Style::default().fg(Color::DarkGray))),
        Line::default(),
        Line::from(Span::styled(
            "Enter: go to products • q: quit",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), rect);
}
