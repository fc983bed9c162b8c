use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use shelf_core::auth::Route;
use shelf_core::validation::AuthVariant;

use super::form::{LoginField, LoginForm};
use crate::overlays::render_utils::{
    InputHint, centered_rect, render_form_field, render_hints, render_overlay_container,
    render_separator,
};

const CARD_WIDTH: u16 = 64;

/// Draws the login/register card. `busy` is a status line shown while a
/// request is in flight; `from` is the route the user was bounced from.
pub fn render_login(
    frame: &mut Frame,
    area: Rect,
    form: &LoginForm,
    busy: Option<&str>,
    from: Option<&Route>,
) {
    let fields = form.fields();
    // title row + separator + two rows per field + status + hints + borders
    let height = 2 + 2 + fields.len() as u16 * 2 + 2 + 2;
    let card = centered_rect(CARD_WIDTH, height, area);

    let title = match form.variant {
        AuthVariant::Login => "Sign in",
        AuthVariant::Register => "Create account",
    };
    render_overlay_container(frame, card, title, Color::Cyan);
    let inner = Rect::new(
        card.x + 1,
        card.y + 1,
        card.width.saturating_sub(2),
        card.height.saturating_sub(2),
    );
    if inner.height < 4 {
        return;
    }

    let subtitle = match (form.variant, from) {
        (AuthVariant::Login, Some(route)) => format!("Sign in to continue to {route}"),
        (AuthVariant::Login, None) => "Welcome back".to_string(),
        (AuthVariant::Register, _) => "Register a new account".to_string(),
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            subtitle,
            Style::default().fg(Color::DarkGray),
        )))
        .alignment(Alignment::Center),
        Rect::new(inner.x, inner.y, inner.width, 1),
    );
    render_separator(frame, inner, 1);

    let mut y = inner.y + 2;
    for field in fields {
        let row = Rect::new(inner.x, y, inner.width, 2);
        let focused = form.focus == *field;
        let error = form.errors.get(field.name());
        match field {
            LoginField::Username => {
                render_form_field(frame, row, "Username", &form.username, focused, error);
            }
            LoginField::Email => {
                render_form_field(frame, row, "Email", &form.email, focused, error);
            }
            LoginField::Password => {
                render_form_field(frame, row, "Password", &form.password, focused, error);
            }
            LoginField::Remember => render_remember(frame, row, form.remember, focused),
        }
        y += 2;
    }

    if let Some(status) = busy {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                status,
                Style::default().fg(Color::Yellow),
            )))
            .alignment(Alignment::Center),
            Rect::new(inner.x, y, inner.width, 1),
        );
    }

    let toggle = match form.variant {
        AuthVariant::Login => "register",
        AuthVariant::Register => "sign in",
    };
    let hints = [
        InputHint::new("Enter", "submit"),
        InputHint::new("Tab", "next"),
        InputHint::new("^T", toggle),
        InputHint::new("^R", "forgot password"),
        InputHint::new("^C", "quit"),
    ];
    render_hints(frame, inner, &hints, Color::Cyan);
}

fn render_remember(frame: &mut Frame, area: Rect, checked: bool, focused: bool) {
    let glyph = if checked { "[x]" } else { "[ ]" };
    let style = if focused {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    let line = Line::from(vec![
        Span::raw(" ".repeat(11)),
        Span::styled(format!("{glyph} Remember me"), style),
    ]);
    frame.render_widget(
        Paragraph::new(line),
        Rect::new(area.x, area.y, area.width, 1),
    );
}

/// Shown while the stored session is being refreshed at startup.
pub fn render_splash(frame: &mut Frame, area: Rect, spinner: &str) {
    let rect = centered_rect(40, 1, area);
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(spinner, Style::default().fg(Color::Cyan)),
            Span::raw(" Restoring session…"),
        ]))
        .alignment(Alignment::Center),
        rect,
    );
}
