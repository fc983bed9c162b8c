//! Key binding reference.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::OverlayUpdate;
use super::render_utils::{InputHint, OverlayConfig, render_overlay};

const BINDINGS: &[(&str, &str)] = &[
    ("/", "search (Enter or Esc returns to the table)"),
    ("↑↓ j k", "move cursor"),
    ("Space", "select row"),
    ("a", "select or clear all visible rows"),
    ("1 2 3 4", "sort by brand, SKU, rating, price"),
    ("0", "clear sort"),
    ("←→ h l", "previous or next page"),
    ("Home End", "first or last page"),
    ("r", "refresh page"),
    ("n", "add product"),
    ("L", "log out"),
    ("q ^C", "quit"),
];

#[derive(Debug)]
pub struct HelpState;

impl HelpState {
    pub fn handle_key(&mut self, key: KeyEvent) -> OverlayUpdate {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('?' | 'q') => OverlayUpdate::close(),
            _ => OverlayUpdate::stay(),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let hints = [InputHint::new("Esc", "close")];
        let layout = render_overlay(
            frame,
            area,
            area.height,
            &OverlayConfig {
                title: "Keys",
                border_color: Color::Cyan,
                width: 60,
                height: BINDINGS.len() as u16 + 3,
                hints: &hints,
            },
        );

        let lines: Vec<Line> = BINDINGS
            .iter()
            .map(|(key, action)| {
                Line::from(vec![
                    Span::styled(format!("{key:>10}  "), Style::default().fg(Color::Cyan)),
                    Span::raw(*action),
                ])
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), layout.body);
    }
}
