use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use unicode_width::UnicodeWidthStr;

use super::{ToastLevel, Toasts};
use crate::common::truncate_with_ellipsis;

const TOAST_MAX_WIDTH: u16 = 48;

fn level_style(level: ToastLevel) -> (Color, &'static str) {
    match level {
        ToastLevel::Info => (Color::Cyan, "i"),
        ToastLevel::Success => (Color::Green, "✓"),
        ToastLevel::Error => (Color::Red, "✗"),
    }
}

/// Stacks toasts upward from the bottom-right corner of `area`.
pub fn render_toasts(frame: &mut Frame, area: Rect, toasts: &Toasts) {
    let mut bottom = area.y + area.height;
    for toast in toasts.iter().rev() {
        if bottom < area.y + 3 {
            break;
        }
        let (color, icon) = level_style(toast.level);
        let inner_max = TOAST_MAX_WIDTH.min(area.width).saturating_sub(4) as usize;
        let message = truncate_with_ellipsis(&toast.message, inner_max.saturating_sub(2));
        let width = (message.width() as u16 + 6).min(area.width);

        let rect = Rect {
            x: area.x + area.width.saturating_sub(width),
            y: bottom - 3,
            width,
            height: 3,
        };
        bottom -= 3;

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color));
        let line = Line::from(vec![
            Span::styled(
                format!("{icon} "),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::raw(message),
        ]);
        frame.render_widget(Clear, rect);
        frame.render_widget(Paragraph::new(line).block(block), rect);
    }
}
