use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};
use shelf_core::catalog::{ListStatus, PageWindow, Product, SortField};

use super::{CatalogFocus, CatalogState};
use crate::common::{format_price, truncate_with_ellipsis};
use crate::overlays::render_utils::{InputHint, InputLine, render_hints, render_input_line};

/// Ratings below this are highlighted.
const LOW_RATING: f64 = 3.0;

pub fn render_catalog(frame: &mut Frame, area: Rect, catalog: &CatalogState, spinner: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    render_search(frame, chunks[0], catalog, spinner);
    render_body(frame, chunks[1], catalog, spinner);
    render_pager(frame, chunks[2], catalog, spinner);

    let hints = match catalog.focus {
        CatalogFocus::Search => vec![
            InputHint::new("Enter/Esc", "back to table"),
            InputHint::new("^U", "clear"),
        ],
        CatalogFocus::Table => vec![
            InputHint::new("/", "search"),
            InputHint::new("1-4", "sort"),
            InputHint::new("←→", "page"),
            InputHint::new("Space", "select"),
            InputHint::new("n", "add"),
            InputHint::new("r", "refresh"),
            InputHint::new("?", "help"),
            InputHint::new("q", "quit"),
        ],
    };
    render_hints(frame, chunks[3], &hints, Color::Cyan);
}

fn render_search(frame: &mut Frame, area: Rect, catalog: &CatalogState, spinner: &str) {
    let focused = catalog.focus == CatalogFocus::Search;
    let border = if focused { Color::Cyan } else { Color::DarkGray };
    let title = if catalog.view.is_debouncing() {
        format!(" Search {spinner} ")
    } else {
        " Search ".to_string()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    render_input_line(
        frame,
        inner,
        &InputLine {
            value: catalog.search.value(),
            placeholder: Some("Press / to search products"),
            prompt: "> ",
            prompt_color: border,
            text_color: Color::White,
            placeholder_color: Color::DarkGray,
            cursor_color: focused.then_some(Color::Cyan),
        },
    );
}

fn header_label(catalog: &CatalogState, field: SortField, key: usize) -> String {
    let arrow = catalog.view.sort().indicator(field).unwrap_or("");
    format!("{} [{key}]{arrow}", field.label())
}

fn product_row(product: &Product, selected: bool, title_width: usize) -> Row<'static> {
    let check = if selected { "[x]" } else { "[ ]" };
    let rating_style = if product.rating < LOW_RATING {
        Style::default().fg(Color::Red)
    } else {
        Style::default()
    };
    Row::new(vec![
        Cell::from(check),
        Cell::from(truncate_with_ellipsis(&product.title, title_width)),
        Cell::from(truncate_with_ellipsis(&product.brand, 16)),
        Cell::from(truncate_with_ellipsis(&product.sku, 12)),
        Cell::from(Span::styled(format!("{}/5", product.rating), rating_style)),
        Cell::from(Line::from(format!("${}", format_price(product.price))).alignment(Alignment::Right)),
    ])
}

fn render_body(frame: &mut Frame, area: Rect, catalog: &CatalogState, spinner: &str) {
    let view = &catalog.view;
    let rows = view.rows();

    if rows.is_empty() {
        let (text, style) = match view.status() {
            ListStatus::Loading | ListStatus::Idle => (
                format!("{spinner} Loading products…"),
                Style::default().fg(Color::DarkGray),
            ),
            ListStatus::Error(message) => (
                format!("{message} (press r to retry)"),
                Style::default().fg(Color::Red),
            ),
            ListStatus::Refreshing | ListStatus::Ready => (
                "No products found".to_string(),
                Style::default().fg(Color::DarkGray),
            ),
        };
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(text, style))).alignment(Alignment::Center),
            Rect::new(area.x, area.y + area.height / 2, area.width, 1),
        );
        return;
    }

    let widths = [
        Constraint::Length(3),
        Constraint::Min(16),
        Constraint::Length(16),
        Constraint::Length(12),
        Constraint::Length(10),
        Constraint::Length(14),
    ];
    let title_width = area.width.saturating_sub(3 + 16 + 12 + 10 + 14 + 6).max(8) as usize;

    let header = Row::new(vec![
        Cell::from(view.header_check().glyph()),
        Cell::from("Title"),
        Cell::from(header_label(catalog, SortField::Brand, 1)),
        Cell::from(header_label(catalog, SortField::Sku, 2)),
        Cell::from(header_label(catalog, SortField::Rating, 3)),
        Cell::from(header_label(catalog, SortField::Price, 4)),
    ])
    .style(Style::default().add_modifier(Modifier::BOLD));

    let selection = view.selection();
    let body: Vec<Row> = rows
        .iter()
        .map(|p| product_row(p, selection.contains(p.id), title_width))
        .collect();

    let border = if matches!(view.status(), ListStatus::Error(_)) {
        Color::Red
    } else {
        Color::DarkGray
    };
    let table = Table::new(body, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border)),
        )
        .row_highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        );

    let mut state = TableState::default().with_selected(
        (catalog.focus == CatalogFocus::Table).then_some(catalog.cursor),
    );
    frame.render_stateful_widget(table, area, &mut state);
}

fn pager_spans(window: &PageWindow) -> Vec<Span<'static>> {
    let dim = Style::default().fg(Color::DarkGray);
    let mut spans = vec![Span::styled(
        "‹ ",
        if window.has_prev { Style::default() } else { dim },
    )];
    for page in &window.pages {
        if *page == window.current {
            spans.push(Span::styled(
                format!("[{page}]"),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::raw(format!(" {page} ")));
        }
    }
    spans.push(Span::styled(
        " ›",
        if window.has_next { Style::default() } else { dim },
    ));
    spans
}

fn render_pager(frame: &mut Frame, area: Rect, catalog: &CatalogState, spinner: &str) {
    let view = &catalog.view;
    let mut spans = view.window().map(|w| pager_spans(&w)).unwrap_or_default();

    if let Some(window) = view.window() {
        spans.push(Span::styled(
            format!("   {}", window.range_label()),
            Style::default().fg(Color::Gray),
        ));
    }
    let selected = view.selection().len();
    if selected > 0 {
        spans.push(Span::styled(
            format!(" · {selected} selected"),
            Style::default().fg(Color::Cyan),
        ));
    }
    match view.status() {
        ListStatus::Refreshing => spans.push(Span::styled(
            format!("   {spinner} refreshing"),
            Style::default().fg(Color::Yellow),
        )),
        ListStatus::Error(message) if view.shown_page().is_some() => spans.push(Span::styled(
            format!("   {message} (r to retry)"),
            Style::default().fg(Color::Red),
        )),
        _ => {}
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
