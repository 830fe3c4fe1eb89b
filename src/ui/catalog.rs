use crate::api::CatalogItem;
use crate::app::{App, InputMode};
use crate::query::ResultState;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Card titles are cut to this many characters.
pub const NAME_LIMIT: usize = 45;

const CARD_WIDTH: u16 = 50;
const CARD_HEIGHT: u16 = 5;
const FILTER_PANEL_HEIGHT: u16 = 14;
const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Layout: header(3) + search(3) + filter(3 or panel) + grid(min) + pages(3) + status(1)
    let filter_height = if app.filter_open { FILTER_PANEL_HEIGHT } else { 3 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(filter_height),
            Constraint::Min(5),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(area);

    // ── Header ──
    let header_text = format!(
        " Game Catalog   [{} games]   page {}",
        app.controller.total(),
        app.controller.state().page()
    );
    let header = Paragraph::new(header_text)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Left)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
    frame.render_widget(header, chunks[0]);

    render_search(app, frame, chunks[1]);

    if app.filter_open {
        super::filters::render(app, frame, chunks[2]);
    } else {
        render_filter_summary(app, frame, chunks[2]);
    }

    // ── Body: loading replaces the grid entirely ──
    if app.controller.loading() {
        render_loading(app, frame, chunks[3]);
    } else {
        match app.controller.results().clone() {
            ResultState::Idle => {}
            ResultState::Ready(_) => render_grid(app, frame, chunks[3]),
            ResultState::Empty => render_message(
                frame,
                chunks[3],
                vec![
                    Line::from(Span::styled("No games found", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))),
                    Line::from(Span::styled(
                        "Try a different search or fewer filters.",
                        Style::default().fg(Color::DarkGray),
                    )),
                ],
            ),
            ResultState::Failed { message, retryable } => {
                let mut lines = vec![Line::from(Span::styled(
                    message,
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ))];
                if retryable {
                    lines.push(Line::from(vec![
                        Span::raw("Press "),
                        Span::styled("r", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
                        Span::raw(" to retry"),
                    ]));
                }
                render_message(frame, chunks[3], lines);
            }
        }
    }

    render_pagination(app, frame, chunks[4]);

    // ── Status bar ──
    let key = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let status_line = Line::from(vec![
        Span::styled(" ←↑↓→", key),
        Span::raw(" Move  "),
        Span::styled("/", key),
        Span::raw(" Search  "),
        Span::styled("f", key),
        Span::raw(" Filter  "),
        Span::styled("Enter", key),
        Span::raw(" Open  "),
        Span::styled("?", key),
        Span::raw(" Help  "),
        Span::styled("q", key),
        Span::raw(" Quit  "),
        Span::styled(&app.status_msg, Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(status_line), chunks[5]);
}

fn render_search(app: &App, frame: &mut Frame, area: Rect) {
    let style = match app.input_mode {
        InputMode::Editing => Style::default().fg(Color::Yellow),
        InputMode::Normal => Style::default().fg(Color::DarkGray),
    };
    let label = if app.input_mode == InputMode::Editing {
        " 🔍 Search (Enter/Esc to stop typing): "
    } else {
        " 🔍 Search (/): "
    };
    let text = app.controller.state().search_text();
    let title = if app.search_pending() { " Search … " } else { " Search " };
    let search_bar = Paragraph::new(format!("{}{}", label, text)).style(style).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(style)
            .title(title),
    );
    frame.render_widget(search_bar, area);

    if app.input_mode == InputMode::Editing {
        let cursor_x = area.x + 1 + label.width() as u16 + text.width() as u16;
        frame.set_cursor_position((cursor_x.min(area.right().saturating_sub(2)), area.y + 1));
    }
}

fn render_filter_summary(app: &App, frame: &mut Frame, area: Rect) {
    let state = app.controller.state();
    let summary = if state.tags().is_empty() && state.genres().is_empty() {
        Span::styled("No filters", Style::default().fg(Color::DarkGray))
    } else {
        let mut parts = Vec::new();
        if !state.tags().is_empty() {
            parts.push(format!("Tags: {}", state.tags_csv()));
        }
        if !state.genres().is_empty() {
            parts.push(format!("Genres: {}", state.genres_csv()));
        }
        Span::styled(parts.join("  |  "), Style::default().fg(Color::White))
    };
    let bar = Paragraph::new(Line::from(vec![Span::raw(" "), summary])).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Filter (f) ▾ "),
    );
    frame.render_widget(bar, area);
}

fn render_loading(app: &App, frame: &mut Frame, area: Rect) {
    let spinner = SPINNER[(app.tick as usize) % SPINNER.len()];
    render_message(
        frame,
        area,
        vec![Line::from(Span::styled(
            format!("{} Loading games...", spinner),
            Style::default().fg(Color::Cyan),
        ))],
    );
}

fn render_message(frame: &mut Frame, area: Rect, lines: Vec<Line>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Games ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let top = inner.height.saturating_sub(lines.len() as u16) / 2;
    let text_area = Rect {
        y: inner.y + top,
        height: inner.height.saturating_sub(top),
        ..inner
    };
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, text_area);
}

fn render_grid(app: &mut App, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Games ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let columns = (inner.width / CARD_WIDTH).max(1) as usize;
    let visible_rows = (inner.height / CARD_HEIGHT).max(1) as usize;
    app.grid_columns = columns;

    let items = app.controller.items();
    let selected_row = app.grid_selected / columns;
    let first_row = selected_row.saturating_sub(visible_rows - 1);
    let card_width = (inner.width / columns as u16).min(CARD_WIDTH);

    for (index, item) in items.iter().enumerate().skip(first_row * columns).take(visible_rows * columns) {
        let row = index / columns - first_row;
        let col = index % columns;
        let card_area = Rect {
            x: inner.x + col as u16 * card_width,
            y: inner.y + row as u16 * CARD_HEIGHT,
            width: card_width,
            height: CARD_HEIGHT.min(inner.bottom().saturating_sub(inner.y + row as u16 * CARD_HEIGHT)),
        };
        if card_area.height < 3 {
            continue;
        }
        render_card(frame, card_area, item, index == app.grid_selected);
    }
}

fn render_card(frame: &mut Frame, area: Rect, item: &CatalogItem, selected: bool) {
    let border = if selected {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(Span::styled(
            truncate_name(item.display_name()),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ));
    let width = block.inner(area).width as usize;

    let artwork = match item.background_image.as_deref() {
        Some(url) if !url.is_empty() => Span::styled(
            fit_width(&format!("▣ {}", url), width),
            Style::default().fg(Color::Blue),
        ),
        _ => Span::styled("🎮 No artwork", Style::default().fg(Color::DarkGray)),
    };

    let mut rating = vec![Span::styled(
        format!("★ {}", item.rating_label()),
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    )];
    if let Some(released) = item.released_label() {
        rating.push(Span::styled(format!("  {}", released), Style::default().fg(Color::DarkGray)));
    }

    let genres = item.genres.iter().map(|g| g.name.as_str()).collect::<Vec<_>>().join(", ");
    let lines = vec![
        Line::from(artwork),
        Line::from(rating),
        Line::from(Span::styled(fit_width(&genres, width), Style::default().fg(Color::Gray))),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_pagination(app: &App, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Pages ");

    if !app.controller.show_pagination() || app.controller.loading() {
        frame.render_widget(block, area);
        return;
    }

    let current = app.controller.state().page();
    let mut spans = vec![Span::raw(" ")];
    if app.controller.above_three_pages() {
        spans.push(Span::styled("… ", Style::default().fg(Color::DarkGray)));
    }
    for (i, button) in app.controller.page_window().iter().enumerate() {
        let style = if button.label == current {
            Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        };
        spans.push(Span::styled(format!("{}:", i + 1), Style::default().fg(Color::DarkGray)));
        spans.push(Span::styled(format!(" {} ", button.label), style));
        spans.push(Span::raw("  "));
    }
    spans.push(Span::styled("(press 1-5)", Style::default().fg(Color::DarkGray)));
    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

/// Trim a game name and cut it to `NAME_LIMIT` characters plus `...`.
///
/// A name of exactly `NAME_LIMIT` characters is kept whole.
pub fn truncate_name(name: &str) -> String {
    if name.chars().count() <= NAME_LIMIT {
        name.trim().to_string()
    } else {
        let head: String = name.chars().take(NAME_LIMIT).collect();
        format!("{}...", head.trim())
    }
}

/// Cut a string to `max_width` terminal columns, adding "…" if truncated.
fn fit_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max_width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_truncate_name_long() {
        let name = "A".repeat(50);
        assert_eq!(truncate_name(&name), format!("{}...", "A".repeat(45)));
    }

    #[test]
    fn test_truncate_name_exactly_limit() {
        let name = "B".repeat(45);
        assert_eq!(truncate_name(&name), name);
    }

    #[test]
    fn test_truncate_name_trims() {
        assert_eq!(truncate_name("  Portal 2 "), "Portal 2");
        let name = format!("{} {}", "x".repeat(44), "tail of the title");
        assert_eq!(truncate_name(&name), format!("{}...", "x".repeat(44)));
    }

    #[test]
    fn test_truncate_name_counts_chars_not_bytes() {
        let name = "é".repeat(45);
        assert_eq!(truncate_name(&name), name);
    }

    #[test]
    fn test_fit_width() {
        assert_eq!(fit_width("short", 10), "short");
        assert_eq!(fit_width("abcdefghij", 5), "abcd…");
        assert_eq!(fit_width("🎮🎮🎮", 4), "🎮…");
    }

    proptest! {
        #[test]
        fn truncated_name_never_exceeds_limit(name in "\\PC{0,80}") {
            let out = truncate_name(&name);
            prop_assert!(out.chars().count() <= NAME_LIMIT + 3);
            if name.chars().count() > NAME_LIMIT {
                prop_assert!(out.ends_with("..."));
            }
        }
    }
}
