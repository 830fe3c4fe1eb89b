use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

pub fn render(frame: &mut Frame) {
    let area = centered_rect(60, 80, frame.area());

    // Clear the area behind the popup
    frame.render_widget(Clear, area);

    let section = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let key = Style::default().fg(Color::Yellow);
    let binding = |k: &'static str, what: &'static str| Line::from(vec![Span::styled(k, key), Span::raw(what)]);

    let help_text = vec![
        Line::from(""),
        Line::from(Span::styled("  Global", section)),
        binding("    ?         ", "Toggle this help"),
        binding("    q         ", "Quit application"),
        binding("    Ctrl+C    ", "Quit from anywhere"),
        Line::from(""),
        Line::from(Span::styled("  Catalog", section)),
        binding("    ←↑↓→/hjkl ", "Move between game cards"),
        binding("    Enter     ", "Open game detail"),
        binding("    /         ", "Type a search (fires 500ms after the last key)"),
        binding("    1-5       ", "Press a page button"),
        binding("    r         ", "Retry after a failed fetch"),
        Line::from(""),
        Line::from(Span::styled("  Filter Panel (f)", section)),
        binding("    ↑/↓       ", "Move between tags and genres"),
        binding("    Space     ", "Check / uncheck"),
        binding("    Enter     ", "Submit filter (back to page 1)"),
        binding("    Esc/f     ", "Close panel"),
        Line::from(""),
        Line::from(Span::styled("  Detail View", section)),
        binding("    ↑/↓       ", "Scroll"),
        binding("    Esc/q     ", "Back to catalog"),
        Line::from(""),
    ];

    let help = Paragraph::new(help_text)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help: Keybindings ")
                .title_bottom(Line::from(" Press ? or Esc to close ").style(Style::default().fg(Color::DarkGray))),
        )
        .style(Style::default().fg(Color::White));

    frame.render_widget(help, area);
}

/// Popup area covering the given percentages of `area`, centered.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let margin_y = (100 - percent_y) / 2;
    let margin_x = (100 - percent_x) / 2;
    let [_, middle, _] = Layout::vertical([
        Constraint::Percentage(margin_y),
        Constraint::Percentage(percent_y),
        Constraint::Percentage(margin_y),
    ])
    .areas(area);
    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage(margin_x),
        Constraint::Percentage(percent_x),
        Constraint::Percentage(margin_x),
    ])
    .areas(middle);
    center
}
