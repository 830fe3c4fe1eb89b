use crate::app::App;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

pub fn render(app: &App, frame: &mut Frame) {
    let area = frame.area();

    // Layout: header(3) + content(min) + status(1)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(area);

    let header = Paragraph::new(format!(" Game Detail   {}", app.route.href()))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
    frame.render_widget(header, chunks[0]);

    let label = Style::default().fg(Color::DarkGray);
    let value = Style::default().fg(Color::White);

    let lines = match app.detail_item() {
        Some(item) => {
            let facets = |list: &[crate::api::ItemFacet]| {
                if list.is_empty() {
                    "–".to_string()
                } else {
                    list.iter().map(|f| f.name.as_str()).collect::<Vec<_>>().join(", ")
                }
            };
            vec![
                Line::from(vec![
                    Span::styled(" Name:       ", label),
                    Span::styled(item.display_name().to_string(), value.add_modifier(Modifier::BOLD)),
                ]),
                Line::from(vec![
                    Span::styled(" ID:         ", label),
                    Span::styled(item.id.to_string(), value),
                ]),
                Line::from(vec![
                    Span::styled(" Rating:     ", label),
                    Span::styled(format!("★ {}", item.rating_label()), Style::default().fg(Color::Yellow)),
                ]),
                Line::from(vec![
                    Span::styled(" Released:   ", label),
                    Span::styled(item.released_label().unwrap_or_else(|| "–".to_string()), value),
                ]),
                Line::from(vec![
                    Span::styled(" Metacritic: ", label),
                    Span::styled(
                        item.metacritic.map(|m| m.to_string()).unwrap_or_else(|| "–".to_string()),
                        value,
                    ),
                ]),
                Line::from(vec![
                    Span::styled(" Genres:     ", label),
                    Span::styled(facets(&item.genres), value),
                ]),
                Line::from(vec![
                    Span::styled(" Tags:       ", label),
                    Span::styled(facets(&item.tags), value),
                ]),
                Line::from(vec![
                    Span::styled(" Artwork:    ", label),
                    match item.background_image.as_deref() {
                        Some(url) if !url.is_empty() => Span::styled(
                            url.to_string(),
                            Style::default().fg(Color::Blue).add_modifier(Modifier::UNDERLINED),
                        ),
                        _ => Span::styled("🎮 No artwork", label),
                    },
                ]),
            ]
        }
        None => vec![Line::from(Span::styled(
            " This game is no longer available. Press Esc to go back.",
            Style::default().fg(Color::Red),
        ))],
    };

    let content = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((app.detail_scroll, 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" Game ")
                .title_bottom(Line::from(format!(" scroll: {} ", app.detail_scroll)).alignment(Alignment::Right)),
        );
    frame.render_widget(content, chunks[1]);

    let key = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let status_line = Line::from(vec![
        Span::styled(" ↑↓", key),
        Span::raw(" Scroll  "),
        Span::styled("Esc", key),
        Span::raw(" Back  "),
        Span::styled(&app.status_msg, Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(status_line), chunks[2]);
}
