use crate::app::App;
use crate::facets::FacetKind;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
};

/// Checkbox list of every tag and genre. Toggling writes straight into the
/// query state; nothing is fetched until the panel is submitted.
pub fn render(app: &App, frame: &mut Frame, area: Rect) {
    let state = app.controller.state();

    let items: Vec<ListItem> = app
        .filter_entries
        .iter()
        .map(|(kind, facet)| {
            let checked = state.is_selected(*kind, facet);
            let kind_color = match kind {
                FacetKind::Tag => Color::Magenta,
                FacetKind::Genre => Color::Yellow,
            };
            ListItem::new(Line::from(vec![
                Span::styled(
                    if checked { "[x] " } else { "[ ] " },
                    Style::default().fg(if checked { Color::Green } else { Color::DarkGray }),
                ),
                Span::styled(format!("{:<6}", kind.label()), Style::default().fg(kind_color)),
                Span::styled(facet.name, Style::default().fg(Color::White)),
                Span::styled(format!("  {}", facet.slug), Style::default().fg(Color::DarkGray)),
            ]))
        })
        .collect();

    let selected = state.tags().len() + state.genres().len();
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(format!(" Filter ▴  [{} selected] ", selected))
                .title_bottom(
                    Line::from(" Space toggle · Enter submit filter · Esc close ")
                        .style(Style::default().fg(Color::DarkGray)),
                ),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▸ ");

    let mut list_state = ListState::default();
    list_state.select(Some(app.filter_cursor));
    frame.render_stateful_widget(list, area, &mut list_state);
}
