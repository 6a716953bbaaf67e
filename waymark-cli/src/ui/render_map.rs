//! Map screen rendering.

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use waymark::coord::{Coordinate, MapRegion};

use super::widgets::MapViewWidget;

/// Everything the map screen needs for one frame.
pub struct MapView<'a> {
    /// Viewport region, once a fix has arrived.
    pub region: Option<MapRegion>,
    /// Position of the user marker.
    pub marker: Option<Coordinate>,
    /// Whether the user marker is shown.
    pub shows_user_location: bool,
    /// Name of the backend feeding the map.
    pub backend_name: &'a str,
    /// Region changes applied so far.
    pub regions_applied: u64,
    /// Duplicate updates suppressed so far.
    pub updates_suppressed: u64,
    /// Whether a nearby-places search is running.
    pub searching: bool,
    /// Whether the last search finished with nothing to show.
    pub search_exhausted: bool,
}

/// Render the map screen: the viewport on top, a status strip below.
pub fn render_map_ui(frame: &mut Frame, view: &MapView, spinner: char) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(5)])
        .split(frame.area());

    render_viewport(frame, view, chunks[0], spinner);
    render_status(frame, view, chunks[1], spinner);
}

fn render_viewport(frame: &mut Frame, view: &MapView, area: Rect, spinner: char) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            format!(" Waymark {} ", waymark::VERSION),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    match view.region {
        Some(region) => {
            let marker = view.marker.filter(|_| view.shows_user_location);
            frame.render_widget(MapViewWidget::new(region, marker), inner);
        }
        None => {
            let waiting = Paragraph::new(Line::from(vec![
                Span::styled(format!("{} ", spinner), Style::default().fg(Color::Yellow)),
                Span::styled(
                    "Waiting for position fix...",
                    Style::default().fg(Color::White),
                ),
            ]))
            .alignment(Alignment::Center);

            // Vertically center the waiting line
            let y = inner.y + inner.height / 2;
            let line_area = Rect {
                x: inner.x,
                y: y.min(inner.y + inner.height.saturating_sub(1)),
                width: inner.width,
                height: 1.min(inner.height),
            };
            frame.render_widget(waiting, line_area);
        }
    }
}

fn render_status(frame: &mut Frame, view: &MapView, area: Rect, spinner: char) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let label = Style::default().fg(Color::DarkGray);
    let value = Style::default().fg(Color::White);

    let position_line = match view.region {
        Some(region) => Line::from(vec![
            Span::styled("Center: ", label),
            Span::styled(region.center.to_string(), value),
            Span::styled("  │  ", label),
            Span::styled("Span: ", label),
            Span::styled(
                format!("{:.4} deg", region.span.latitude_delta),
                value,
            ),
        ]),
        None => Line::from(Span::styled("Center: (no fix yet)", label)),
    };

    let counters_line = Line::from(vec![
        Span::styled("Updates: ", label),
        Span::styled(view.regions_applied.to_string(), Style::default().fg(Color::Green)),
        Span::styled(" applied, ", label),
        Span::styled(view.updates_suppressed.to_string(), Style::default().fg(Color::Yellow)),
        Span::styled(" duplicates", label),
        Span::styled("  │  ", label),
        Span::styled("Backend: ", label),
        Span::styled(view.backend_name.to_string(), value),
    ]);

    let action_line = if view.searching {
        Line::from(vec![
            Span::styled(format!("{} ", spinner), Style::default().fg(Color::Yellow)),
            Span::styled("Searching nearby places...", Style::default().fg(Color::Green)),
        ])
    } else if view.search_exhausted {
        Line::from(Span::styled(
            "No places found nearby.",
            Style::default().fg(Color::Yellow),
        ))
    } else {
        Line::from(Span::styled("[f] find nearby places  [q] quit", label))
    };

    let lines = vec![position_line, counters_line, action_line];
    frame.render_widget(Paragraph::new(lines), inner);
}
