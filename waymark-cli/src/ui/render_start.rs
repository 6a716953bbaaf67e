//! Start screen rendering.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use super::inner_rect;

/// Render the start screen: a centered box with the start button, or the
/// countdown spinner once the button has been pressed.
pub fn render_start_ui(frame: &mut Frame, backend_name: &str, waiting: bool, spinner: char) {
    let size = frame.area();

    // Centered box dimensions
    let box_width = 46u16.min(size.width.saturating_sub(4));
    let box_height = 9u16.min(size.height.saturating_sub(2));
    let x = size.width.saturating_sub(box_width) / 2;
    let y = size.height.saturating_sub(box_height) / 2;
    let area = Rect {
        x,
        y,
        width: box_width,
        height: box_height,
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            format!(" Waymark {} ", waymark::VERSION),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));
    frame.render_widget(block, area);

    let inner = inner_rect(area, 2, 1);

    let mut lines = vec![
        Line::from(Span::styled(
            "A live map that follows your position",
            Style::default().fg(Color::White),
        )),
        Line::from(""),
    ];

    if waiting {
        lines.push(Line::from(vec![
            Span::styled(format!("{} ", spinner), Style::default().fg(Color::Yellow)),
            Span::styled("Starting...", Style::default().fg(Color::Green)),
        ]));
    } else {
        lines.push(Line::from(Span::styled(
            "[ Start ]",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("Backend: ", Style::default().fg(Color::DarkGray)),
        Span::styled(backend_name.to_string(), Style::default().fg(Color::White)),
    ]));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "[enter] start  [q] quit",
        Style::default().fg(Color::DarkGray),
    )));

    frame.render_widget(Paragraph::new(lines), inner);
}
