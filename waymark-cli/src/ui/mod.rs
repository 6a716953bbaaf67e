//! Terminal UI for the map shell.
//!
//! # Module Structure
//!
//! - `shell` - Terminal ownership, raw mode, input events, frame drawing
//! - `viewport` - Map camera state driven by the binder, with animation
//! - `render_start` - Start screen rendering
//! - `render_map` - Map screen rendering
//! - `widgets` - Custom widget components

pub mod render_map;
pub mod render_start;
pub mod shell;
pub mod viewport;
pub mod widgets;

pub use render_map::{render_map_ui, MapView};
pub use render_start::render_start_ui;
pub use shell::{Shell, ShellEvent};
pub use viewport::ViewportDisplay;

use ratatui::layout::Rect;

/// Shrink a rect by horizontal and vertical margins.
pub fn inner_rect(area: Rect, margin_x: u16, margin_y: u16) -> Rect {
    Rect {
        x: area.x + margin_x,
        y: area.y + margin_y,
        width: area.width.saturating_sub(margin_x * 2),
        height: area.height.saturating_sub(margin_y * 2),
    }
}
