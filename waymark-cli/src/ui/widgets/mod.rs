//! Custom widget components.

pub mod map_view;

pub use map_view::MapViewWidget;
