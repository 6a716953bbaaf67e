//! Character-grid rendering of a map region.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::Widget;

use waymark::coord::{Coordinate, MapRegion};

/// Glyph for the user position marker.
const MARKER: &str = "●";

/// Draws the viewport region as a graticule with the user marker on top.
///
/// Rows map to latitude (north at the top), columns to longitude. Grid
/// lines fall on round coordinate values chosen from the region span, so
/// panning shows the grid sliding under a stationary marker.
pub struct MapViewWidget {
    region: MapRegion,
    marker: Option<Coordinate>,
}

impl MapViewWidget {
    pub fn new(region: MapRegion, marker: Option<Coordinate>) -> Self {
        Self { region, marker }
    }

    /// Grid spacing for a span: the nearest 1/2/5 x 10^k at or below a
    /// quarter of the span.
    fn grid_step(span: f64) -> f64 {
        if span <= 0.0 || !span.is_finite() {
            return 1.0;
        }
        let target = span / 4.0;
        let magnitude = 10f64.powf(target.log10().floor());
        let normalized = target / magnitude;
        let factor = if normalized >= 5.0 {
            5.0
        } else if normalized >= 2.0 {
            2.0
        } else {
            1.0
        };
        factor * magnitude
    }

    /// Cell the marker lands in, or `None` when it is outside the region.
    fn marker_cell(&self, area: Rect, marker: Coordinate) -> Option<(u16, u16)> {
        if !self.region.contains(marker) {
            return None;
        }

        let lat_delta = self.region.span.latitude_delta;
        let lon_delta = self.region.span.longitude_delta;
        if lat_delta <= 0.0 || lon_delta <= 0.0 {
            return None;
        }

        let col_frac = (marker.longitude - self.region.min_longitude()) / lon_delta;
        let row_frac = (self.region.max_latitude() - marker.latitude) / lat_delta;

        let col = ((col_frac * area.width as f64) as u16).min(area.width - 1);
        let row = ((row_frac * area.height as f64) as u16).min(area.height - 1);

        Some((area.x + col, area.y + row))
    }
}

/// Whether a grid line at a multiple of `step` falls inside a cell
/// covering `cell_size` degrees centered on `value`.
fn on_grid_line(value: f64, step: f64, cell_size: f64) -> bool {
    let rem = value.rem_euclid(step);
    let dist = rem.min(step - rem);
    dist <= cell_size / 2.0
}

impl Widget for MapViewWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let lat_delta = self.region.span.latitude_delta;
        let lon_delta = self.region.span.longitude_delta;
        let max_lat = self.region.max_latitude();
        let min_lon = self.region.min_longitude();

        let lat_step = Self::grid_step(lat_delta);
        let lon_step = Self::grid_step(lon_delta);
        let lat_cell = lat_delta / area.height as f64;
        let lon_cell = lon_delta / area.width as f64;

        let grid_style = Style::default().fg(Color::DarkGray);

        for row in 0..area.height {
            let lat = max_lat - (row as f64 + 0.5) * lat_cell;
            let lat_line = on_grid_line(lat, lat_step, lat_cell);

            let mut line = String::with_capacity(area.width as usize * 3);
            for col in 0..area.width {
                let lon = min_lon + (col as f64 + 0.5) * lon_cell;
                let lon_line = on_grid_line(lon, lon_step, lon_cell);

                line.push(match (lat_line, lon_line) {
                    (true, true) => '┼',
                    (true, false) => '─',
                    (false, true) => '│',
                    (false, false) => ' ',
                });
            }
            buf.set_string(area.x, area.y + row, &line, grid_style);
        }

        if let Some(marker) = self.marker {
            if let Some((x, y)) = self.marker_cell(area, marker) {
                buf.set_string(
                    x,
                    y,
                    MARKER,
                    Style::default()
                        .fg(Color::Red)
                        .add_modifier(Modifier::BOLD),
                );
            }
        }
    }
}
