// Static field markings drawn beneath the players.

use crate::data::standardize::{FIELD_SIZE_X, FIELD_SIZE_Y};
use crate::data::teams::Rgb;

/// Inner hash marks, in yards from the home sideline.
const HOME_HASH: (f64, f64) = (22.916, 23.583);
const AWAY_HASH: (f64, f64) = (29.75, 30.416);

/// Endzone back lines, goal lines and the 50.
const MAJOR_LINES: [f64; 5] = [0.0, 10.0, 60.0, 110.0, 120.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Solid,
    Dashed,
}

/// A straight marking in field coordinates (yards).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldLine {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub color: Rgb,
    /// Opacity in 0.0-1.0.
    pub alpha: f64,
    pub style: LineStyle,
}

impl FieldLine {
    pub fn vertical(x: f64, y1: f64, y2: f64, color: Rgb, alpha: f64) -> Self {
        FieldLine {
            x1: x,
            y1,
            x2: x,
            y2,
            color,
            alpha,
            style: LineStyle::Solid,
        }
    }

    pub fn dashed(mut self) -> Self {
        self.style = LineStyle::Dashed;
        self
    }

    /// Split into drawable solid pieces. Dashed lines alternate `dash`
    /// yards drawn and `dash` yards skipped.
    pub fn segments(&self, dash: f64) -> Vec<FieldLine> {
        if self.style == LineStyle::Solid || dash <= 0.0 {
            return vec![FieldLine {
                style: LineStyle::Solid,
                ..*self
            }];
        }
        let dx = self.x2 - self.x1;
        let dy = self.y2 - self.y1;
        let length = (dx * dx + dy * dy).sqrt();
        if length == 0.0 {
            return Vec::new();
        }
        let (ux, uy) = (dx / length, dy / length);
        let mut pieces = Vec::new();
        let mut start = 0.0;
        while start < length {
            let end = (start + dash).min(length);
            pieces.push(FieldLine {
                x1: self.x1 + ux * start,
                y1: self.y1 + uy * start,
                x2: self.x1 + ux * end,
                y2: self.y1 + uy * end,
                style: LineStyle::Solid,
                ..*self
            });
            start += 2.0 * dash;
        }
        pieces
    }
}

/// The static layer: permanent markings plus the play-specific line of
/// scrimmage and first-down marker.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldLayer {
    pub lines: Vec<FieldLine>,
    pub line_of_scrimmage: Option<f64>,
    pub first_down: Option<f64>,
}

/// Markings common to every play: sidelines, 10-yard lines, hash marks,
/// goal lines, endzone lines and the 50.
pub fn field_markings() -> Vec<FieldLine> {
    let mut lines = Vec::new();

    for side_line in [0.0, FIELD_SIZE_Y] {
        lines.push(FieldLine {
            x1: 0.0,
            y1: side_line,
            x2: FIELD_SIZE_X,
            y2: side_line,
            color: Rgb::BLACK,
            alpha: 0.8,
            style: LineStyle::Solid,
        });
    }

    for yd_line in (0..=FIELD_SIZE_X as u32).step_by(10) {
        lines.push(FieldLine::vertical(yd_line as f64, 0.0, FIELD_SIZE_Y, Rgb::BLACK, 0.2));
    }

    for yard in (1..100u32).filter(|i| i % 10 != 0) {
        let x = (yard + 10) as f64;
        lines.push(FieldLine::vertical(x, HOME_HASH.0, HOME_HASH.1, Rgb::BLACK, 0.2));
        lines.push(FieldLine::vertical(x, AWAY_HASH.0, AWAY_HASH.1, Rgb::BLACK, 0.2));
    }

    for ez_line in MAJOR_LINES {
        lines.push(FieldLine::vertical(ez_line, 0.0, FIELD_SIZE_Y, Rgb::BLACK, 0.8));
    }

    lines
}

/// Assemble the layer for a play. `line_of_scrimmage` is the football's x at
/// the first frame; the first-down marker sits `yards_to_go` beyond it in
/// the direction of play.
pub fn build_field_layer(
    line_of_scrimmage: Option<f64>,
    yards_to_go: u32,
    direction_factor: f64,
) -> FieldLayer {
    let mut lines = Vec::new();
    let first_down = line_of_scrimmage.map(|los| los + direction_factor * yards_to_go as f64);

    if let Some(los) = line_of_scrimmage {
        lines.push(FieldLine::vertical(los, 0.0, FIELD_SIZE_Y, Rgb::BLACK, 1.0).dashed());
    }
    if let Some(marker) = first_down {
        lines.push(FieldLine::vertical(marker, 0.0, FIELD_SIZE_Y, Rgb::DARK_ORANGE, 1.0));
    }
    lines.extend(field_markings());

    FieldLayer {
        lines,
        line_of_scrimmage,
        first_down,
    }
}
