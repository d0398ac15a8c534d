// Screen layout for the play viewer.
//
// +--------------------------------------------------+
// | Title (2 rows)                                    |
// +--------------------------------------------------+
// |        Field canvas (centered, field aspect)      |
// +--------------------------------------------------+
// | Status bar (1 row)                                |
// | Help bar (1 row)                                  |
// +--------------------------------------------------+

use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::data::standardize::{FIELD_SIZE_X, FIELD_SIZE_Y};

/// Terminal cells are roughly twice as tall as they are wide.
const CELL_HEIGHT_RATIO: f64 = 2.0;

/// Resolved screen areas for each zone.
#[derive(Debug, Clone)]
pub struct AppLayout {
    pub title: Rect,
    /// Bordered field canvas; inner area keeps the field's aspect ratio.
    pub field: Rect,
    pub status_bar: Rect,
    pub help_bar: Rect,
}

pub fn build_layout(area: Rect) -> AppLayout {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // title
            Constraint::Min(3),    // field
            Constraint::Length(1), // status bar
            Constraint::Length(1), // help bar
        ])
        .split(area);

    AppLayout {
        title: vertical[0],
        field: fit_field(vertical[1]),
        status_bar: vertical[2],
        help_bar: vertical[3],
    }
}

/// Largest centered rect inside `area` whose inner (borderless) area has
/// the field's width-to-height ratio in screen space.
pub fn fit_field(area: Rect) -> Rect {
    if area.width < 3 || area.height < 3 {
        return area;
    }
    let ratio = FIELD_SIZE_X / FIELD_SIZE_Y * CELL_HEIGHT_RATIO;
    let inner_w = (area.width - 2) as f64;
    let inner_h = (area.height - 2) as f64;

    let (w, h) = if inner_w > inner_h * ratio {
        ((inner_h * ratio).round().max(1.0), inner_h)
    } else {
        (inner_w, (inner_w / ratio).round().max(1.0))
    };
    let width = w as u16 + 2;
    let height = h as u16 + 2;

    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn test_area() -> Rect {
        Rect::new(0, 0, 160, 50)
    }

    #[test]
    fn layout_all_rects_nonzero() {
        let layout = build_layout(test_area());
        for (name, rect) in [
            ("title", layout.title),
            ("field", layout.field),
            ("status_bar", layout.status_bar),
            ("help_bar", layout.help_bar),
        ] {
            assert!(rect.width > 0 && rect.height > 0, "{name} is empty: {rect:?}");
        }
    }

    #[test]
    fn bars_have_fixed_heights() {
        let layout = build_layout(test_area());
        assert_eq!(layout.title.height, 2);
        assert_eq!(layout.status_bar.height, 1);
        assert_eq!(layout.help_bar.height, 1);
        assert_eq!(layout.help_bar.y, 49);
    }

    #[test]
    fn field_fits_inside_its_zone() {
        let area = Rect::new(0, 2, 160, 46);
        let field = fit_field(area);
        assert!(field.x >= area.x && field.right() <= area.right());
        assert!(field.y >= area.y && field.bottom() <= area.bottom());
    }

    #[test]
    fn wide_area_is_height_bound() {
        // Inner 298x20 is far wider than 4.5:1
        let field = fit_field(Rect::new(0, 0, 300, 22));
        assert_eq!(field.height, 22);
        assert_eq!(field.width, 92);
        assert_eq!(field.x, 104);
    }

    #[test]
    fn tall_area_is_width_bound() {
        let field = fit_field(Rect::new(0, 0, 92, 60));
        assert_eq!(field.width, 92);
        assert_eq!(field.height, 22);
        assert_eq!(field.y, 19);
    }

    #[test]
    fn tiny_area_returned_unchanged() {
        let area = Rect::new(0, 0, 2, 2);
        assert_eq!(fit_field(area), area);
    }
}
