// Field widget: draws the field layer and the current frame's artists on a
// braille canvas in field coordinates (yards, origin at the home sideline
// and back of the left endzone).

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::Span;
use ratatui::widgets::canvas::{Canvas, Circle, Context, Line as CanvasLine, Points};
use ratatui::widgets::{Block, Borders};
use ratatui::Frame;

use crate::animation::field::FieldLayer;
use crate::animation::{FrameArtists, Scatter, TextArtist};
use crate::data::standardize::{FIELD_SIZE_X, FIELD_SIZE_Y};
use crate::data::teams::Rgb;
use crate::tui::ViewState;

/// Canvas background; partially transparent markings are blended onto it.
pub const FIELD_BACKGROUND: Rgb = Rgb::WHITE;

/// Dash and gap length for dashed lines, in yards.
const DASH_YARDS: f64 = 1.0;

/// Player dot radius, in yards.
const PLAYER_RADIUS: f64 = 0.9;

pub fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}

/// Terminal color for `rgb` drawn at `alpha` over the field background.
pub fn blended(rgb: Rgb, alpha: f64) -> Color {
    to_color(rgb.over(FIELD_BACKGROUND, alpha))
}

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let inner_width = area.width.saturating_sub(2).max(1);
    let yards_per_cell = FIELD_SIZE_X / inner_width as f64;

    let canvas = Canvas::default()
        .block(Block::default().borders(Borders::ALL))
        .marker(Marker::Braille)
        .background_color(to_color(FIELD_BACKGROUND))
        .x_bounds([0.0, FIELD_SIZE_X])
        .y_bounds([0.0, FIELD_SIZE_Y])
        .paint(|ctx| {
            if let Some(layer) = &state.field {
                draw_field(ctx, layer);
            }
            ctx.layer();
            if let Some(snapshot) = &state.frame {
                draw_artists(ctx, &snapshot.artists, state, yards_per_cell);
            }
        });
    frame.render_widget(canvas, area);
}

fn draw_field(ctx: &mut Context, layer: &FieldLayer) {
    for line in &layer.lines {
        let color = blended(line.color, line.alpha);
        for piece in line.segments(DASH_YARDS) {
            ctx.draw(&CanvasLine::new(piece.x1, piece.y1, piece.x2, piece.y2, color));
        }
    }
}

fn draw_scatter(ctx: &mut Context, scatter: &Scatter, radius: Option<f64>) {
    if scatter.offsets.is_empty() {
        return;
    }
    ctx.draw(&Points {
        coords: &scatter.offsets,
        color: to_color(scatter.color),
    });
    if let Some(radius) = radius {
        let edge = to_color(scatter.edge.unwrap_or(scatter.color));
        for &(x, y) in &scatter.offsets {
            ctx.draw(&Circle {
                x,
                y,
                radius,
                color: edge,
            });
        }
    }
}

/// Print `label` centered on its position.
fn print_centered(ctx: &mut Context, label: &TextArtist, yards_per_cell: f64, bold: bool) {
    if label.text.is_empty() {
        return;
    }
    let half_width = label.text.chars().count() as f64 * yards_per_cell / 2.0;
    let mut style = Style::default().fg(to_color(label.color));
    if bold {
        style = style.add_modifier(Modifier::BOLD);
    }
    let (x, y) = label.position;
    ctx.print(
        (x - half_width).max(0.0),
        y,
        Span::styled(label.text.clone(), style),
    );
}

fn draw_artists(ctx: &mut Context, artists: &FrameArtists, state: &ViewState, yards_per_cell: f64) {
    if state.show_tracks {
        for player in &artists.players {
            let color = blended(player.track.color, player.track.alpha);
            for pair in player.track.points.windows(2) {
                let ((x1, y1), (x2, y2)) = (pair[0], pair[1]);
                ctx.draw(&CanvasLine::new(x1, y1, x2, y2, color));
            }
        }
        ctx.layer();
    }

    draw_scatter(ctx, &artists.home, Some(PLAYER_RADIUS));
    draw_scatter(ctx, &artists.away, Some(PLAYER_RADIUS));
    draw_scatter(ctx, &artists.football, None);
    ctx.layer();

    for player in &artists.players {
        print_centered(ctx, &player.position_label, yards_per_cell, true);
        if state.show_names {
            print_centered(ctx, &player.number, yards_per_cell, false);
            print_centered(ctx, &player.name, yards_per_cell, false);
        }
    }
}
