// Field geometry and play-direction standardization.
//
// After standardization every play runs toward increasing x (the "Madden
// camera" view) and increasing y points toward the offense's left sideline.

use super::{PlayDirection, TrackingRow};

/// Yards from the back of one endzone to the back of the other.
pub const FIELD_SIZE_X: f64 = 120.0;
/// Yards from sideline to sideline.
pub const FIELD_SIZE_Y: f64 = 53.3;

/// Return a standardized copy of the tracking rows.
///
/// Rows of left-moving plays are mirrored through the field center and their
/// orientation and direction angles rotated by 180 degrees. The
/// `play_direction` field is left untouched, so applying this twice undoes it.
pub fn standardize_tracking(rows: &[TrackingRow]) -> Vec<TrackingRow> {
    let mut out = rows.to_vec();
    standardize_tracking_in_place(&mut out);
    out
}

/// In-place variant of [`standardize_tracking`].
pub fn standardize_tracking_in_place(rows: &mut [TrackingRow]) {
    for row in rows
        .iter_mut()
        .filter(|r| r.play_direction == PlayDirection::Left)
    {
        row.x = FIELD_SIZE_X - row.x;
        row.y = FIELD_SIZE_Y - row.y;
        row.o = row.o.map(rotate_half_turn);
        row.dir = row.dir.map(rotate_half_turn);
    }
}

fn rotate_half_turn(angle: f64) -> f64 {
    (angle + 180.0).rem_euclid(360.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::TeamSide;

    fn row(direction: PlayDirection, x: f64, y: f64, o: Option<f64>, dir: Option<f64>) -> TrackingRow {
        TrackingRow {
            game_id: 1,
            play_id: 1,
            frame_id: 1,
            nfl_id: Some(10),
            display_name: "Test Player".into(),
            jersey_number: Some(10),
            position: Some("WR".into()),
            team: TeamSide::Home,
            x,
            y,
            s: Some(1.0),
            a: None,
            o,
            dir,
            event: None,
            play_direction: direction,
        }
    }

    #[test]
    fn left_plays_are_mirrored() {
        let rows = vec![row(PlayDirection::Left, 30.0, 10.0, Some(90.0), Some(270.0))];
        let out = standardize_tracking(&rows);
        assert!((out[0].x - 90.0).abs() < 1e-9);
        assert!((out[0].y - 43.3).abs() < 1e-9);
        assert!((out[0].o.unwrap() - 270.0).abs() < 1e-9);
        assert!((out[0].dir.unwrap() - 90.0).abs() < 1e-9);
        // Original untouched
        assert!((rows[0].x - 30.0).abs() < 1e-9);
    }

    #[test]
    fn right_plays_unchanged() {
        let rows = vec![row(PlayDirection::Right, 30.0, 10.0, Some(90.0), Some(270.0))];
        let out = standardize_tracking(&rows);
        assert_eq!(out, rows);
    }

    #[test]
    fn angles_wrap_past_360() {
        let mut rows = vec![row(PlayDirection::Left, 0.0, 0.0, Some(200.0), Some(359.5))];
        standardize_tracking_in_place(&mut rows);
        assert!((rows[0].o.unwrap() - 20.0).abs() < 1e-9);
        assert!((rows[0].dir.unwrap() - 179.5).abs() < 1e-9);
    }

    #[test]
    fn missing_angles_stay_missing() {
        let mut rows = vec![row(PlayDirection::Left, 60.0, 26.65, None, None)];
        standardize_tracking_in_place(&mut rows);
        assert!(rows[0].o.is_none());
        assert!(rows[0].dir.is_none());
        assert!((rows[0].x - 60.0).abs() < 1e-9);
    }

    #[test]
    fn applying_twice_restores_original() {
        let rows = vec![row(PlayDirection::Left, 12.5, 40.1, Some(45.0), Some(300.0))];
        let twice = standardize_tracking(&standardize_tracking(&rows));
        assert!((twice[0].x - 12.5).abs() < 1e-9);
        assert!((twice[0].y - 40.1).abs() < 1e-9);
        assert!((twice[0].o.unwrap() - 45.0).abs() < 1e-9);
        assert!((twice[0].dir.unwrap() - 300.0).abs() < 1e-9);
    }
}
