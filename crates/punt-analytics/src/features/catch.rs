// Catch-relative features: time until the catch and the returner's downfield
// speed at the catch.

use std::collections::HashMap;

use crate::data::{Play, PlayKey, TrackingRow};

use super::events::{frames_of_events, PUNT_RECEIVED};

/// Seconds until the punt is received, aligned with `tracking`.
///
/// `(punt_received_frame - frame) / frame_rate_hz`. Negative after the
/// catch; `None` for plays without a `punt_received` event.
pub fn time_to_catch(tracking: &[TrackingRow], frame_rate_hz: f64) -> Vec<Option<f64>> {
    let events = frames_of_events(tracking, &[PUNT_RECEIVED]);
    tracking
        .iter()
        .map(|row| {
            events
                .frame(row.play_key(), PUNT_RECEIVED)
                .map(|catch| (catch as f64 - row.frame_id as f64) / frame_rate_hz)
        })
        .collect()
}

/// The returner's velocity component toward the kicking team's goal line at
/// the moment of the catch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReturnerSpeed {
    pub play: PlayKey,
    pub returner_id: u32,
    /// `s * -sin(dir)`, yards per second; `None` when speed or direction
    /// was not recorded.
    pub s_dwnfld: Option<f64>,
}

/// Downfield speed = `s * -sin(dir)` where `dir` is in degrees.
///
/// Directions between 0 and 180 degrees point backwards and produce a
/// negative value.
pub fn downfield_speed(s: f64, dir_deg: f64) -> f64 {
    s * -dir_deg.to_radians().sin()
}

/// Returner rows of single-returner plays.
pub(crate) fn returner_rows<'a>(
    tracking: &'a [TrackingRow],
    plays: &[Play],
) -> Vec<&'a TrackingRow> {
    let returners: HashMap<PlayKey, u32> = plays
        .iter()
        .filter_map(|p| p.single_returner().map(|id| (p.key(), id)))
        .collect();
    tracking
        .iter()
        .filter(|row| {
            row.nfl_id.is_some() && returners.get(&row.play_key()).copied() == row.nfl_id
        })
        .collect()
}

/// One entry per single-returner play that has a catch frame.
pub fn returner_speed_at_catch(tracking: &[TrackingRow], plays: &[Play]) -> Vec<ReturnerSpeed> {
    let rows = returner_rows(tracking, plays);
    let events = frames_of_events(rows.iter().copied(), &[PUNT_RECEIVED]);

    let mut out: Vec<ReturnerSpeed> = rows
        .iter()
        .filter(|row| events.frame(row.play_key(), PUNT_RECEIVED) == Some(row.frame_id))
        .filter_map(|row| {
            let returner_id = row.nfl_id?;
            let s_dwnfld = match (row.s, row.dir) {
                (Some(s), Some(dir)) => Some(downfield_speed(s, dir)),
                _ => None,
            };
            Some(ReturnerSpeed {
                play: row.play_key(),
                returner_id,
                s_dwnfld,
            })
        })
        .collect();
    out.sort_by_key(|r| r.play);
    out.dedup_by_key(|r| r.play);
    out
}
