// Modeling-frame selection: punt returns with a clean catch, from the punt
// to the catch.

use std::collections::HashSet;

use tracing::debug;

use crate::data::{PffScouting, Play, PlayKey, TrackingRow};

use super::events::{frames_of_events, PUNT, PUNT_RECEIVED};

/// Plays that are punt returns and that PFF charted as a clean catch.
pub fn modeling_plays(plays: &[Play], pff: &[PffScouting]) -> HashSet<PlayKey> {
    let clean_catches: HashSet<PlayKey> = pff
        .iter()
        .filter(|p| p.is_clean_catch())
        .map(PffScouting::key)
        .collect();

    plays
        .iter()
        .filter(|p| p.is_punt_return())
        .map(Play::key)
        .filter(|key| clean_catches.contains(key))
        .collect()
}

/// Filter tracking rows down to the frames used for modeling.
///
/// Keeps rows of punt-return, clean-catch plays whose frame lies between the
/// `punt` and `punt_received` events, inclusive. Plays missing either event
/// are dropped. Input order is preserved.
pub fn modeling_frames(
    tracking: &[TrackingRow],
    plays: &[Play],
    pff: &[PffScouting],
) -> Vec<TrackingRow> {
    let eligible = modeling_plays(plays, pff);
    let events = frames_of_events(
        tracking.iter().filter(|r| eligible.contains(&r.play_key())),
        &[PUNT, PUNT_RECEIVED],
    );
    debug!(
        "{} eligible plays, {} with punt or catch events",
        eligible.len(),
        events.len()
    );

    tracking
        .iter()
        .filter(|row| {
            let key = row.play_key();
            if !eligible.contains(&key) {
                return false;
            }
            match events.span(key, PUNT, PUNT_RECEIVED) {
                Some((punt, catch)) => row.frame_id >= punt && row.frame_id <= catch,
                None => false,
            }
        })
        .cloned()
        .collect()
}
