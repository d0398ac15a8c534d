// Event-to-frame lookup.
//
// Tracking rows carry an event tag ("punt", "punt_received", "tackle", ...)
// on every entity of the frame where the event happened.

use std::collections::HashMap;

use crate::data::{PlayKey, TrackingRow};

pub const PUNT: &str = "punt";
pub const PUNT_RECEIVED: &str = "punt_received";

/// The frame on which each tracked event first appears, per play.
#[derive(Debug, Clone, Default)]
pub struct EventFrames {
    frames: HashMap<PlayKey, HashMap<String, u32>>,
}

impl EventFrames {
    /// Frame id of `event` in `play`, if the event was tagged.
    pub fn frame(&self, play: PlayKey, event: &str) -> Option<u32> {
        self.frames.get(&play)?.get(event).copied()
    }

    /// Frames of both `start` and `end`; `None` unless both are present.
    pub fn span(&self, play: PlayKey, start: &str, end: &str) -> Option<(u32, u32)> {
        Some((self.frame(play, start)?, self.frame(play, end)?))
    }

    /// Plays with at least one of the requested events.
    pub fn plays(&self) -> impl Iterator<Item = &PlayKey> {
        self.frames.keys()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Collect the frame of each named event for every play in `tracking`.
///
/// When an event is tagged on more than one frame of a play the earliest
/// frame wins.
pub fn frames_of_events<'a, I>(tracking: I, events: &[&str]) -> EventFrames
where
    I: IntoIterator<Item = &'a TrackingRow>,
{
    let mut frames: HashMap<PlayKey, HashMap<String, u32>> = HashMap::new();
    for row in tracking {
        let Some(event) = row.event.as_deref() else {
            continue;
        };
        if !events.contains(&event) {
            continue;
        }
        frames
            .entry(row.play_key())
            .or_default()
            .entry(event.to_string())
            .and_modify(|f| *f = (*f).min(row.frame_id))
            .or_insert(row.frame_id);
    }
    EventFrames { frames }
}
