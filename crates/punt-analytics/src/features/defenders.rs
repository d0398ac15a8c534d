// Defender-to-returner spatial features.
//
// For every frame of a single-returner play, each player on the kicking
// team is measured against the returner, ranked by distance, and the
// closest N are pivoted into one row per frame.

use std::collections::HashMap;

use tracing::debug;

use crate::data::{FrameKey, Game, Play, TeamSide, TrackingRow};

use super::catch::returner_rows;

/// One kicking-team player measured against the returner at one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct DefenderObservation {
    pub key: FrameKey,
    pub nfl_id: Option<u32>,
    /// Abbreviation of the team the defender plays for.
    pub punt_team_abbr: String,
    pub dist: f64,
    /// 1 for the closest defender in the frame.
    pub dist_order: usize,
    pub time_to_close: Option<f64>,
    pub up_gut_leverage: f64,
}

/// The pivoted values for one distance rank.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DefenderSlot {
    pub dist: f64,
    pub time_to_close: Option<f64>,
    pub up_gut_leverage: f64,
}

/// One frame with the closest defenders by rank. `slots[k]` holds rank
/// `k + 1`; ranks beyond the number of defenders on the field are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct DefenderFrame {
    pub key: FrameKey,
    pub slots: Vec<Option<DefenderSlot>>,
}

/// Seconds for the defender to cover `dist` at current speed. Speeds below
/// `min_speed` are clamped to it.
pub fn time_to_close(dist: f64, speed: Option<f64>, min_speed: f64) -> Option<f64> {
    speed.map(|s| dist / s.max(min_speed))
}

/// Long-form observations for every defender in every returner frame, in
/// `(gameId, playId, frameId, dist)` order.
pub fn defender_observations(
    tracking: &[TrackingRow],
    plays: &[Play],
    games: &[Game],
    min_speed: f64,
) -> Vec<DefenderObservation> {
    let games_by_id: HashMap<u64, &Game> = games.iter().map(|g| (g.game_id, g)).collect();

    let mut by_frame: HashMap<FrameKey, Vec<&TrackingRow>> = HashMap::new();
    for row in tracking {
        by_frame.entry(row.frame_key()).or_default().push(row);
    }

    let mut returners = returner_rows(tracking, plays);
    returners.sort_by_key(|r| r.frame_key());
    returners.dedup_by_key(|r| r.frame_key());

    let mut out = Vec::new();
    for returner in returners {
        let key = returner.frame_key();
        let Some(game) = games_by_id.get(&returner.game_id) else {
            continue;
        };
        let Some(frame_rows) = by_frame.get(&key) else {
            continue;
        };

        let mut frame_obs: Vec<DefenderObservation> = frame_rows
            .iter()
            .filter(|r| r.team != returner.team && r.team != TeamSide::Football)
            .map(|r| {
                let dx = r.x - returner.x;
                let dy = r.y - returner.y;
                let dist = (dx * dx + dy * dy).sqrt();
                let punt_team_abbr = if r.team == TeamSide::Home {
                    game.home_team_abbr.clone()
                } else {
                    game.visitor_team_abbr.clone()
                };
                DefenderObservation {
                    key,
                    nfl_id: r.nfl_id,
                    punt_team_abbr,
                    dist,
                    dist_order: 0,
                    time_to_close: time_to_close(dist, r.s, min_speed),
                    up_gut_leverage: dy.abs(),
                }
            })
            .collect();

        frame_obs.sort_by(|a, b| a.dist.total_cmp(&b.dist));
        for (i, obs) in frame_obs.iter_mut().enumerate() {
            obs.dist_order = i + 1;
        }
        out.extend(frame_obs);
    }

    debug!("{} defender observations", out.len());
    out
}

/// Pivot the closest `n_defenders` into one row per frame, sorted by frame
/// key. Frames without any defender produce no row.
pub fn by_defender(
    tracking: &[TrackingRow],
    plays: &[Play],
    games: &[Game],
    n_defenders: usize,
    min_speed: f64,
) -> Vec<DefenderFrame> {
    let observations = defender_observations(tracking, plays, games, min_speed);

    let mut frames: Vec<DefenderFrame> = Vec::new();
    for obs in observations.into_iter().filter(|o| o.dist_order <= n_defenders) {
        let needs_new = frames.last().map_or(true, |f| f.key != obs.key);
        if needs_new {
            frames.push(DefenderFrame {
                key: obs.key,
                slots: vec![None; n_defenders],
            });
        }
        if let Some(frame) = frames.last_mut() {
            frame.slots[obs.dist_order - 1] = Some(DefenderSlot {
                dist: obs.dist,
                time_to_close: obs.time_to_close,
                up_gut_leverage: obs.up_gut_leverage,
            });
        }
    }
    frames
}
