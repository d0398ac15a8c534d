// Play animation model: title, static field layer, and per-frame artists.
//
// `PlayAnimation` owns one play's tracking rows. `base_plot` builds the field
// layer and allocates one artist slot per player; `update` moves every
// artist to a given frame. Rendering lives in the `tui` module.

pub mod field;

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use crate::config::AnimationSettings;
use crate::data::teams::{team_colors, Rgb, TeamColors};
use crate::data::{Game, Play, PlayDirection, PlayKey, TeamSide, TrackingRow};

use field::{build_field_layer, FieldLayer};

/// Track histories are drawn at half opacity.
pub const TRACK_ALPHA: f64 = 0.5;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum AnimationError {
    #[error("play {0} not found in plays data")]
    PlayNotFound(PlayKey),

    #[error("game {0} not found in games data")]
    GameNotFound(u64),

    #[error("no team colors for abbreviation '{0}'")]
    UnknownTeam(String),

    #[error("no tracking rows for play {0}")]
    EmptyTracking(PlayKey),
}

// ---------------------------------------------------------------------------
// Artists
// ---------------------------------------------------------------------------

/// A set of same-colored dots.
#[derive(Debug, Clone, PartialEq)]
pub struct Scatter {
    pub offsets: Vec<(f64, f64)>,
    pub color: Rgb,
    pub edge: Option<Rgb>,
}

impl Scatter {
    fn new(color: Rgb, edge: Option<Rgb>) -> Self {
        Scatter {
            offsets: Vec::new(),
            color,
            edge,
        }
    }
}

/// A label anchored (centered) at a field position.
#[derive(Debug, Clone, PartialEq)]
pub struct TextArtist {
    pub position: (f64, f64),
    pub text: String,
    pub color: Rgb,
}

impl Default for TextArtist {
    fn default() -> Self {
        TextArtist {
            position: (0.0, 0.0),
            text: String::new(),
            color: Rgb::BLACK,
        }
    }
}

/// A player's path from the first frame up to the current one.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackArtist {
    pub points: Vec<(f64, f64)>,
    pub color: Rgb,
    pub alpha: f64,
}

impl Default for TrackArtist {
    fn default() -> Self {
        TrackArtist {
            points: Vec::new(),
            color: Rgb::BLACK,
            alpha: TRACK_ALPHA,
        }
    }
}

/// Everything drawn for one player slot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerArtists {
    pub position_label: TextArtist,
    pub number: TextArtist,
    pub name: TextArtist,
    pub track: TrackArtist,
}

impl PlayerArtists {
    fn clear(&mut self) {
        self.position_label.text.clear();
        self.number.text.clear();
        self.name.text.clear();
        self.track.points.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.number.text.is_empty() && self.track.points.is_empty()
    }
}

/// All changing plot primitives at one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameArtists {
    pub frame_id: u32,
    /// Event tagged on this frame, if any.
    pub event: Option<String>,
    pub football: Scatter,
    pub home: Scatter,
    pub away: Scatter,
    pub players: Vec<PlayerArtists>,
}

// ---------------------------------------------------------------------------
// Title
// ---------------------------------------------------------------------------

fn down_ordinal(down: u8) -> Option<&'static str> {
    match down {
        1 => Some("1st"),
        2 => Some("2nd"),
        3 => Some("3rd"),
        4 => Some("4th"),
        _ => None,
    }
}

/// Drop the trailing `:SS` from an `MM:SS:xx` game clock.
pub fn trim_clock(clock: &str) -> &str {
    if clock.matches(':').count() >= 2 {
        clock.rsplit_once(':').map_or(clock, |(head, _)| head)
    } else {
        clock
    }
}

/// Plot title, e.g.
/// `(2Q 10:33) ATL Possession, 3rd & 5 at ATL 32 [09/08/2018, ATL @ KC] [gameId=1234, playId=123]`.
///
/// Downs outside 1-4 (kickoffs, PATs) omit the down-and-distance segment.
pub fn play_title(play: &Play, game: &Game) -> String {
    let togo = if play.yards_to_go == play.yardline_number {
        "Goal".to_string()
    } else {
        play.yards_to_go.to_string()
    };
    let situation = match down_ordinal(play.down) {
        Some(down) => format!("{} Possession, {down} & {togo}", play.possession_team),
        None => format!("{} Possession", play.possession_team),
    };
    let spot = match &play.yardline_side {
        Some(side) => format!("{side} {}", play.yardline_number),
        None => play.yardline_number.to_string(),
    };
    format!(
        "({}Q {}) {situation} at {spot} [{}, {} @ {}] [gameId={}, playId={}]",
        play.quarter,
        trim_clock(&play.game_clock),
        game.game_date.format("%m/%d/%Y"),
        game.visitor_team_abbr,
        game.home_team_abbr,
        play.game_id,
        play.play_id,
    )
}

/// Last whitespace-separated token of a display name.
fn last_name(display_name: &str) -> &str {
    display_name.split_whitespace().last().unwrap_or("")
}

// ---------------------------------------------------------------------------
// PlayAnimation
// ---------------------------------------------------------------------------

/// One play prepared for frame-by-frame drawing.
#[derive(Debug, Clone)]
pub struct PlayAnimation {
    key: PlayKey,
    title: String,
    first_down_distance: u32,
    num_players: usize,
    home_colors: TeamColors,
    away_colors: TeamColors,
    frame_data: Vec<TrackingRow>,
    frame_ids: Vec<u32>,
    /// Per-player `(frame_id, x, y)` in frame order.
    tracks: HashMap<u32, Vec<(u32, f64, f64)>>,
    number_offset: f64,
    artists: FrameArtists,
}

impl PlayAnimation {
    pub fn new(
        tracking: &[TrackingRow],
        plays: &[Play],
        games: &[Game],
        game_id: u64,
        play_id: u32,
        settings: &AnimationSettings,
    ) -> Result<Self, AnimationError> {
        let key = PlayKey::new(game_id, play_id);
        let play = plays
            .iter()
            .find(|p| p.key() == key)
            .ok_or(AnimationError::PlayNotFound(key))?;
        let game = games
            .iter()
            .find(|g| g.game_id == game_id)
            .ok_or(AnimationError::GameNotFound(game_id))?;

        let mut frame_data: Vec<TrackingRow> = tracking
            .iter()
            .filter(|r| r.play_key() == key)
            .cloned()
            .collect();
        if frame_data.is_empty() {
            return Err(AnimationError::EmptyTracking(key));
        }
        // Stable sort keeps the file order within a frame.
        frame_data.sort_by_key(|r| r.frame_id);
        let mut unique: Vec<TrackingRow> = Vec::with_capacity(frame_data.len());
        for row in frame_data {
            let seen = unique
                .iter()
                .rev()
                .take_while(|u| u.frame_id == row.frame_id)
                .any(|u| *u == row);
            if !seen {
                unique.push(row);
            }
        }
        let frame_data = unique;

        let home_colors = team_colors(&game.home_team_abbr)
            .ok_or_else(|| AnimationError::UnknownTeam(game.home_team_abbr.clone()))?;
        let away_colors = team_colors(&game.visitor_team_abbr)
            .ok_or_else(|| AnimationError::UnknownTeam(game.visitor_team_abbr.clone()))?;

        let frame_ids: Vec<u32> = frame_data
            .iter()
            .map(|r| r.frame_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let num_players = frame_data
            .iter()
            .filter_map(|r| r.nfl_id)
            .collect::<BTreeSet<_>>()
            .len();

        let mut tracks: HashMap<u32, Vec<(u32, f64, f64)>> = HashMap::new();
        for row in &frame_data {
            if let Some(id) = row.nfl_id {
                tracks.entry(id).or_default().push((row.frame_id, row.x, row.y));
            }
        }

        debug!(
            "Prepared animation for {key}: {} frames, {} players",
            frame_ids.len(),
            num_players
        );

        Ok(PlayAnimation {
            key,
            title: play_title(play, game),
            first_down_distance: play.yards_to_go,
            num_players,
            home_colors,
            away_colors,
            frame_data,
            frame_ids,
            tracks,
            number_offset: settings.number_offset,
            artists: FrameArtists {
                frame_id: 0,
                event: None,
                football: Scatter::new(Rgb::BROWN, None),
                home: Scatter::new(home_colors.main, Some(home_colors.secondary)),
                away: Scatter::new(away_colors.main, Some(away_colors.secondary)),
                players: Vec::new(),
            },
        })
    }

    pub fn key(&self) -> PlayKey {
        self.key
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn frame_ids(&self) -> &[u32] {
        &self.frame_ids
    }

    pub fn num_players(&self) -> usize {
        self.num_players
    }

    pub fn artists(&self) -> &FrameArtists {
        &self.artists
    }

    fn colors_for(&self, team: TeamSide) -> Option<TeamColors> {
        match team {
            TeamSide::Home => Some(self.home_colors),
            TeamSide::Away => Some(self.away_colors),
            TeamSide::Football => None,
        }
    }

    /// Build the static field layer and reset the per-player artist slots.
    ///
    /// The line of scrimmage is the football's x on its first tracked frame.
    pub fn base_plot(&mut self) -> FieldLayer {
        let first = self.frame_data.first();
        let line_of_scrimmage = self
            .frame_data
            .iter()
            .find(|r| r.is_football())
            .map(|r| r.x);
        let direction_factor = match first.map(|r| r.play_direction) {
            Some(PlayDirection::Left) => -1.0,
            _ => 1.0,
        };

        self.artists.players = vec![PlayerArtists::default(); self.num_players];
        build_field_layer(line_of_scrimmage, self.first_down_distance, direction_factor)
    }

    /// Move every artist to `frame_id` and return them.
    ///
    /// Slots beyond the number of players on this frame are cleared.
    pub fn update(&mut self, frame_id: u32) -> &FrameArtists {
        let offset = self.number_offset;
        let pos: Vec<&TrackingRow> = self
            .frame_data
            .iter()
            .filter(|r| r.frame_id == frame_id)
            .collect();

        let mut football = Vec::new();
        let mut home = Vec::new();
        let mut away = Vec::new();
        for row in &pos {
            match row.team {
                TeamSide::Football => football.push((row.x, row.y)),
                TeamSide::Home => home.push((row.x, row.y)),
                TeamSide::Away => away.push((row.x, row.y)),
            }
        }

        let player_rows: Vec<&TrackingRow> = pos
            .iter()
            .copied()
            .filter(|r| r.jersey_number.is_some())
            .collect();
        if self.artists.players.len() < player_rows.len() {
            self.artists
                .players
                .resize(player_rows.len(), PlayerArtists::default());
        }

        let mut slots = std::mem::take(&mut self.artists.players);
        for (index, slot) in slots.iter_mut().enumerate() {
            let Some(player) = player_rows.get(index) else {
                slot.clear();
                continue;
            };
            let Some(colors) = self.colors_for(player.team) else {
                slot.clear();
                continue;
            };

            slot.position_label = TextArtist {
                position: (player.x, player.y),
                text: player.position.clone().unwrap_or_default(),
                color: colors.secondary,
            };
            slot.number = TextArtist {
                position: (player.x, player.y + offset),
                text: player
                    .jersey_number
                    .map(|n| n.to_string())
                    .unwrap_or_default(),
                color: colors.main,
            };
            slot.name = TextArtist {
                position: (player.x, player.y - offset),
                text: last_name(&player.display_name).to_string(),
                color: colors.main,
            };
            slot.track.points = player
                .nfl_id
                .and_then(|id| self.tracks.get(&id))
                .map(|history| {
                    history
                        .iter()
                        .take_while(|(f, _, _)| *f <= frame_id)
                        .map(|(_, x, y)| (*x, *y))
                        .collect()
                })
                .unwrap_or_default();
            slot.track.color = colors.main;
        }

        self.artists.players = slots;
        self.artists.frame_id = frame_id;
        self.artists.event = pos.iter().find_map(|r| r.event.clone());
        self.artists.football.offsets = football;
        self.artists.home.offsets = home;
        self.artists.away.offsets = away;
        &self.artists
    }
}
