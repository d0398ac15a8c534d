// Big Data Bowl CSV loading and normalization.
//
// Reads the special-teams release: games, plays, players, PFF scouting and
// one or more tracking files. Tracking rows use "NA" for missing numeric
// values (the football has no nflId or jersey number) and "None" for frames
// without an event.

pub mod standardize;
pub mod teams;

use crate::config::{Config, DataPaths};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

// ---------------------------------------------------------------------------
// Keys
// ---------------------------------------------------------------------------

/// Identifies a single play within a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PlayKey {
    pub game_id: u64,
    pub play_id: u32,
}

impl PlayKey {
    pub fn new(game_id: u64, play_id: u32) -> Self {
        PlayKey { game_id, play_id }
    }
}

impl fmt::Display for PlayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gameId={}, playId={}", self.game_id, self.play_id)
    }
}

/// Identifies a single tracking frame within a play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameKey {
    pub game_id: u64,
    pub play_id: u32,
    pub frame_id: u32,
}

impl FrameKey {
    pub fn play(&self) -> PlayKey {
        PlayKey::new(self.game_id, self.play_id)
    }
}

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Which entity a tracking row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TeamSide {
    Home,
    Away,
    Football,
}

impl TeamSide {
    pub fn from_str_side(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "home" => Some(TeamSide::Home),
            "away" => Some(TeamSide::Away),
            "football" => Some(TeamSide::Football),
            _ => None,
        }
    }
}

/// Direction the possessing team is moving on the raw field coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayDirection {
    Left,
    Right,
}

impl PlayDirection {
    pub fn from_str_direction(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "left" => Some(PlayDirection::Left),
            "right" => Some(PlayDirection::Right),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Game {
    pub game_id: u64,
    pub game_date: NaiveDate,
    pub home_team_abbr: String,
    pub visitor_team_abbr: String,
}

#[derive(Debug, Clone)]
pub struct Play {
    pub game_id: u64,
    pub play_id: u32,
    pub description: String,
    pub quarter: u8,
    /// 0 on kickoffs and extra points.
    pub down: u8,
    pub yards_to_go: u32,
    pub possession_team: String,
    pub special_teams_play_type: String,
    pub special_teams_result: String,
    /// Raw returner column; several ids are joined with `;`.
    pub returner_id: Option<String>,
    pub yardline_side: Option<String>,
    pub yardline_number: u32,
    pub game_clock: String,
    pub kick_length: Option<f64>,
    pub kick_return_yardage: Option<f64>,
}

impl Play {
    pub fn key(&self) -> PlayKey {
        PlayKey::new(self.game_id, self.play_id)
    }

    pub fn is_punt_return(&self) -> bool {
        self.special_teams_play_type == "Punt" && self.special_teams_result == "Return"
    }

    /// The returner's nflId when exactly one returner is listed.
    pub fn single_returner(&self) -> Option<u32> {
        let raw = self.returner_id.as_deref()?;
        if raw.contains(';') {
            return None;
        }
        parse_id(raw)
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    pub nfl_id: u32,
    pub display_name: String,
    pub position: String,
}

#[derive(Debug, Clone)]
pub struct PffScouting {
    pub game_id: u64,
    pub play_id: u32,
    pub kick_contact_type: Option<String>,
    pub return_direction_actual: Option<String>,
}

impl PffScouting {
    pub fn key(&self) -> PlayKey {
        PlayKey::new(self.game_id, self.play_id)
    }

    /// PFF code "CC": the returner caught the punt cleanly.
    pub fn is_clean_catch(&self) -> bool {
        self.kick_contact_type.as_deref() == Some("CC")
    }
}

/// One entity (player or football) at one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackingRow {
    pub game_id: u64,
    pub play_id: u32,
    pub frame_id: u32,
    /// `None` for the football.
    pub nfl_id: Option<u32>,
    pub display_name: String,
    pub jersey_number: Option<u32>,
    pub position: Option<String>,
    pub team: TeamSide,
    pub x: f64,
    pub y: f64,
    pub s: Option<f64>,
    pub a: Option<f64>,
    pub o: Option<f64>,
    pub dir: Option<f64>,
    pub event: Option<String>,
    pub play_direction: PlayDirection,
}

impl TrackingRow {
    pub fn play_key(&self) -> PlayKey {
        PlayKey::new(self.game_id, self.play_id)
    }

    pub fn frame_key(&self) -> FrameKey {
        FrameKey {
            game_id: self.game_id,
            play_id: self.play_id,
            frame_id: self.frame_id,
        }
    }

    pub fn is_football(&self) -> bool {
        self.team == TeamSide::Football
    }
}

/// All CSV data loaded and ready for the feature pipeline.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub games: Vec<Game>,
    pub plays: Vec<Play>,
    pub players: Vec<Player>,
    pub pff: Vec<PffScouting>,
    pub tracking: Vec<TrackingRow>,
}

impl Dataset {
    pub fn game(&self, game_id: u64) -> Option<&Game> {
        self.games.iter().find(|g| g.game_id == game_id)
    }

    pub fn play(&self, key: PlayKey) -> Option<&Play> {
        self.plays.iter().find(|p| p.key() == key)
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("validation error: {0}")]
    Validation(String),
}

// ---------------------------------------------------------------------------
// Raw CSV serde structs (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawGame {
    game_id: u64,
    game_date: String,
    home_team_abbr: String,
    visitor_team_abbr: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPlay {
    game_id: u64,
    play_id: u32,
    #[serde(default)]
    play_description: String,
    quarter: u8,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    down: Option<u8>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    yards_to_go: Option<u32>,
    #[serde(default)]
    possession_team: String,
    #[serde(default)]
    special_teams_play_type: String,
    #[serde(default)]
    special_teams_result: String,
    #[serde(default)]
    returner_id: String,
    #[serde(default)]
    yardline_side: String,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    yardline_number: Option<u32>,
    #[serde(default)]
    game_clock: String,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    kick_length: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    kick_return_yardage: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPlayer {
    #[serde(deserialize_with = "csv::invalid_option")]
    nfl_id: Option<f64>,
    display_name: String,
    #[serde(default, alias = "Position")]
    position: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPff {
    game_id: u64,
    play_id: u32,
    #[serde(default)]
    kick_contact_type: String,
    #[serde(default)]
    return_direction_actual: String,
}

/// Tracking CSV row. Ids are read as f64 because some exports write them
/// as `12345.0`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTracking {
    game_id: u64,
    play_id: u32,
    frame_id: u32,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    nfl_id: Option<f64>,
    #[serde(default)]
    display_name: String,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    jersey_number: Option<f64>,
    #[serde(default)]
    position: String,
    team: String,
    x: f64,
    y: f64,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    s: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    a: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    o: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    dir: Option<f64>,
    #[serde(default)]
    event: String,
    play_direction: String,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Trimmed text, or `None` for empty and "NA" cells.
fn na_to_none(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "NA" {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Parse an id that may be written as an integer or an integral float.
fn parse_id(raw: &str) -> Option<u32> {
    let value: f64 = raw.trim().parse().ok()?;
    id_from_f64(value)
}

fn id_from_f64(value: f64) -> Option<u32> {
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= u32::MAX as f64 {
        Some(value as u32)
    } else {
        None
    }
}

/// Keep only finite angles/speeds; NaN and inf become missing.
fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

fn parse_game_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, "%m/%d/%Y")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%Y-%m-%d"))
        .ok()
}

// ---------------------------------------------------------------------------
// Reader-based loaders (private, enable testing without temp files)
// ---------------------------------------------------------------------------

fn load_games_from_reader<R: Read>(rdr: R) -> Result<Vec<Game>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut games = Vec::new();
    for result in reader.deserialize::<RawGame>() {
        match result {
            Ok(raw) => {
                let Some(game_date) = parse_game_date(&raw.game_date) else {
                    warn!("skipping game {}: unparseable date '{}'", raw.game_id, raw.game_date);
                    continue;
                };
                games.push(Game {
                    game_id: raw.game_id,
                    game_date,
                    home_team_abbr: raw.home_team_abbr.trim().to_string(),
                    visitor_team_abbr: raw.visitor_team_abbr.trim().to_string(),
                });
            }
            Err(e) => {
                warn!("skipping malformed game row: {}", e);
            }
        }
    }
    Ok(games)
}

fn load_plays_from_reader<R: Read>(rdr: R) -> Result<Vec<Play>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut plays = Vec::new();
    for result in reader.deserialize::<RawPlay>() {
        match result {
            Ok(raw) => {
                plays.push(Play {
                    game_id: raw.game_id,
                    play_id: raw.play_id,
                    description: raw.play_description.trim().to_string(),
                    quarter: raw.quarter,
                    down: raw.down.unwrap_or(0),
                    yards_to_go: raw.yards_to_go.unwrap_or(0),
                    possession_team: raw.possession_team.trim().to_string(),
                    special_teams_play_type: raw.special_teams_play_type.trim().to_string(),
                    special_teams_result: raw.special_teams_result.trim().to_string(),
                    returner_id: na_to_none(&raw.returner_id),
                    yardline_side: na_to_none(&raw.yardline_side),
                    yardline_number: raw.yardline_number.unwrap_or(0),
                    game_clock: raw.game_clock.trim().to_string(),
                    kick_length: finite(raw.kick_length),
                    kick_return_yardage: finite(raw.kick_return_yardage),
                });
            }
            Err(e) => {
                warn!("skipping malformed play row: {}", e);
            }
        }
    }
    Ok(plays)
}

fn load_players_from_reader<R: Read>(rdr: R) -> Result<Vec<Player>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut players = Vec::new();
    for result in reader.deserialize::<RawPlayer>() {
        match result {
            Ok(raw) => {
                let Some(nfl_id) = raw.nfl_id.and_then(id_from_f64) else {
                    warn!("skipping player '{}': missing nflId", raw.display_name.trim());
                    continue;
                };
                players.push(Player {
                    nfl_id,
                    display_name: raw.display_name.trim().to_string(),
                    position: raw.position.trim().to_string(),
                });
            }
            Err(e) => {
                warn!("skipping malformed player row: {}", e);
            }
        }
    }
    Ok(players)
}

fn load_pff_from_reader<R: Read>(rdr: R) -> Result<Vec<PffScouting>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut rows = Vec::new();
    for result in reader.deserialize::<RawPff>() {
        match result {
            Ok(raw) => rows.push(PffScouting {
                game_id: raw.game_id,
                play_id: raw.play_id,
                kick_contact_type: na_to_none(&raw.kick_contact_type),
                return_direction_actual: na_to_none(&raw.return_direction_actual),
            }),
            Err(e) => {
                warn!("skipping malformed PFF scouting row: {}", e);
            }
        }
    }
    Ok(rows)
}

fn load_tracking_from_reader<R: Read>(rdr: R) -> Result<Vec<TrackingRow>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut rows = Vec::new();
    for result in reader.deserialize::<RawTracking>() {
        match result {
            Ok(raw) => {
                if !(raw.x.is_finite() && raw.y.is_finite()) {
                    warn!(
                        "skipping tracking row gameId={} playId={} frameId={}: non-finite position",
                        raw.game_id, raw.play_id, raw.frame_id
                    );
                    continue;
                }
                let Some(team) = TeamSide::from_str_side(&raw.team) else {
                    warn!("skipping tracking row: unknown team '{}'", raw.team);
                    continue;
                };
                let Some(play_direction) = PlayDirection::from_str_direction(&raw.play_direction)
                else {
                    warn!(
                        "skipping tracking row: unknown playDirection '{}'",
                        raw.play_direction
                    );
                    continue;
                };
                let event = match raw.event.trim() {
                    "" | "None" | "NA" => None,
                    other => Some(other.to_string()),
                };
                rows.push(TrackingRow {
                    game_id: raw.game_id,
                    play_id: raw.play_id,
                    frame_id: raw.frame_id,
                    nfl_id: raw.nfl_id.and_then(id_from_f64),
                    display_name: raw.display_name.trim().to_string(),
                    jersey_number: raw.jersey_number.and_then(id_from_f64),
                    position: na_to_none(&raw.position),
                    team,
                    x: raw.x,
                    y: raw.y,
                    s: finite(raw.s),
                    a: finite(raw.a),
                    o: finite(raw.o),
                    dir: finite(raw.dir),
                    event,
                    play_direction,
                });
            }
            Err(e) => {
                warn!("skipping malformed tracking row: {}", e);
            }
        }
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Public path-based loaders
// ---------------------------------------------------------------------------

fn open(path: &Path) -> Result<std::fs::File, DataError> {
    std::fs::File::open(path).map_err(|e| DataError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

fn csv_error(path: &Path) -> impl FnOnce(csv::Error) -> DataError + '_ {
    move |e| DataError::Csv {
        path: path.display().to_string(),
        source: e,
    }
}

pub fn load_games(path: &Path) -> Result<Vec<Game>, DataError> {
    load_games_from_reader(open(path)?).map_err(csv_error(path))
}

pub fn load_plays(path: &Path) -> Result<Vec<Play>, DataError> {
    load_plays_from_reader(open(path)?).map_err(csv_error(path))
}

pub fn load_players(path: &Path) -> Result<Vec<Player>, DataError> {
    load_players_from_reader(open(path)?).map_err(csv_error(path))
}

pub fn load_pff_scouting(path: &Path) -> Result<Vec<PffScouting>, DataError> {
    load_pff_from_reader(open(path)?).map_err(csv_error(path))
}

pub fn load_tracking(path: &Path) -> Result<Vec<TrackingRow>, DataError> {
    load_tracking_from_reader(open(path)?).map_err(csv_error(path))
}

/// Load every CSV named in the config.
pub fn load_all(config: &Config) -> Result<Dataset, DataError> {
    load_all_from_paths(&config.data_paths)
}

/// Load every CSV from explicit paths. Tracking files are concatenated in
/// the order given.
pub fn load_all_from_paths(paths: &DataPaths) -> Result<Dataset, DataError> {
    let games = load_games(&paths.resolve(&paths.games))?;
    let plays = load_plays(&paths.resolve(&paths.plays))?;
    let players = load_players(&paths.resolve(&paths.players))?;
    let pff = load_pff_scouting(&paths.resolve(&paths.pff_scouting))?;

    let mut tracking = Vec::new();
    for file_name in &paths.tracking {
        let rows = load_tracking(&paths.resolve(file_name))?;
        info!("Loaded {} tracking rows from {}", rows.len(), file_name);
        tracking.extend(rows);
    }

    if games.is_empty() {
        return Err(DataError::Validation("games CSV produced zero valid rows".into()));
    }
    if plays.is_empty() {
        return Err(DataError::Validation("plays CSV produced zero valid rows".into()));
    }
    if tracking.is_empty() {
        return Err(DataError::Validation(
            "tracking CSVs produced zero valid rows".into(),
        ));
    }

    Ok(Dataset {
        games,
        plays,
        players,
        pff,
        tracking,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
