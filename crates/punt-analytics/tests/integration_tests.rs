// Integration tests for punt-analytics.
//
// These tests run the loaders, the feature pipeline and the animation model
// end-to-end against the small Big Data Bowl extract in `tests/fixtures/`:
// one game, a clean-catch punt return (play 366), a fair catch (play 400)
// and a two-returner punt return (play 600).

use std::path::{Path, PathBuf};

use punt_analytics::animation::PlayAnimation;
use punt_analytics::app::{self, AppState};
use punt_analytics::config::{AnimationSettings, DataPaths, FeatureSettings};
use punt_analytics::data::{self, Dataset, PlayKey, TeamSide};
use punt_analytics::features::{self, OutputFormat};
use punt_analytics::protocol::{UiUpdate, UserCommand};

use tokio::sync::mpsc;

// ===========================================================================
// Test helpers
// ===========================================================================

/// Fixture directory path (relative to the crate root, which is the cwd for
/// `cargo test`).
const FIXTURES: &str = "tests/fixtures";

const GAME_ID: u64 = 2018090600;

fn fixture_paths() -> DataPaths {
    DataPaths {
        base_path: FIXTURES.into(),
        games: "games.csv".into(),
        plays: "plays.csv".into(),
        players: "players.csv".into(),
        pff_scouting: "PFFScoutingData.csv".into(),
        tracking: vec!["tracking2018.csv".into()],
    }
}

fn load_fixtures() -> Dataset {
    data::load_all_from_paths(&fixture_paths()).expect("fixtures should load")
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("punt-analytics-{name}"));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

fn approx(actual: Option<f64>, expected: f64) {
    let value = actual.unwrap_or_else(|| panic!("expected {expected}, got None"));
    assert!(
        (value - expected).abs() < 1e-6,
        "expected {expected}, got {value}"
    );
}

// ===========================================================================
// Loading
// ===========================================================================

#[test]
fn loads_all_fixture_files() {
    let dataset = load_fixtures();
    assert_eq!(dataset.games.len(), 1);
    assert_eq!(dataset.plays.len(), 3);
    assert_eq!(dataset.players.len(), 4);
    assert_eq!(dataset.pff.len(), 3);
    // One row with x = NA is skipped
    assert_eq!(dataset.tracking.len(), 36);
}

#[test]
fn tracking_na_values_become_none() {
    let dataset = load_fixtures();
    let ball = dataset
        .tracking
        .iter()
        .find(|r| r.team == TeamSide::Football)
        .unwrap();
    assert!(ball.nfl_id.is_none());
    assert!(ball.jersey_number.is_none());
    assert!(ball.o.is_none());
    assert_eq!(ball.event.as_deref(), Some("ball_snap"));

    let no_event = dataset
        .tracking
        .iter()
        .find(|r| r.play_id == 366 && r.frame_id == 3)
        .unwrap();
    assert!(no_event.event.is_none());
}

#[test]
fn play_fields_parsed() {
    let dataset = load_fixtures();
    let play = dataset.play(PlayKey::new(GAME_ID, 366)).unwrap();
    assert!(play.is_punt_return());
    assert_eq!(play.single_returner(), Some(3));
    assert_eq!(play.yards_to_go, 12);
    assert!(play.description.contains("D.Sproles"));

    let multi = dataset.play(PlayKey::new(GAME_ID, 600)).unwrap();
    assert!(multi.is_punt_return());
    assert_eq!(multi.single_returner(), None);
}

#[test]
fn missing_file_is_io_error() {
    let mut paths = fixture_paths();
    paths.tracking = vec!["tracking2099.csv".into()];
    let err = data::load_all_from_paths(&paths).unwrap_err();
    assert!(matches!(err, data::DataError::Io { .. }));
}

fn assert_validation_error(paths: &DataPaths, source: &str) {
    match data::load_all_from_paths(paths) {
        Err(data::DataError::Validation(message)) => {
            assert!(message.contains(source), "unexpected message: {message}")
        }
        Err(other) => panic!("expected a validation error, got {other}"),
        Ok(_) => panic!("expected a validation error, got a dataset"),
    }
}

#[test]
fn header_only_tracking_is_rejected() {
    let mut paths = fixture_paths();
    paths.tracking = vec!["invalid/tracking_header_only.csv".into()];
    assert_validation_error(&paths, "tracking");
}

#[test]
fn header_only_plays_is_rejected() {
    let mut paths = fixture_paths();
    paths.plays = "invalid/plays_header_only.csv".into();
    assert_validation_error(&paths, "plays");
}

#[test]
fn unparseable_game_dates_leave_no_games() {
    let mut paths = fixture_paths();
    paths.games = "invalid/games_bad_date.csv".into();
    assert_validation_error(&paths, "games");
}

// ===========================================================================
// Feature pipeline
// ===========================================================================

#[test]
fn modeling_frames_span_punt_to_catch() {
    let dataset = load_fixtures();
    let frames = features::frames::modeling_frames(&dataset.tracking, &dataset.plays, &dataset.pff);
    // Play 366: frames 2-4 x 5 entities; play 600: frames 1-3 x 3 entities
    assert_eq!(frames.len(), 15 + 9);
    assert!(frames.iter().all(|r| r.play_id != 400));
    let play_366: Vec<u32> = frames
        .iter()
        .filter(|r| r.play_id == 366)
        .map(|r| r.frame_id)
        .collect();
    assert!(play_366.iter().all(|f| (2..=4).contains(f)));
}

#[test]
fn feature_table_for_clean_catch_return() {
    let dataset = load_fixtures();
    let table = features::build_feature_table(&dataset, &FeatureSettings::default()).unwrap();

    // Only the single-returner play produces defender rows
    assert_eq!(table.rows.len(), 3);
    let frame_ids: Vec<u32> = table.rows.iter().map(|r| r.key.frame_id).collect();
    assert_eq!(frame_ids, vec![2, 3, 4]);
    assert!(table.rows.iter().all(|r| r.key.play_id == 366));

    let first = &table.rows[0];
    approx(first.time_to_catch, 0.2);
    approx(first.s_dwnfld, 2.0);
    assert_eq!(first.defenders.len(), 4);

    // Closest: the stationary safety 5 yards away
    let closest = first.defenders[0].unwrap();
    assert!((closest.dist - 5.0).abs() < 1e-6);
    assert!((closest.up_gut_leverage - 4.0).abs() < 1e-6);
    approx(closest.time_to_close, 500.0);

    // Then the punter running down at 5 yd/s
    let second = first.defenders[1].unwrap();
    assert!((second.dist - 40.0).abs() < 1e-6);
    approx(second.time_to_close, 8.0);
    assert!(first.defenders[2].is_none());

    let catch = &table.rows[2];
    approx(catch.time_to_catch, 0.0);
    assert!((catch.defenders[1].unwrap().dist - 20.0).abs() < 1e-6);
}

#[test]
fn feature_table_respects_n_defenders() {
    let dataset = load_fixtures();
    let settings = FeatureSettings {
        n_defenders: 1,
        ..FeatureSettings::default()
    };
    let table = features::build_feature_table(&dataset, &settings).unwrap();
    assert!(table.rows.iter().all(|r| r.defenders.len() == 1));
    assert_eq!(table.header().len(), 5 + 3);
}

#[test]
fn raw_direction_keeps_left_moving_speed_negative() {
    let dataset = load_fixtures();
    let settings = FeatureSettings {
        standardize_direction: false,
        ..FeatureSettings::default()
    };
    let table = features::build_feature_table(&dataset, &settings).unwrap();
    assert_eq!(table.rows.len(), 3);

    // The returner runs at dir 90 on a left-moving play: backwards in raw
    // coordinates, downfield once mirrored.
    let first = &table.rows[0];
    approx(first.time_to_catch, 0.2);
    approx(first.s_dwnfld, -2.0);
    assert!((first.defenders[0].unwrap().dist - 5.0).abs() < 1e-6);
}

#[test]
fn feature_csv_written_to_disk() {
    let dataset = load_fixtures();
    let table = features::build_feature_table(&dataset, &FeatureSettings::default()).unwrap();

    let dir = scratch_dir("features-csv");
    let path = dir.join("out").join("features.csv");
    table.write_to(&path, OutputFormat::Csv).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let mut lines = text.lines();
    let header = lines.next().unwrap();
    assert!(header.starts_with("gameId,playId,frameId,timeToCatch,s_dwnfld,dist_1"));
    assert!(header.ends_with("upGutLeverage_4"));
    assert_eq!(lines.count(), 3);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn feature_json_lines_written_to_disk() {
    let dataset = load_fixtures();
    let table = features::build_feature_table(&dataset, &FeatureSettings::default()).unwrap();

    let dir = scratch_dir("features-json");
    let path = dir.join("features.jsonl");
    table.write_to(&path, OutputFormat::JsonLines).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let rows: Vec<serde_json::Value> = text
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["frameId"], 2);
    assert!(rows[0]["dist_3"].is_null());

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn modeling_play_summaries() {
    let dataset = load_fixtures();
    let summaries = features::summarize_modeling_plays(&dataset);
    assert_eq!(summaries.len(), 2);

    assert_eq!(summaries[0].play, PlayKey::new(GAME_ID, 366));
    assert_eq!(summaries[0].punt_frame, 2);
    assert_eq!(summaries[0].catch_frame, 4);
    assert_eq!(summaries[0].returner_id, Some(3));
    assert_eq!(summaries[0].kick_length, Some(47.0));
    assert_eq!(summaries[0].kick_return_yardage, Some(6.0));
    assert_eq!(summaries[0].return_direction.as_deref(), Some("R"));

    assert_eq!(summaries[1].play, PlayKey::new(GAME_ID, 600));
    assert_eq!(summaries[1].punt_frame, 1);
    assert_eq!(summaries[1].catch_frame, 3);
    assert_eq!(summaries[1].returner_id, None);
    assert_eq!(summaries[1].return_direction.as_deref(), Some("L"));

    let json = serde_json::to_value(&summaries[0]).unwrap();
    assert_eq!(json["play"]["play_id"], 366);
    assert_eq!(json["kick_length"], 47.0);
}

// ===========================================================================
// Animation
// ===========================================================================

fn fixture_animation(dataset: &Dataset, settings: &AnimationSettings) -> PlayAnimation {
    PlayAnimation::new(
        &dataset.tracking,
        &dataset.plays,
        &dataset.games,
        GAME_ID,
        366,
        settings,
    )
    .unwrap()
}

#[test]
fn animation_title_and_frames() {
    let dataset = load_fixtures();
    let anim = fixture_animation(&dataset, &AnimationSettings::default());
    assert_eq!(
        anim.title(),
        "(1Q 09:12) ATL Possession, 4th & 12 at ATL 28 [09/06/2018, ATL @ PHI] [gameId=2018090600, playId=366]"
    );
    assert_eq!(anim.frame_ids(), &[1, 2, 3, 4, 5]);
    assert_eq!(anim.num_players(), 4);
}

#[test]
fn animation_field_layer_and_update() {
    let dataset = load_fixtures();
    let mut anim = fixture_animation(&dataset, &AnimationSettings::default());

    let layer = anim.base_plot();
    assert_eq!(layer.line_of_scrimmage, Some(80.0));
    // Moving left, 12 to go
    assert_eq!(layer.first_down, Some(68.0));

    let artists = anim.update(4);
    assert_eq!(artists.event.as_deref(), Some("punt_received"));
    assert_eq!(artists.football.offsets, vec![(30.0, 33.3)]);
    assert_eq!(artists.home.offsets.len(), 2);
    assert_eq!(artists.away.offsets.len(), 2);

    let returner = &artists.players[0];
    assert_eq!(returner.name.text, "Sproles");
    assert_eq!(returner.number.text, "43");
    assert_eq!(returner.position_label.text, "PR");
    assert_eq!(returner.track.points.len(), 4);
    assert!((returner.number.position.1 - (33.3 + 1.9)).abs() < 1e-9);
}

#[test]
fn animation_unknown_play_is_error() {
    let dataset = load_fixtures();
    let result = PlayAnimation::new(
        &dataset.tracking,
        &dataset.plays,
        &dataset.games,
        GAME_ID,
        9999,
        &AnimationSettings::default(),
    );
    assert!(result.is_err());
}

#[tokio::test(start_paused = true)]
async fn playback_over_fixture_play() {
    let dataset = load_fixtures();
    let settings = AnimationSettings {
        loop_playback: false,
        ..AnimationSettings::default()
    };
    let state = AppState::new(fixture_animation(&dataset, &settings), &settings);

    let (cmd_tx, cmd_rx) = mpsc::channel(16);
    let (ui_tx, mut ui_rx) = mpsc::channel(64);
    let handle = tokio::spawn(app::run(cmd_rx, ui_tx, state));

    assert!(matches!(ui_rx.recv().await.unwrap(), UiUpdate::Field { .. }));

    let mut frames_seen = Vec::new();
    loop {
        match ui_rx.recv().await.unwrap() {
            UiUpdate::Frame(snapshot) => frames_seen.push(snapshot.artists.frame_id),
            UiUpdate::PlaybackStatus { paused } => {
                assert!(paused);
                break;
            }
            other => panic!("unexpected update {:?}", other),
        }
    }
    assert_eq!(frames_seen, vec![1, 2, 3, 4, 5]);

    cmd_tx.send(UserCommand::Quit).await.unwrap();
    handle.await.unwrap().unwrap();
}

// ===========================================================================
// Configuration
// ===========================================================================

#[test]
fn shipped_defaults_parse() {
    let dir = scratch_dir("config-defaults");
    std::fs::create_dir_all(dir.join("defaults")).unwrap();
    std::fs::copy(
        Path::new("defaults").join("analysis.toml"),
        dir.join("defaults").join("analysis.toml"),
    )
    .unwrap();

    let config = punt_analytics::config::load_config(&dir).unwrap();
    assert!(dir.join("config").join("analysis.toml").exists());
    assert_eq!(config.features.n_defenders, 4);
    assert_eq!(config.data_paths.tracking.len(), 3);

    let _ = std::fs::remove_dir_all(&dir);
}
