// Feature pipeline: modeling-frame selection, catch timing, defender
// geometry, and the assembled per-frame feature table.

pub mod catch;
pub mod defenders;
pub mod events;
pub mod frames;

use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::config::FeatureSettings;
use crate::data::standardize::standardize_tracking_in_place;
use crate::data::{Dataset, FrameKey, PlayKey};

use defenders::DefenderSlot;
use events::{frames_of_events, PUNT, PUNT_RECEIVED};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum FeatureError {
    #[error("no tracking frames matched the punt-return modeling filter")]
    NoModelingFrames,

    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("output write error: {0}")]
    Write(#[source] std::io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON write error: {0}")]
    Json(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Feature table
// ---------------------------------------------------------------------------

/// All features for one modeling frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    pub key: FrameKey,
    pub time_to_catch: Option<f64>,
    pub s_dwnfld: Option<f64>,
    /// Closest defenders by rank; length is the table's `n_defenders`.
    pub defenders: Vec<Option<DefenderSlot>>,
}

#[derive(Debug, Clone)]
pub struct FeatureTable {
    pub n_defenders: usize,
    pub rows: Vec<FeatureRow>,
}

/// Output encodings supported by [`FeatureTable::write_to`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    JsonLines,
}

impl FeatureTable {
    /// Column names: keys, catch features, then each defender value for
    /// ranks 1..=n, grouped by value.
    pub fn header(&self) -> Vec<String> {
        let mut header: Vec<String> = ["gameId", "playId", "frameId", "timeToCatch", "s_dwnfld"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        for name in ["dist", "timeToClose", "upGutLeverage"] {
            for rank in 1..=self.n_defenders {
                header.push(format!("{name}_{rank}"));
            }
        }
        header
    }

    /// Cell values for one row, `None` where the value is missing.
    fn values(&self, row: &FeatureRow) -> Vec<Option<f64>> {
        let mut values = vec![row.time_to_catch, row.s_dwnfld];
        values.extend(row.defenders.iter().map(|d| d.map(|d| d.dist)));
        values.extend(row.defenders.iter().map(|d| d.and_then(|d| d.time_to_close)));
        values.extend(row.defenders.iter().map(|d| d.map(|d| d.up_gut_leverage)));
        values
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), FeatureError> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(self.header())?;
        for row in &self.rows {
            let mut record = vec![
                row.key.game_id.to_string(),
                row.key.play_id.to_string(),
                row.key.frame_id.to_string(),
            ];
            record.extend(
                self.values(row)
                    .into_iter()
                    .map(|v| v.map(|v| v.to_string()).unwrap_or_default()),
            );
            wtr.write_record(&record)?;
        }
        wtr.flush().map_err(FeatureError::Write)?;
        Ok(())
    }

    /// One JSON object per line with the same keys as the CSV header.
    pub fn write_json_lines<W: Write>(&self, mut writer: W) -> Result<(), FeatureError> {
        let header = self.header();
        for row in &self.rows {
            let mut object = serde_json::Map::new();
            object.insert(header[0].clone(), row.key.game_id.into());
            object.insert(header[1].clone(), row.key.play_id.into());
            object.insert(header[2].clone(), row.key.frame_id.into());
            for (name, value) in header[3..].iter().zip(self.values(row)) {
                object.insert(name.clone(), serde_json::to_value(value)?);
            }
            serde_json::to_writer(&mut writer, &object)?;
            writer.write_all(b"\n").map_err(FeatureError::Write)?;
        }
        writer.flush().map_err(FeatureError::Write)?;
        Ok(())
    }

    /// Write the table to `path`, creating parent directories.
    pub fn write_to(&self, path: &Path, format: OutputFormat) -> Result<(), FeatureError> {
        let io_err = |e: std::io::Error| FeatureError::Io {
            path: path.display().to_string(),
            source: e,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let file = std::fs::File::create(path).map_err(io_err)?;
        let writer = std::io::BufWriter::new(file);
        let written = match format {
            OutputFormat::Csv => self.write_csv(writer),
            OutputFormat::JsonLines => self.write_json_lines(writer),
        };
        written.map_err(|e| match e {
            FeatureError::Write(source) => io_err(source),
            other => other,
        })
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Run the full feature pipeline over a loaded dataset.
///
/// Steps:
/// 1. Select modeling frames (clean-catch punt returns, punt through catch).
/// 2. Optionally standardize play direction.
/// 3. Compute time to catch per frame.
/// 4. Rank defenders per frame and pivot the closest `n_defenders`.
/// 5. Attach the returner's downfield speed at the catch per play.
///
/// Rows are emitted for frames that have defender features, sorted by frame
/// key.
pub fn build_feature_table(
    dataset: &Dataset,
    settings: &FeatureSettings,
) -> Result<FeatureTable, FeatureError> {
    let mut tracking = frames::modeling_frames(&dataset.tracking, &dataset.plays, &dataset.pff);
    if tracking.is_empty() {
        return Err(FeatureError::NoModelingFrames);
    }
    info!("Selected {} modeling tracking rows", tracking.len());

    if settings.standardize_direction {
        standardize_tracking_in_place(&mut tracking);
    }

    let mut catch_times: HashMap<FrameKey, Option<f64>> = HashMap::new();
    for (row, ttc) in tracking
        .iter()
        .zip(catch::time_to_catch(&tracking, settings.frame_rate_hz))
    {
        catch_times.entry(row.frame_key()).or_insert(ttc);
    }

    let speeds: HashMap<PlayKey, Option<f64>> = catch::returner_speed_at_catch(&tracking, &dataset.plays)
        .into_iter()
        .map(|r| (r.play, r.s_dwnfld))
        .collect();

    let defender_frames = defenders::by_defender(
        &tracking,
        &dataset.plays,
        &dataset.games,
        settings.n_defenders,
        settings.min_speed,
    );

    let rows: Vec<FeatureRow> = defender_frames
        .into_iter()
        .map(|frame| FeatureRow {
            key: frame.key,
            time_to_catch: catch_times.get(&frame.key).copied().flatten(),
            s_dwnfld: speeds.get(&frame.key.play()).copied().flatten(),
            defenders: frame.slots,
        })
        .collect();

    info!(
        "Built {} feature rows across {} plays",
        rows.len(),
        speeds.len()
    );

    Ok(FeatureTable {
        n_defenders: settings.n_defenders,
        rows,
    })
}

// ---------------------------------------------------------------------------
// Play listing
// ---------------------------------------------------------------------------

/// A play that passes the modeling filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaySummary {
    pub play: PlayKey,
    pub punt_frame: u32,
    pub catch_frame: u32,
    pub returner_id: Option<u32>,
    pub kick_length: Option<f64>,
    pub kick_return_yardage: Option<f64>,
    /// PFF's charted return direction (`L`, `C` or `R`).
    pub return_direction: Option<String>,
    pub description: String,
}

/// Summaries of every clean-catch punt return with both events, sorted by
/// play key.
pub fn summarize_modeling_plays(dataset: &Dataset) -> Vec<PlaySummary> {
    let eligible = frames::modeling_plays(&dataset.plays, &dataset.pff);
    let events = frames_of_events(
        dataset
            .tracking
            .iter()
            .filter(|r| eligible.contains(&r.play_key())),
        &[PUNT, PUNT_RECEIVED],
    );

    let mut summaries: BTreeMap<PlayKey, PlaySummary> = BTreeMap::new();
    for key in events.plays() {
        let Some((punt_frame, catch_frame)) = events.span(*key, PUNT, PUNT_RECEIVED) else {
            continue;
        };
        let play = dataset.play(*key);
        let return_direction = dataset
            .pff
            .iter()
            .find(|p| p.key() == *key)
            .and_then(|p| p.return_direction_actual.clone());
        summaries.insert(
            *key,
            PlaySummary {
                play: *key,
                punt_frame,
                catch_frame,
                returner_id: play.and_then(|p| p.single_returner()),
                kick_length: play.and_then(|p| p.kick_length),
                kick_return_yardage: play.and_then(|p| p.kick_return_yardage),
                return_direction,
                description: play.map(|p| p.description.clone()).unwrap_or_default(),
            },
        );
    }
    summaries.into_values().collect()
}
