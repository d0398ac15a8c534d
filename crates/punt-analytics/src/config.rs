// Configuration loading and parsing (analysis.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub data_paths: DataPaths,
    pub features: FeatureSettings,
    pub animation: AnimationSettings,
}

// ---------------------------------------------------------------------------
// analysis.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire analysis.toml file.
#[derive(Debug, Clone, Deserialize)]
struct AnalysisFile {
    data: DataPaths,
    #[serde(default)]
    features: FeatureSettings,
    #[serde(default)]
    animation: AnimationSettings,
}

/// Locations of the Big Data Bowl CSV files. File names are relative to
/// `base_path`.
#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    pub base_path: String,
    #[serde(default = "default_games")]
    pub games: String,
    #[serde(default = "default_plays")]
    pub plays: String,
    #[serde(default = "default_players")]
    pub players: String,
    #[serde(default = "default_pff_scouting")]
    pub pff_scouting: String,
    pub tracking: Vec<String>,
}

impl DataPaths {
    /// Join a file name onto `base_path`.
    pub fn resolve(&self, file_name: &str) -> PathBuf {
        Path::new(&self.base_path).join(file_name)
    }

    /// Anchor a relative `base_path` at `root`. Absolute paths are kept.
    pub fn rebase(&mut self, root: &Path) {
        self.base_path = root.join(&self.base_path).to_string_lossy().into_owned();
    }
}

fn default_games() -> String {
    "games.csv".into()
}

fn default_plays() -> String {
    "plays.csv".into()
}

fn default_players() -> String {
    "players.csv".into()
}

fn default_pff_scouting() -> String {
    "PFFScoutingData.csv".into()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeatureSettings {
    /// Number of closest defenders pivoted into each feature row.
    pub n_defenders: usize,
    /// Tracking sample rate; converts frame counts into seconds.
    pub frame_rate_hz: f64,
    /// Speed floor (yd/s) used as the divisor in time-to-close.
    pub min_speed: f64,
    /// Mirror left-moving plays so every play runs toward increasing x.
    pub standardize_direction: bool,
    pub output: String,
}

impl Default for FeatureSettings {
    fn default() -> Self {
        FeatureSettings {
            n_defenders: 4,
            frame_rate_hz: 10.0,
            min_speed: 0.01,
            standardize_direction: true,
            output: "output/features.csv".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnimationSettings {
    pub interval_ms: u64,
    pub loop_playback: bool,
    pub show_names: bool,
    pub show_tracks: bool,
    /// Vertical offset (yards) of the jersey number and name labels.
    pub number_offset: f64,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        AnimationSettings {
            interval_ms: 100,
            loop_playback: true,
            show_names: true,
            show_tracks: true,
            number_offset: 1.9,
        }
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/analysis.toml` relative to
/// the given `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy defaults.
/// Prefer `load_config()` which handles default initialization automatically.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let analysis_path = base_dir.join("config").join("analysis.toml");
    let text = read_file(&analysis_path)?;
    let config = parse_config(&text).map_err(|e| ConfigError::ParseError {
        path: analysis_path.clone(),
        source: e,
    })?;

    validate(&config)?;

    Ok(config)
}

/// Parse analysis.toml contents without validation.
fn parse_config(text: &str) -> Result<Config, toml::de::Error> {
    let file: AnalysisFile = toml::from_str(text)?;
    Ok(Config {
        data_paths: file.data,
        features: file.features,
        animation: file.animation,
    })
}

/// Copy every `defaults/*.toml` into `config/` unless a file of that name is
/// already there. Returns the newly created files.
///
/// A project without `defaults/` is fine as long as `config/` exists.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");
    let copy_err = |message: String| ConfigError::DefaultsCopyError { message };

    if !defaults_dir.is_dir() {
        return if config_dir.is_dir() {
            Ok(Vec::new())
        } else {
            Err(copy_err(format!(
                "no defaults/ or config/ directory under {}",
                base_dir.display()
            )))
        };
    }

    std::fs::create_dir_all(&config_dir)
        .map_err(|e| copy_err(format!("cannot create {}: {e}", config_dir.display())))?;

    let mut shipped: Vec<PathBuf> = std::fs::read_dir(&defaults_dir)
        .map_err(|e| copy_err(format!("cannot list {}: {e}", defaults_dir.display())))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    shipped.sort();

    let mut copied = Vec::new();
    for source in shipped {
        let Some(file_name) = source.file_name() else {
            continue;
        };
        let target = config_dir.join(file_name);
        if copy_if_missing(&source, &target)? {
            info!("Initialized {} from {}", target.display(), source.display());
            copied.push(target);
        }
    }
    Ok(copied)
}

/// Returns `false` when `target` already exists; an existing file is never
/// opened for writing.
fn copy_if_missing(source: &Path, target: &Path) -> Result<bool, ConfigError> {
    let copy_err = |message: String| ConfigError::DefaultsCopyError { message };
    let mut dest = match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(target)
    {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => return Ok(false),
        Err(e) => return Err(copy_err(format!("cannot create {}: {e}", target.display()))),
    };
    let mut src = std::fs::File::open(source)
        .map_err(|e| copy_err(format!("cannot read {}: {e}", source.display())))?;
    std::io::copy(&mut src, &mut dest)
        .map_err(|e| copy_err(format!("cannot write {}: {e}", target.display())))?;
    Ok(true)
}

/// Load config relative to `base_dir`, copying defaults first.
pub fn load_config(base_dir: &Path) -> Result<Config, ConfigError> {
    ensure_config_files(base_dir)?;
    load_config_from(base_dir)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.data_paths.tracking.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "data.tracking".into(),
            message: "at least one tracking file is required".into(),
        });
    }

    let features = &config.features;
    if features.n_defenders == 0 {
        return Err(ConfigError::ValidationError {
            field: "features.n_defenders".into(),
            message: "must be > 0".into(),
        });
    }

    let positive_fields: &[(&str, f64)] = &[
        ("features.frame_rate_hz", features.frame_rate_hz),
        ("features.min_speed", features.min_speed),
    ];
    for (name, val) in positive_fields {
        if *val <= 0.0 || !val.is_finite() {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: format!("must be a finite value > 0, got {val}"),
            });
        }
    }

    if config.animation.interval_ms == 0 {
        return Err(ConfigError::ValidationError {
            field: "animation.interval_ms".into(),
            message: "must be > 0".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
