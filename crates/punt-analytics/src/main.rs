// puntviz entry point.
//
// Startup sequence:
// 1. Parse the command line
// 2. Initialize tracing (log to file, not terminal)
// 3. Load config (copying defaults on first run)
// 4. Load the CSV dataset
// 5. Dispatch: feature table, play listing, or the play viewer

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tokio::sync::mpsc;
use tracing::{error, info};

use punt_analytics::animation::PlayAnimation;
use punt_analytics::app;
use punt_analytics::config::{self, Config};
use punt_analytics::data::{self, Dataset};
use punt_analytics::features::{self, OutputFormat};
use punt_analytics::tui;

/// Punt-return features and play animation from NFL tracking data.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Project root holding `config/`, `defaults/` and the data directory.
    #[arg(long, default_value = ".")]
    root: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the per-frame feature table for every modeling play.
    Features(FeaturesArgs),
    /// Animate one play in the terminal.
    Animate(AnimateArgs),
    /// List punt returns that pass the modeling filter.
    Plays(PlaysArgs),
}

#[derive(Parser)]
struct FeaturesArgs {
    /// Output path; defaults to `[features] output` in the config.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Number of closest defenders to keep per frame.
    #[arg(long)]
    n_defenders: Option<usize>,

    #[arg(long, value_enum, default_value_t = FormatArg::Csv)]
    format: FormatArg,
}

#[derive(Parser)]
struct AnimateArgs {
    #[arg(long)]
    game_id: u64,

    #[arg(long)]
    play_id: u32,
}

#[derive(Parser)]
struct PlaysArgs {
    /// Show at most this many plays.
    #[arg(long)]
    limit: Option<usize>,

    /// Print one JSON object per play instead of a table.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Csv,
    /// Newline-delimited JSON objects.
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Csv => OutputFormat::Csv,
            FormatArg::Json => OutputFormat::JsonLines,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Parse the command line
    let cli = Cli::parse();

    // 2. Initialize tracing
    init_tracing(&cli.root)?;
    info!("puntviz starting up (root {})", cli.root.display());

    // 3. Load config
    let mut config = config::load_config(&cli.root).context("failed to load configuration")?;
    config.data_paths.rebase(&cli.root);
    info!(
        "Config loaded: data in {}, {} tracking files",
        config.data_paths.base_path,
        config.data_paths.tracking.len()
    );

    // 4. Load data
    let dataset = data::load_all(&config).context("failed to load tracking data")?;
    info!(
        "Loaded {} games, {} plays, {} tracking rows",
        dataset.games.len(),
        dataset.plays.len(),
        dataset.tracking.len()
    );

    // 5. Dispatch
    match cli.command {
        Commands::Features(args) => run_features(&cli.root, &config, &dataset, args),
        Commands::Plays(args) => run_plays(&dataset, args),
        Commands::Animate(args) => run_animate(&config, &dataset, args).await,
    }
}

fn run_features(
    root: &Path,
    config: &Config,
    dataset: &Dataset,
    args: FeaturesArgs,
) -> anyhow::Result<()> {
    let mut settings = config.features.clone();
    if let Some(n) = args.n_defenders {
        anyhow::ensure!(n > 0, "--n-defenders must be at least 1");
        settings.n_defenders = n;
    }
    let output = args
        .output
        .unwrap_or_else(|| root.join(&settings.output));

    let table =
        features::build_feature_table(dataset, &settings).context("failed to build features")?;
    table
        .write_to(&output, args.format.into())
        .with_context(|| format!("failed to write {}", output.display()))?;

    info!("Wrote {} feature rows to {}", table.rows.len(), output.display());
    println!("{} rows -> {}", table.rows.len(), output.display());
    Ok(())
}

fn run_plays(dataset: &Dataset, args: PlaysArgs) -> anyhow::Result<()> {
    let summaries = features::summarize_modeling_plays(dataset);
    info!("{} plays pass the modeling filter", summaries.len());
    let limit = args.limit.unwrap_or(usize::MAX);

    if args.json {
        for summary in summaries.iter().take(limit) {
            println!(
                "{}",
                serde_json::to_string(summary).context("failed to serialize play summary")?
            );
        }
        return Ok(());
    }

    println!(
        "{:>12} {:>6} {:>6} {:>6} {:>9} {:>5} {:>4} {:>3}  description",
        "gameId", "playId", "punt", "catch", "returner", "kick", "ret", "dir"
    );
    for summary in summaries.iter().take(limit) {
        println!(
            "{:>12} {:>6} {:>6} {:>6} {:>9} {:>5} {:>4} {:>3}  {}",
            summary.play.game_id,
            summary.play.play_id,
            summary.punt_frame,
            summary.catch_frame,
            or_dashes(summary.returner_id),
            or_dashes(summary.kick_length),
            or_dashes(summary.kick_return_yardage),
            or_dashes(summary.return_direction.as_deref()),
            summary.description
        );
    }
    if summaries.len() > limit {
        println!("... {} more", summaries.len() - limit);
    }
    Ok(())
}

fn or_dashes<T: std::fmt::Display>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| "--".to_string())
}

async fn run_animate(config: &Config, dataset: &Dataset, args: AnimateArgs) -> anyhow::Result<()> {
    let animation = PlayAnimation::new(
        &dataset.tracking,
        &dataset.plays,
        &dataset.games,
        args.game_id,
        args.play_id,
        &config.animation,
    )
    .context("failed to prepare play animation")?;
    info!("Animating: {}", animation.title());

    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (ui_tx, ui_rx) = mpsc::channel(256);

    let state = app::AppState::new(animation, &config.animation);
    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(cmd_rx, ui_tx, state).await {
            error!("Playback loop error: {}", e);
        }
    });

    // Blocks until the user presses 'q' or Ctrl+C.
    if let Err(e) = tui::run(ui_rx, cmd_tx, &config.animation).await {
        error!("TUI error: {}", e);
    }

    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), async {
        let _ = app_handle.await;
    })
    .await;

    info!("puntviz shut down cleanly");
    Ok(())
}

/// Initialize tracing to log to a file (not the terminal, which is used by the TUI).
fn init_tracing(root: &Path) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = root.join("logs");
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create {}", log_dir.display()))?;

    let log_file = std::fs::File::create(log_dir.join("punt-analytics.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("punt_analytics=info,puntviz=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
