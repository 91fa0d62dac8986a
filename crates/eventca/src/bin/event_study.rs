//! Event-study CLI.
//!
//! Aligns events to a return series, fits components over the event windows,
//! and prints a summary.
//!
//! Usage: `cargo run --features cli --bin event-study -- --events E.csv --returns R.csv`

use std::{
    fs::File,
    path::{Path, PathBuf},
    process,
};

use clap::{Parser, ValueEnum};
use eventca::{
    components::{ComponentArtifact, ComponentConfig, add_components},
    primitives::{ComponentMethod, DATE_COLUMN, LOG_RETURN_COLUMN, ScoredEvents},
    traits::Diagnostics,
    utils::{events_from_frame, events_to_frame, loading_profile, returns_from_frame},
    window::{WindowConfig, construct_event_windows},
};
use polars::prelude::*;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Method {
    /// Principal components
    Pca,
    /// Independent components (FastICA)
    Ica,
}

impl From<Method> for ComponentMethod {
    fn from(method: Method) -> Self {
        match method {
            Method::Pca => Self::Orthogonal,
            Method::Ica => Self::IndependentSource,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "event-study")]
#[command(about = "Principal and independent components of event-window abnormal returns")]
#[command(version)]
struct Cli {
    /// CSV of events, one row per event date
    #[arg(long)]
    events: PathBuf,

    /// CSV of daily log returns
    #[arg(long)]
    returns: PathBuf,

    /// Date column in both files
    #[arg(long, default_value = DATE_COLUMN)]
    date_col: String,

    /// Return column in the returns file
    #[arg(long, default_value = LOG_RETURN_COLUMN)]
    return_col: String,

    /// First relative day of the window
    #[arg(long, default_value_t = -45, allow_negative_numbers = true)]
    start_window: i64,

    /// Last relative day of the window
    #[arg(long, default_value_t = 45, allow_negative_numbers = true)]
    return_window: i64,

    /// Events needed before the expanding-mean baseline is defined
    #[arg(long, default_value_t = 8, conflicts_with = "no_demean")]
    min_periods: usize,

    /// Keep raw cumulative returns instead of abnormal returns
    #[arg(long)]
    no_demean: bool,

    /// Decomposition to fit
    #[arg(long, value_enum, default_value = "pca")]
    method: Method,

    /// Number of components
    #[arg(long, default_value_t = 3)]
    components: usize,

    /// FastICA seed
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Write the scored event table here
    #[arg(long)]
    output: Option<PathBuf>,

    /// Write the loading profile here
    #[arg(long)]
    loadings: Option<PathBuf>,
}

fn main() {
    let subscriber =
        FmtSubscriber::builder().with_env_filter(EnvFilter::from_default_env()).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Error: {e}");
        process::exit(1);
    }

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn read_csv(path: &Path) -> PolarsResult<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_try_parse_dates(true))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()
}

fn write_csv(path: &Path, df: &mut DataFrame) -> Result<(), Box<dyn std::error::Error>> {
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file).include_header(true).finish(df)?;
    info!(path = %path.display(), rows = df.height(), "wrote csv");
    Ok(())
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let events = events_from_frame(&read_csv(&cli.events)?, &cli.date_col)?;
    let returns = returns_from_frame(&read_csv(&cli.returns)?, &cli.date_col, &cli.return_col)?;
    println!("Loaded {} events and {} trading days", events.len(), returns.len());

    let min_periods = (!cli.no_demean).then_some(cli.min_periods);
    let window = WindowConfig::new(cli.start_window, cli.return_window, min_periods);
    let (aligned, labels) = construct_event_windows(&events, &returns, &window)?;
    println!(
        "Window [{}, {}]: {} of {} events kept",
        cli.start_window,
        cli.return_window,
        aligned.len(),
        events.len()
    );

    let config = ComponentConfig {
        seed: cli.seed,
        ..ComponentConfig::new(cli.method.into(), cli.components)
    };
    let (scored, artifact) = add_components(&aligned, &labels, &config)?;
    print_summary(&scored, &artifact);

    if let Some(path) = &cli.output {
        write_csv(path, &mut events_to_frame(&scored)?)?;
    }
    if let Some(path) = &cli.loadings {
        write_csv(path, &mut loading_profile(&artifact, &labels)?)?;
    }
    Ok(())
}

fn print_summary(scored: &ScoredEvents, artifact: &ComponentArtifact) {
    println!("\n{} components ({})", artifact.names().len(), artifact.method());
    if scored.is_empty() {
        println!("  no events survived alignment");
        return;
    }

    match artifact.diagnostics() {
        Diagnostics::Orthogonal { explained_variance_ratio, singular_values, .. } => {
            println!("  {:<6} {:>10} {:>12}", "", "var ratio", "singular");
            for ((name, ratio), sv) in
                artifact.names().iter().zip(explained_variance_ratio).zip(singular_values)
            {
                println!("  {:<6} {:>9.2}% {:>12.4}", name.to_string(), ratio * 100.0, sv);
            }
            println!("  total  {:>9.2}%", explained_variance_ratio.sum() * 100.0);
        }
        Diagnostics::IndependentSource { iterations, .. } => {
            println!("  converged after {iterations} iterations");
        }
    }

    let first = artifact.offsets().first().map(|l| l.offset()).unwrap_or_default();
    let last = artifact.offsets().last().map(|l| l.offset()).unwrap_or_default();
    for (name, row) in artifact.names().iter().zip(artifact.loadings().rows()) {
        println!(
            "  {:<6} loading at {first:+}: {:>8.4}, at {last:+}: {:>8.4}",
            name.to_string(),
            row.first().copied().unwrap_or(f64::NAN),
            row.last().copied().unwrap_or(f64::NAN),
        );
    }
}
