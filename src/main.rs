//! geodiff: change detection between two snapshots of a vector dataset

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use geodiff::{
    cli,
    config::{AppConfig, ConfigOverrides, ConfigPreset, DiffConfig, DiffPaths},
    diff::FallbackPolicy,
    geometry::DifferenceMeasure,
    pipeline::exit_codes,
};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "geodiff")]
#[command(version)]
#[command(about = "Classify the records of two dataset snapshots as unchanged, updated, deleted or inserted", long_about = None)]
#[command(after_help = "OUTPUT FILES:
    deleteds    before seqnos of deleted records, one per line
    updates     before_seqno,after_seqno of updated records, one per line
    inserteds   after seqnos of inserted records, one per line
    Each file is written only when it has entries.

EXIT CODES:
    0  Success
    3  Error occurred

EXAMPLES:
    geodiff roads-2023.json roads-2024.json out/
    geodiff -s -f --measure area parcels-old.json parcels-new.json out/")]
#[allow(clippy::struct_excessive_bools)]
struct Cli {
    /// Before-set dataset file
    before: PathBuf,

    /// After-set dataset file
    after: PathBuf,

    /// Directory receiving the result files
    output_dir: PathBuf,

    /// Also write deleted, updated and inserted features as dataset files
    #[arg(short = 's', long)]
    write_features: bool,

    /// Overwrite a non-empty output directory
    #[arg(short, long)]
    force: bool,

    /// Print a summary and enable debug logging
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long)]
    quiet: bool,

    /// Config file (default: discover .geodiff.yaml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Matching preset (lines, polygons); explicit flags take precedence
    #[arg(long)]
    preset: Option<String>,

    /// Difference measure used to score candidates
    #[arg(long, value_enum)]
    measure: Option<DifferenceMeasure>,

    /// Search radius around each after record's center
    #[arg(long)]
    epsilon: Option<f64>,

    /// Maximum difference score for a match
    #[arg(long)]
    threshold: Option<f64>,

    /// Tie-breaking policy for ambiguous matches
    #[arg(long, value_enum)]
    fallback: Option<FallbackPolicy>,

    /// Search candidates on a single thread
    #[arg(long)]
    no_parallel: bool,

    /// Write the before-set index partitions as JSON
    #[arg(long, value_name = "PATH")]
    dump_index: Option<PathBuf>,
}

impl Cli {
    /// Settings given on the command line, for layering over the config file.
    fn overrides(&self) -> Result<ConfigOverrides> {
        let preset = match self.preset.as_deref() {
            Some(name) => Some(ConfigPreset::from_name(name).with_context(|| {
                let known: Vec<&str> = ConfigPreset::all().iter().map(ConfigPreset::name).collect();
                format!("Unknown preset '{name}' (expected one of: {})", known.join(", "))
            })?),
            None => None,
        };
        let measure = self.measure.or(preset.map(ConfigPreset::measure));
        let threshold = self
            .threshold
            .or(preset.map(|p| p.measure().default_threshold()));

        Ok(ConfigOverrides {
            measure,
            epsilon: self.epsilon,
            threshold,
            fallback: self.fallback,
            no_parallel: self.no_parallel,
            write_features: self.write_features,
            force: self.force,
            dump_index: self.dump_index.clone(),
            verbose: self.verbose,
            quiet: self.quiet,
        })
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let log_level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn run(cli: Cli) -> Result<i32> {
    let (app_config, loaded_from) =
        AppConfig::from_file_with_overrides(cli.config.as_deref(), &cli.overrides()?)
            .context("Failed to load configuration")?;
    if let Some(path) = loaded_from {
        tracing::debug!("Using config file {}", path.display());
    }

    let config = DiffConfig::new(
        DiffPaths {
            before: cli.before,
            after: cli.after,
            output_dir: cli.output_dir,
        },
        app_config,
    );
    cli::run_diff(config)
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if !e.use_stderr() => {
            let _ = e.print();
            std::process::exit(exit_codes::SUCCESS);
        }
        Err(e) => {
            let _ = e.print();
            std::process::exit(exit_codes::ERROR);
        }
    };

    init_logging(cli.verbose, cli.quiet);

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("error: {e:#}");
            eprintln!();
            eprintln!("{}", Cli::command().render_usage());
            std::process::exit(exit_codes::ERROR);
        }
    }
}
