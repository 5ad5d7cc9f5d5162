//! daymerge — merge camera recordings into one video per day.
//!
//! Usage:
//!   daymerge /volume/xiaomi_camera --outdir /volume/merged
//!   daymerge /volume/xiaomi_camera --dry-run --json
//!   daymerge /volume/xiaomi_camera --config daymerge.toml --keep-sources

use std::path::PathBuf;

use anyhow::Context;
use chrono::Local;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use daymerge::config::MergeConfig;
use daymerge::day::DayKey;
use daymerge::engine::FfmpegEngine;
use daymerge::merger::DayMerger;
use daymerge::report::MergeReport;
use daymerge::walker;

#[derive(Parser)]
#[command(name = "daymerge", about = "Merge camera recordings into one video per day", version)]
struct Cli {
    /// Camera recordings root; each child directory is one camera.
    indir: PathBuf,
    /// Where merged videos are written. Created if missing.
    #[arg(long, default_value = "./")]
    outdir: PathBuf,
    /// Optional TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Log what would be merged without changing anything.
    #[arg(long)]
    dry_run: bool,
    /// Keep source directories after a successful merge.
    #[arg(long)]
    keep_sources: bool,
    /// Print the run report as JSON on stdout.
    #[arg(long)]
    json: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let json = cli.json;

    let report = match run(cli) {
        Ok(r) => r,
        Err(e) => {
            error!(error = ?e, "Run aborted");
            std::process::exit(1);
        }
    };

    if json {
        match serde_json::to_string_pretty(&report) {
            Ok(s) => println!("{s}"),
            Err(e) => error!(error = %e, "Cannot serialize report"),
        }
    }

    if !report.is_clean() {
        std::process::exit(2);
    }
}

fn run(cli: Cli) -> anyhow::Result<MergeReport> {
    let mut cfg = match &cli.config {
        Some(path) => MergeConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => MergeConfig::default(),
    };
    if cli.keep_sources {
        cfg.scan.keep_sources = true;
    }

    let today = DayKey::today();
    info!(
        now = %Local::now(),
        source = ?cli.indir,
        target = ?cli.outdir,
        today = %today,
        dry_run = cli.dry_run,
        "Starting day merge"
    );

    if !cli.dry_run {
        std::fs::create_dir_all(&cli.outdir)
            .with_context(|| format!("creating output directory {}", cli.outdir.display()))?;
    }

    let merger = DayMerger::new(FfmpegEngine::new(cfg.ffmpeg), cfg.scan, today).dry_run(cli.dry_run);
    let report = walker::merge_cameras(&merger, &cli.indir, &cli.outdir)
        .with_context(|| format!("merging recordings under {}", cli.indir.display()))?;
    Ok(report)
}
