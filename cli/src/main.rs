use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};
use wormsweeper_core::{CellCount, Coord, Level};

mod app;
mod clock;
mod command;
mod config;
mod detector;
mod hint;
mod session;
mod view;

use config::Settings;
use detector::{ColorDetector, DetectorError, SignalFileDetector};
use session::{DetectorFactory, GameSession};

#[derive(Parser, Debug)]
#[command(version, about = "Find every safe cell without digging up a worm", long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: Verbosity<WarnLevel>,

    /// TOML settings file, command line options take precedence
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Preset level: basic or advanced
    #[arg(short, long)]
    level: Option<Level>,

    /// Grid side length, overrides the level
    #[arg(long, value_name = "N")]
    size: Option<Coord>,

    /// Number of worms, overrides the level
    #[arg(long, value_name = "N")]
    hazards: Option<CellCount>,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// The target color counts as shown while this file exists
    #[arg(long, value_name = "FILE")]
    detector_file: Option<PathBuf>,

    /// Milliseconds between two detector samples
    #[arg(long, value_name = "MS")]
    poll_ms: Option<u64>,
}

impl Args {
    fn settings(&self) -> anyhow::Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };

        if let Some(level) = self.level {
            settings.game.level = level;
        }
        if self.size.is_some() {
            settings.game.grid_size = self.size;
        }
        if self.hazards.is_some() {
            settings.game.hazards = self.hazards;
        }
        if self.seed.is_some() {
            settings.game.seed = self.seed;
        }
        if self.detector_file.is_some() {
            settings.detector.signal_file = self.detector_file.clone();
        }
        if let Some(poll_ms) = self.poll_ms {
            settings.detector.poll_interval_ms = poll_ms;
        }
        Ok(settings)
    }
}

fn detector_factory(signal_file: Option<PathBuf>) -> DetectorFactory {
    match signal_file {
        Some(path) => Box::new(move || {
            log::debug!("Watching {} for the target color", path.display());
            Ok::<Box<dyn ColorDetector>, _>(Box::new(SignalFileDetector::new(path.clone())))
        }),
        None => Box::new(|| {
            let reason = "no detector configured, pass --detector-file".to_string();
            Err::<Box<dyn ColorDetector>, _>(DetectorError::Unavailable(reason))
        }),
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .parse_default_env()
        .init();

    let settings = args.settings().context("Could not load settings")?;
    let config = settings
        .game
        .game_config()
        .context("Invalid game settings")?;
    let seed = settings.game.seed.unwrap_or_else(rand::random);
    let poll_interval = settings.detector.poll_interval();
    log::debug!("seed: {}", seed);

    let mut session = GameSession::new(
        config,
        seed,
        poll_interval,
        detector_factory(settings.detector.signal_file),
    )?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    app::run(&mut session, stdin.lock(), stdout.lock())
}
