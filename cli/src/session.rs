use std::io;
use std::time::Duration;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use wormsweeper_core::{Board, Coord2, GameConfig, GameError, GameOutcome, Level, MarkerState};

use crate::clock::GameClock;
use crate::detector::{ColorDetector, DetectorError, DetectorEvent, DetectorWorker};
use crate::hint::HintGate;

/// Opens the capture device each time a hint unlock begins.
pub type DetectorFactory = Box<dyn Fn() -> Result<Box<dyn ColorDetector>, DetectorError>>;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Game(#[from] GameError),
    #[error("The hint for this game was already used")]
    HintUsed,
    #[error("No hint unlock in progress")]
    NotUnlocking,
    #[error("Target color not seen yet")]
    ColorNotSeen,
    #[error(transparent)]
    Detector(#[from] DetectorError),
    #[error("Could not start the color detector thread")]
    Spawn(#[source] io::Error),
}

/// Everything one player interacts with, owned by the thread running the game loop.
pub struct GameSession {
    config: GameConfig,
    board: Board,
    clock: GameClock,
    hint: HintGate,
    detector: Option<DetectorWorker>,
    detector_factory: DetectorFactory,
    poll_interval: Duration,
    seeds: SmallRng,
}

impl GameSession {
    pub fn new(
        config: GameConfig,
        seed: u64,
        poll_interval: Duration,
        detector_factory: DetectorFactory,
    ) -> Result<Self, GameError> {
        let mut seeds = SmallRng::seed_from_u64(seed);
        let board = Board::new_game(config, seeds.random())?;
        log_new_game(config);

        Ok(Self {
            config,
            board,
            clock: GameClock::default(),
            hint: HintGate::default(),
            detector: None,
            detector_factory,
            poll_interval,
            seeds,
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn hint_gate(&self) -> HintGate {
        self.hint
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.clock.elapsed_secs()
    }

    /// Replaces the board with a fresh one; the current game is kept if `config` is invalid.
    pub fn reset(&mut self, config: GameConfig) -> Result<(), GameError> {
        // a rejected config must not consume a seed from the sequence
        let config = GameConfig::new(config.grid_size, config.hazards)?;
        let board = Board::new_game(config, self.seeds.random())?;

        self.stop_detector();
        self.board = board;
        self.config = config;
        self.clock.reset();
        self.hint = HintGate::default();
        log_new_game(config);
        Ok(())
    }

    pub fn restart(&mut self) -> Result<(), GameError> {
        self.reset(self.config)
    }

    pub fn reveal(&mut self, coords: Coord2) -> Result<GameOutcome, GameError> {
        let outcome = self.board.reveal(coords)?;
        self.clock.start();
        if outcome.is_finished() {
            self.finish();
        }
        Ok(outcome)
    }

    pub fn toggle_marker(&mut self, coords: Coord2) -> Result<MarkerState, GameError> {
        self.board.toggle_marker(coords)
    }

    /// Starts the detector; calling it again while unlocking is a no-op.
    pub fn begin_hint_unlock(&mut self) -> Result<(), SessionError> {
        if self.board.is_finished() {
            return Err(GameError::AlreadyEnded.into());
        }
        if self.hint.is_used() {
            return Err(SessionError::HintUsed);
        }
        if self.hint.is_unlocking() {
            log::debug!("Hint unlock already in progress");
            return Ok(());
        }

        self.clock.start();
        let detector = (self.detector_factory)()?;
        let worker =
            DetectorWorker::spawn(detector, self.poll_interval).map_err(SessionError::Spawn)?;
        self.detector = Some(worker);
        self.hint.begin();
        Ok(())
    }

    /// Applies pending detector results; returns whether the color was just seen.
    pub fn pump_detector(&mut self) -> bool {
        let Some(worker) = &self.detector else {
            return false;
        };

        let mut newly_seen = false;
        for event in worker.drain() {
            match event {
                DetectorEvent::ColorPresence(present) => newly_seen |= self.hint.observe(present),
                DetectorEvent::Failed(reason) => log::warn!("Detector error: {}", reason),
            }
        }
        if newly_seen {
            log::info!("Target color detected, hint can be applied");
        }
        newly_seen
    }

    /// Spends the hint; `None` when no hidden hazard was left to show.
    pub fn apply_hint(&mut self) -> Result<Option<Coord2>, SessionError> {
        self.pump_detector();
        match self.hint {
            HintGate::Unlocking { color_seen: true } => {}
            HintGate::Unlocking { color_seen: false } => return Err(SessionError::ColorNotSeen),
            HintGate::Used => return Err(SessionError::HintUsed),
            HintGate::Locked => return Err(SessionError::NotUnlocking),
        }

        self.stop_detector();
        self.hint.apply();
        Ok(self.board.reveal_hint())
    }

    pub fn cancel_hint(&mut self) {
        self.stop_detector();
        self.hint.cancel();
    }

    fn finish(&mut self) {
        self.clock.stop();
        self.stop_detector();
        self.hint.cancel();
    }

    fn stop_detector(&mut self) {
        if let Some(mut worker) = self.detector.take() {
            worker.stop();
        }
    }
}

fn log_new_game(config: GameConfig) {
    match Level::matching(config) {
        Some(level) => log::info!("New {} game", level),
        None => log::info!(
            "New custom game, {}x{} grid with {} hazards",
            config.grid_size,
            config.grid_size,
            config.hazards
        ),
    }
}
