//! Color-presence detection running next to the game loop.
//!
//! A [`ColorDetector`] is sampled on its own thread at a fixed interval. Results travel back over
//! a channel and are only ever applied by whoever drains the [`DetectorWorker`], which keeps all
//! game state on the caller's thread.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use thiserror::Error;

/// Interval between two samples, about 30 per second.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(33);

#[derive(Error, Debug)]
pub enum DetectorError {
    #[error("Color detector unavailable: {0}")]
    Unavailable(String),
    #[error("Color detector failed")]
    Io(#[from] io::Error),
}

/// Reports whether the target color is currently visible.
pub trait ColorDetector: Send {
    fn sample(&mut self) -> Result<bool, DetectorError>;

    /// Frees the capture resource, called once from the worker thread when it stops.
    fn release(&mut self) {}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DetectorEvent {
    ColorPresence(bool),
    Failed(String),
}

/// Terminal stand-in for a camera: the color is "shown" while `path` exists.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignalFileDetector {
    path: PathBuf,
}

impl SignalFileDetector {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ColorDetector for SignalFileDetector {
    fn sample(&mut self) -> Result<bool, DetectorError> {
        Ok(self.path.try_exists()?)
    }
}

/// Owns the detector thread; stopping (or dropping) it joins the thread.
#[derive(Debug)]
pub struct DetectorWorker {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
    events: Receiver<DetectorEvent>,
}

impl DetectorWorker {
    pub fn spawn(detector: Box<dyn ColorDetector>, interval: Duration) -> io::Result<Self> {
        let (sender, events) = mpsc::channel();
        let running = Arc::new(AtomicBool::new(true));

        let handle = thread::Builder::new()
            .name("color-detector".to_string())
            .spawn({
                let running = Arc::clone(&running);
                move || run_detector(detector, interval, &running, &sender)
            })?;
        log::debug!("Color detector started, interval: {:?}", interval);

        Ok(Self {
            running,
            handle: Some(handle),
            events,
        })
    }

    /// Collects every result delivered so far; always empty once stopped.
    pub fn drain(&self) -> Vec<DetectorEvent> {
        if self.handle.is_none() {
            return Vec::new();
        }
        self.events.try_iter().collect()
    }

    /// Stops sampling and waits for the thread; no-op if already stopped.
    pub fn stop(&mut self) {
        let Some(handle) = self.handle.take() else {
            log::trace!("Color detector is not running");
            return;
        };

        self.running.store(false, Ordering::Release);
        handle.thread().unpark();
        if handle.join().is_err() {
            log::warn!("Color detector thread panicked");
        }

        let discarded = self.events.try_iter().count();
        log::debug!("Color detector stopped, {} pending results discarded", discarded);
    }
}

impl Drop for DetectorWorker {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_detector(
    mut detector: Box<dyn ColorDetector>,
    interval: Duration,
    running: &AtomicBool,
    sender: &Sender<DetectorEvent>,
) {
    while running.load(Ordering::Acquire) {
        let event = match detector.sample() {
            Ok(present) => DetectorEvent::ColorPresence(present),
            Err(err) => {
                log::warn!("Color detector sample failed: {}", err);
                DetectorEvent::Failed(err.to_string())
            }
        };

        // stop may have been requested while sampling
        if !running.load(Ordering::Acquire) || sender.send(event).is_err() {
            break;
        }
        thread::park_timeout(interval);
    }
    detector.release();
}
