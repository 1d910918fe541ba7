use chrono::prelude::*;

/// Elapsed-time counter for one game.
///
/// Starts with the first reveal or hint request and freezes when the game ends.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GameClock {
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
}

impl GameClock {
    pub fn start(&mut self) {
        if self.started_at.is_none() {
            let now = Utc::now();
            log::debug!("started at {}", now);
            self.started_at.replace(now);
        }
    }

    pub fn stop(&mut self) {
        if self.is_running() {
            let now = Utc::now();
            log::debug!("ended at {}", now);
            self.ended_at.replace(now);
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some() && self.ended_at.is_none()
    }

    /// How many seconds have passed since the game started, 0 if it hasn't started
    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs_at(Utc::now())
    }

    fn elapsed_secs_at(&self, now: DateTime<Utc>) -> u32 {
        if let Some(started_at) = self.started_at {
            (self.ended_at.unwrap_or(now) - started_at)
                .num_seconds()
                .max(0) as u32
        } else {
            0
        }
    }
}
