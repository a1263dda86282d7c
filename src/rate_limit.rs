use crate::error::{InkError, Result};
use std::sync::Mutex;
use std::time::{Duration, Instant};

const WINDOW: Duration = Duration::from_secs(60 * 60);

/// Best-effort fixed-window counter shared by every request in the process.
#[derive(Debug)]
pub struct RateLimiter {
    limit: u32,
    window: Duration,
    state: Mutex<Window>,
}

#[derive(Debug)]
struct Window {
    started: Instant,
    count: u32,
}

impl RateLimiter {
    pub fn per_hour(limit: u32) -> Self {
        Self::with_window(limit, WINDOW)
    }

    pub fn with_window(limit: u32, window: Duration) -> Self {
        Self {
            limit,
            window,
            state: Mutex::new(Window {
                started: Instant::now(),
                count: 0,
            }),
        }
    }

    /// Counts one request, or refuses it when the current window is full.
    pub fn acquire(&self) -> Result<()> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| InkError::Storage("rate limiter lock poisoned".to_string()))?;

        if state.started.elapsed() >= self.window {
            state.started = Instant::now();
            state.count = 0;
        }

        if state.count >= self.limit {
            log::warn!("Hourly request limit of {} reached", self.limit);
            return Err(InkError::RateLimited { limit: self.limit });
        }

        state.count += 1;
        Ok(())
    }

    pub fn remaining(&self) -> u32 {
        self.state
            .lock()
            .map(|state| {
                if state.started.elapsed() >= self.window {
                    self.limit
                } else {
                    self.limit.saturating_sub(state.count)
                }
            })
            .unwrap_or(0)
    }
}
