//! Fixed-window login throttle
//!
//! In-process counter keyed by client identifier (`login:<ip>`). Single
//! instance only: a horizontally scaled deployment must replace this with
//! an external atomic counter store, since instances share no memory.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Attempts allowed per identifier per window
const ATTEMPT_LIMIT: u32 = 5;

/// Fixed window length: 15 minutes
const WINDOW: Duration = Duration::from_secs(15 * 60);

/// How often the background sweeper removes elapsed entries
const SWEEP_INTERVAL: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone)]
struct ThrottleEntry {
    count: u32,
    reset_at: Instant,
}

/// Fixed-window counter for login attempts.
///
/// Cloning shares the underlying map, so all clones observe the same
/// counters. Increments happen under the mutex with no suspension point,
/// so counts are never lost between check and update.
#[derive(Clone)]
pub struct LoginThrottle {
    entries: Arc<Mutex<HashMap<String, ThrottleEntry>>>,
    limit: u32,
    window: Duration,
}

impl Default for LoginThrottle {
    fn default() -> Self {
        Self::new()
    }
}

impl LoginThrottle {
    pub fn new() -> Self {
        Self::with_limits(ATTEMPT_LIMIT, WINDOW)
    }

    /// Custom limit/window, used by tests
    pub fn with_limits(limit: u32, window: Duration) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            limit,
            window,
        }
    }

    /// Record an attempt for `identifier`.
    ///
    /// Returns `true` if the attempt is admitted. A denied attempt does
    /// not mutate the counter further.
    pub fn check_and_consume(&self, identifier: &str) -> bool {
        self.check_and_consume_at(identifier, Instant::now())
    }

    /// Attempts left within the active window, or the full limit if none
    pub fn remaining_attempts(&self, identifier: &str) -> u32 {
        self.remaining_attempts_at(identifier, Instant::now())
    }

    /// Seconds until the active window ends, or 0 if none
    pub fn seconds_until_reset(&self, identifier: &str) -> u64 {
        self.seconds_until_reset_at(identifier, Instant::now())
    }

    /// Remove every entry whose window has elapsed; returns how many
    pub fn sweep(&self) -> usize {
        self.sweep_at(Instant::now())
    }

    /// Spawn the periodic sweeper task (every 5 minutes)
    pub fn spawn_sweeper(&self) -> tokio::task::JoinHandle<()> {
        let throttle = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(SWEEP_INTERVAL);
            interval.tick().await; // first tick fires immediately
            loop {
                interval.tick().await;
                let removed = throttle.sweep();
                if removed > 0 {
                    tracing::debug!(removed, "Swept elapsed throttle entries");
                }
            }
        })
    }

    fn check_and_consume_at(&self, identifier: &str, now: Instant) -> bool {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        match entries.get_mut(identifier) {
            // Elapsed windows are replaced, never incremented.
            Some(entry) if now < entry.reset_at => {
                if entry.count >= self.limit {
                    tracing::warn!(identifier, "Login throttle limit reached");
                    return false;
                }
                entry.count += 1;
                true
            }
            _ => {
                entries.insert(
                    identifier.to_string(),
                    ThrottleEntry {
                        count: 1,
                        reset_at: now + self.window,
                    },
                );
                true
            }
        }
    }

    fn remaining_attempts_at(&self, identifier: &str, now: Instant) -> u32 {
        let entries = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        match entries.get(identifier) {
            Some(entry) if now < entry.reset_at => self.limit.saturating_sub(entry.count),
            _ => self.limit,
        }
    }

    fn seconds_until_reset_at(&self, identifier: &str, now: Instant) -> u64 {
        let entries = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        match entries.get(identifier) {
            Some(entry) if now < entry.reset_at => {
                let remaining = entry.reset_at - now;
                // Round up so a caller never retries a second too early.
                let secs = remaining.as_secs();
                if remaining.subsec_nanos() > 0 {
                    secs + 1
                } else {
                    secs
                }
            }
            _ => 0,
        }
    }

    fn sweep_at(&self, now: Instant) -> usize {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let before = entries.len();
        entries.retain(|_, entry| now < entry.reset_at);
        before - entries.len()
    }
}
