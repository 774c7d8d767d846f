use std::cell::Cell;
use std::time::{Duration, Instant};

/// Spaces calls at least `interval` apart by sleeping the caller.
/// Not `Sync`; one limiter per resolver.
#[derive(Debug)]
pub struct RateLimiter {
    interval: Duration,
    last: Cell<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: Cell::new(None),
        }
    }

    /// Block until the window since the previous call has elapsed, then mark now.
    pub fn wait(&self) {
        if let Some(last) = self.last.get() {
            let elapsed = last.elapsed();
            if elapsed < self.interval {
                std::thread::sleep(self.interval - elapsed);
            }
        }
        self.last.set(Some(Instant::now()));
    }
}
