use std::time::{Duration, Instant};
use log::warn;

use crate::config::flood_guard::MAX_REQUESTS_PER_SECOND;

/// Per-connection request counter over one-second windows.
pub struct FloodGuard {
    // Start of the current window
    window_start: Instant,
    // Requests received in the current window
    requests_this_window: u32,
    limit: u32,
}

impl FloodGuard {
    pub fn new() -> Self {
        Self::with_limit(MAX_REQUESTS_PER_SECOND)
    }

    pub fn with_limit(limit: u32) -> Self {
        Self {
            window_start: Instant::now(),
            requests_this_window: 0,
            limit,
        }
    }

    /// Call for every incoming event.
    /// Returns true if the connection exceeded its budget for this second.
    pub fn record_request(&mut self, client: &str) -> bool {
        self.record_request_at(Instant::now(), client)
    }

    fn record_request_at(&mut self, now: Instant, client: &str) -> bool {
        if now.duration_since(self.window_start) >= Duration::from_secs(1) {
            self.window_start = now;
            self.requests_this_window = 0;
        }
        self.requests_this_window += 1;
        if self.requests_this_window > self.limit {
            warn!("[FloodGuard] client={} exceeded {} requests per second", client, self.limit);
            return true;
        }
        false
    }
}

impl Default for FloodGuard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trips_after_limit_within_one_second() {
        let mut guard = FloodGuard::with_limit(3);
        let now = Instant::now();
        assert!(!guard.record_request_at(now, "c"));
        assert!(!guard.record_request_at(now, "c"));
        assert!(!guard.record_request_at(now, "c"));
        assert!(guard.record_request_at(now, "c"));
    }

    #[test]
    fn window_resets_after_a_second() {
        let mut guard = FloodGuard::with_limit(1);
        let start = Instant::now();
        assert!(!guard.record_request_at(start, "c"));
        assert!(guard.record_request_at(start + Duration::from_millis(500), "c"));
        assert!(!guard.record_request_at(start + Duration::from_millis(1600), "c"));
    }
}
