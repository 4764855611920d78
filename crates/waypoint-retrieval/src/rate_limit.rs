// SPDX-FileCopyrightText: 2026 Waypoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sliding-window call limiter.

use std::collections::VecDeque;
use std::time::Duration;

use tokio::time::Instant;

/// Remembers the instants of recent calls and admits at most `max_calls`
/// within any trailing `period`.
#[derive(Debug)]
pub struct RateWindow {
    max_calls: usize,
    period: Duration,
    calls: VecDeque<Instant>,
}

impl RateWindow {
    pub fn new(max_calls: usize, period: Duration) -> Self {
        Self {
            max_calls: max_calls.max(1),
            period,
            calls: VecDeque::with_capacity(max_calls),
        }
    }

    /// Record a call at `now` if the window has room.
    ///
    /// On refusal returns how long until the oldest call leaves the window.
    pub fn try_acquire(&mut self, now: Instant) -> Result<(), Duration> {
        self.prune(now);
        if self.calls.len() < self.max_calls {
            self.calls.push_back(now);
            return Ok(());
        }
        let wait = self
            .calls
            .front()
            .map(|oldest| (*oldest + self.period).saturating_duration_since(now))
            .unwrap_or_default();
        Err(wait)
    }

    /// Calls still allowed in the window ending at `now`.
    pub fn remaining(&mut self, now: Instant) -> usize {
        self.prune(now);
        self.max_calls - self.calls.len()
    }

    pub fn max_calls(&self) -> usize {
        self.max_calls
    }

    fn prune(&mut self, now: Instant) {
        while let Some(oldest) = self.calls.front() {
            if now.saturating_duration_since(*oldest) >= self.period {
                self.calls.pop_front();
            } else {
                break;
            }
        }
    }
}
