//! Per-view request generations.
//!
//! Every load is tagged with a monotonically increasing generation for
//! its view; a response whose generation is no longer current is
//! discarded instead of overwriting fresher data. This replaces the
//! last-arrival-wins race a naive fire-and-forget loader would have.

use std::sync::atomic::{AtomicU64, Ordering};

/// The independently raced views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Devices,
    Points,
    Rules,
    Monitor,
    Alarms,
}

impl View {
    const COUNT: usize = 5;

    fn index(self) -> usize {
        match self {
            Self::Devices => 0,
            Self::Points => 1,
            Self::Rules => 2,
            Self::Monitor => 3,
            Self::Alarms => 4,
        }
    }
}

/// One atomic generation counter per view.
#[derive(Debug, Default)]
pub struct RequestTracker {
    counters: [AtomicU64; View::COUNT],
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request for `view`, superseding any in-flight one.
    /// Returns the generation to tag the response with.
    pub fn begin(&self, view: View) -> u64 {
        self.counters[view.index()].fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Whether a response tagged `generation` is still the latest for `view`.
    pub fn is_current(&self, view: View, generation: u64) -> bool {
        self.counters[view.index()].load(Ordering::Relaxed) == generation
    }
}

#[cfg(test)]
mod tests {
    use super::{RequestTracker, View};

    #[test]
    fn newer_request_supersedes_older() {
        let tracker = RequestTracker::new();
        let first = tracker.begin(View::Points);
        assert!(tracker.is_current(View::Points, first));

        let second = tracker.begin(View::Points);
        assert!(!tracker.is_current(View::Points, first));
        assert!(tracker.is_current(View::Points, second));
    }

    #[test]
    fn views_are_independent() {
        let tracker = RequestTracker::new();
        let points = tracker.begin(View::Points);
        let devices = tracker.begin(View::Devices);
        tracker.begin(View::Points);

        assert!(!tracker.is_current(View::Points, points));
        assert!(tracker.is_current(View::Devices, devices));
    }
}
