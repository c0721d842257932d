//! Session timing and limits.

use std::time::Duration;

use crate::backend::DEFAULT_STOP_RADIUS_M;
use crate::debounce::DEFAULT_DEBOUNCE;
use crate::places::DEFAULT_SUGGESTION_LIMIT;
use crate::simulation::DelayConfig;

/// Configuration for a [`TripSession`](super::TripSession).
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Pause before search results are delivered.
    pub result_latency: Duration,

    /// Quiet period before a typed query is looked up.
    pub debounce: Duration,

    /// Maximum number of destination suggestions.
    pub suggestion_limit: usize,

    /// Radius for nearby-stop lookups (metres).
    pub stop_radius_m: u32,

    /// Delay monitor parameters.
    pub delays: DelayConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            result_latency: Duration::from_secs(1),
            debounce: DEFAULT_DEBOUNCE,
            suggestion_limit: DEFAULT_SUGGESTION_LIMIT,
            stop_radius_m: DEFAULT_STOP_RADIUS_M,
            delays: DelayConfig::default(),
        }
    }
}

impl SessionConfig {
    pub fn with_result_latency(mut self, latency: Duration) -> Self {
        self.result_latency = latency;
        self
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn with_suggestion_limit(mut self, limit: usize) -> Self {
        self.suggestion_limit = limit;
        self
    }

    pub fn with_stop_radius(mut self, radius_m: u32) -> Self {
        self.stop_radius_m = radius_m;
        self
    }

    pub fn with_delays(mut self, delays: DelayConfig) -> Self {
        self.delays = delays;
        self
    }
}
