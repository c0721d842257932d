//! Delay simulation configuration.

use std::time::Duration;

/// Error returned by [`DelayConfig::validate`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DelayConfigError {
    #[error("{name} must be within [0, 1], got {value}")]
    Probability { name: &'static str, value: f64 },

    #[error("delay range {min}..={max} minutes is empty or starts at zero")]
    DelayRange { min: u32, max: u32 },

    #[error("check interval must be non-zero")]
    ZeroInterval,
}

/// Parameters of the delay monitor.
#[derive(Debug, Clone, PartialEq)]
pub struct DelayConfig {
    /// Chance per pass that an option is running late.
    pub delay_probability: f64,

    /// Chance per pass that an already-delayed option is cancelled.
    pub cancellation_probability: f64,

    /// Smallest simulated delay (minutes).
    pub min_delay_mins: u32,

    /// Largest simulated delay (minutes).
    pub max_delay_mins: u32,

    /// Delays longer than this raise a warning instead of a delay alert.
    pub warning_threshold_mins: u32,

    /// Time between monitor passes.
    pub check_interval: Duration,
}

impl DelayConfig {
    pub fn with_delay_probability(mut self, p: f64) -> Self {
        self.delay_probability = p;
        self
    }

    pub fn with_cancellation_probability(mut self, p: f64) -> Self {
        self.cancellation_probability = p;
        self
    }

    pub fn with_delay_range(mut self, min_mins: u32, max_mins: u32) -> Self {
        self.min_delay_mins = min_mins;
        self.max_delay_mins = max_mins;
        self
    }

    pub fn with_check_interval(mut self, interval: Duration) -> Self {
        self.check_interval = interval;
        self
    }

    /// Check that probabilities and ranges are usable.
    pub fn validate(&self) -> Result<(), DelayConfigError> {
        for (name, value) in [
            ("delay_probability", self.delay_probability),
            ("cancellation_probability", self.cancellation_probability),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(DelayConfigError::Probability { name, value });
            }
        }
        if self.min_delay_mins == 0 || self.min_delay_mins > self.max_delay_mins {
            return Err(DelayConfigError::DelayRange {
                min: self.min_delay_mins,
                max: self.max_delay_mins,
            });
        }
        if self.check_interval.is_zero() {
            return Err(DelayConfigError::ZeroInterval);
        }
        Ok(())
    }
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self {
            delay_probability: 0.1,
            cancellation_probability: 0.05,
            min_delay_mins: 5,
            max_delay_mins: 30,
            warning_threshold_mins: 15,
            check_interval: Duration::from_secs(120), // 2 minutes
        }
    }
}
