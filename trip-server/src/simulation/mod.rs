//! Delay simulation and monitoring.
//!
//! A pass takes the current candidate set, asks a [`DelaySource`] (or the
//! transport backend) for each option's next status, and turns state
//! transitions into alerts. [`DelayMonitor`] repeats passes on a timer.

mod config;
mod evaluate;
mod monitor;
mod source;

pub use config::{DelayConfig, DelayConfigError};
pub use evaluate::{
    PassOutcome, apply_transitions, cancellation_alert, delay_alert, evaluate_delays,
    initial_alerts,
};
pub use monitor::{DelayMonitor, MonitorContext, PassResult, run_pass};
pub use source::{DelaySource, RandomDelaySource, ScriptedDelaySource, SharedDelaySource, shared};
