//! Where the next status of an option comes from.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::DelayConfig;
use crate::domain::{DelayMinutes, RouteId, RouteOption, RouteStatus};

/// Produces the status an option has on the next monitor pass.
pub trait DelaySource: Send {
    fn next_status(&mut self, option: &RouteOption, config: &DelayConfig) -> RouteStatus;
}

/// A delay source shared between the session and its monitor task.
pub type SharedDelaySource = Arc<Mutex<Box<dyn DelaySource>>>;

pub fn shared(source: impl DelaySource + 'static) -> SharedDelaySource {
    Arc::new(Mutex::new(Box::new(source)))
}

/// Random delays and cancellations.
///
/// Cancelled options stay cancelled. A delayed option may be cancelled with
/// `cancellation_probability`; otherwise every option is late with
/// `delay_probability`, by a uniform number of minutes in the configured range.
pub struct RandomDelaySource<R = StdRng> {
    rng: R,
}

impl RandomDelaySource<StdRng> {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Deterministic source for tests and reproducible demos.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomDelaySource<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> RandomDelaySource<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    fn chance(&mut self, p: f64) -> bool {
        (0.0..=1.0).contains(&p) && self.rng.random_bool(p)
    }

    fn draw_delay(&mut self, config: &DelayConfig) -> RouteStatus {
        let min = config.min_delay_mins.max(1);
        let max = config.max_delay_mins.max(min);
        DelayMinutes::new(self.rng.random_range(min..=max))
            .map(RouteStatus::Delayed)
            .unwrap_or(RouteStatus::OnTime)
    }
}

impl<R: Rng + Send> DelaySource for RandomDelaySource<R> {
    fn next_status(&mut self, option: &RouteOption, config: &DelayConfig) -> RouteStatus {
        match option.status {
            RouteStatus::Cancelled => RouteStatus::Cancelled,
            RouteStatus::Delayed(_) if self.chance(config.cancellation_probability) => {
                RouteStatus::Cancelled
            }
            _ if self.chance(config.delay_probability) => self.draw_delay(config),
            _ => RouteStatus::OnTime,
        }
    }
}

/// Plays back a fixed sequence of statuses per route.
///
/// Once a route's script runs out its status no longer changes.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDelaySource {
    scripts: HashMap<RouteId, VecDeque<RouteStatus>>,
}

impl ScriptedDelaySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(
        mut self,
        route_id: RouteId,
        statuses: impl IntoIterator<Item = RouteStatus>,
    ) -> Self {
        self.scripts
            .entry(route_id)
            .or_default()
            .extend(statuses);
        self
    }
}

impl DelaySource for ScriptedDelaySource {
    fn next_status(&mut self, option: &RouteOption, _config: &DelayConfig) -> RouteStatus {
        self.scripts
            .get_mut(&option.id)
            .and_then(VecDeque::pop_front)
            .unwrap_or(option.status)
    }
}
