//! The periodic delay monitor.
//!
//! One monitor task runs per candidate set. It re-evaluates the set every
//! `check_interval` and exits on its own once the set is cleared or a newer
//! search replaces it.

use std::sync::PoisonError;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use super::{DelayConfig, PassOutcome, SharedDelaySource, apply_transitions, evaluate_delays};
use crate::backend::TransportBackendClient;
use crate::domain::RouteOption;
use crate::notify::NotificationQueue;
use crate::session::TripStore;

/// What a monitor pass needs.
#[derive(Clone)]
pub struct MonitorContext {
    pub store: TripStore,
    pub queue: NotificationQueue,
    pub source: SharedDelaySource,
    /// Asked for live statuses first when present.
    pub backend: Option<TransportBackendClient>,
    pub config: DelayConfig,
}

/// Result of [`run_pass`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassResult {
    /// New statuses were installed and this many alerts were raised.
    Applied { alerts: usize },
    /// The candidate set belongs to a newer search.
    Stale,
    /// There is nothing to monitor.
    Idle,
}

/// Evaluate the current candidate set once.
///
/// The whole pass is computed before the options are swapped and alerts are
/// pushed; a pass whose generation went stale in the meantime changes nothing.
pub async fn run_pass(ctx: &MonitorContext, generation: u64) -> PassResult {
    let state = ctx.store.snapshot();
    if state.generation != generation {
        return PassResult::Stale;
    }
    if state.active_options.is_empty() {
        return PassResult::Idle;
    }

    let outcome = match &ctx.backend {
        Some(backend) => match remote_pass(backend, &state.active_options, &ctx.config).await {
            Some(outcome) => outcome,
            None => simulate(ctx, &state.active_options),
        },
        None => simulate(ctx, &state.active_options),
    };

    let PassOutcome {
        options,
        alerts,
        recovered,
    } = outcome;

    if !ctx.store.replace_options(generation, options) {
        return PassResult::Stale;
    }

    for route_id in &recovered {
        let dismissed = ctx.queue.dismiss_route_alerts(route_id);
        debug!(%route_id, dismissed, "Route back on time");
    }

    let raised = alerts.len();
    for alert in alerts {
        ctx.queue.push(alert);
    }

    PassResult::Applied { alerts: raised }
}

async fn remote_pass(
    backend: &TransportBackendClient,
    options: &[RouteOption],
    config: &DelayConfig,
) -> Option<PassOutcome> {
    let ids: Vec<_> = options.iter().map(|o| o.id.clone()).collect();
    match backend.fetch_statuses(&ids).await {
        Ok(statuses) => Some(apply_transitions(
            options,
            |option| statuses.get(&option.id).copied().unwrap_or(option.status),
            config,
        )),
        Err(e) => {
            warn!(error = %e, "Status lookup failed, simulating locally");
            None
        }
    }
}

fn simulate(ctx: &MonitorContext, options: &[RouteOption]) -> PassOutcome {
    let mut source = ctx.source.lock().unwrap_or_else(PoisonError::into_inner);
    evaluate_delays(options, &mut **source, &ctx.config)
}

/// Handle to a running monitor task. Dropping it stops the task.
#[derive(Debug)]
pub struct DelayMonitor {
    generation: u64,
    handle: JoinHandle<()>,
}

impl DelayMonitor {
    /// Start monitoring the candidate set of `generation`.
    ///
    /// The first pass runs one interval after the start.
    pub fn spawn(ctx: MonitorContext, generation: u64) -> Self {
        let period = ctx.config.check_interval.max(Duration::from_millis(1));
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker.tick().await;

            loop {
                ticker.tick().await;
                match run_pass(&ctx, generation).await {
                    PassResult::Applied { alerts } => {
                        debug!(generation, alerts, "Delay check complete");
                    }
                    result @ (PassResult::Stale | PassResult::Idle) => {
                        debug!(generation, ?result, "Stopping delay monitor");
                        break;
                    }
                }
            }
        });

        Self { generation, handle }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn stop(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for DelayMonitor {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
