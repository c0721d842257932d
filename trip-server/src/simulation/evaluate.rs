//! A single monitoring pass, computed without side effects.

use super::{DelayConfig, DelaySource};
use crate::domain::{DelayMinutes, RouteId, RouteOption, RouteStatus};
use crate::notify::{NotificationDraft, NotificationKind};

/// Everything one pass decided, applied by the caller in one step.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PassOutcome {
    /// The candidate set with updated statuses, in the original order.
    pub options: Vec<RouteOption>,
    /// Alerts for options that changed state during this pass.
    pub alerts: Vec<NotificationDraft>,
    /// Routes that went from delayed back to on time.
    pub recovered: Vec<RouteId>,
}

/// Run one pass of the delay simulation over `options`.
pub fn evaluate_delays(
    options: &[RouteOption],
    source: &mut dyn DelaySource,
    config: &DelayConfig,
) -> PassOutcome {
    apply_transitions(options, |option| source.next_status(option, config), config)
}

/// Move every option to the status chosen by `next` and collect the alerts
/// the transitions call for.
///
/// Only state changes alert: on time to delayed raises a delay (or warning)
/// alert, anything to cancelled raises a cancellation alert. An option that
/// stays delayed raises nothing, even if its delay changes.
pub fn apply_transitions(
    options: &[RouteOption],
    mut next: impl FnMut(&RouteOption) -> RouteStatus,
    config: &DelayConfig,
) -> PassOutcome {
    let mut outcome = PassOutcome::default();

    for option in options {
        let status = next(option);
        let updated = option.with_status(status);

        match (option.status, status) {
            (RouteStatus::OnTime, RouteStatus::Delayed(mins)) => {
                outcome.alerts.push(delay_alert(&updated, mins, config));
            }
            (RouteStatus::OnTime | RouteStatus::Delayed(_), RouteStatus::Cancelled) => {
                outcome.alerts.push(cancellation_alert(&updated));
            }
            (RouteStatus::Delayed(_), RouteStatus::OnTime) => {
                outcome.recovered.push(option.id.clone());
            }
            _ => {}
        }

        outcome.options.push(updated);
    }

    outcome
}

/// Alerts for options that are already late or cancelled when delivered.
pub fn initial_alerts(options: &[RouteOption], config: &DelayConfig) -> Vec<NotificationDraft> {
    options
        .iter()
        .filter_map(|option| match option.status {
            RouteStatus::OnTime => None,
            RouteStatus::Delayed(mins) => Some(delay_alert(option, mins, config)),
            RouteStatus::Cancelled => Some(cancellation_alert(option)),
        })
        .collect()
}

/// Delays above the warning threshold are reported as warnings.
pub fn delay_alert(
    option: &RouteOption,
    mins: DelayMinutes,
    config: &DelayConfig,
) -> NotificationDraft {
    let (kind, title) = if mins.get() > config.warning_threshold_mins {
        (NotificationKind::Warning, "Major delay")
    } else {
        (NotificationKind::Delay, "Delay")
    };

    NotificationDraft::new(
        kind,
        format!("{} is running {} min late", option.route_name, mins),
    )
    .with_title(title)
    .for_route(option.id.clone())
}

pub fn cancellation_alert(option: &RouteOption) -> NotificationDraft {
    NotificationDraft::new(
        NotificationKind::Cancellation,
        format!("{} has been cancelled", option.route_name),
    )
    .with_title("Service cancelled")
    .for_route(option.id.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TransportType;
    use crate::notify::{DELAY_TTL, WARNING_TTL};
    use crate::simulation::{RandomDelaySource, ScriptedDelaySource};

    fn route(id: &str) -> RouteId {
        RouteId::new(id).unwrap()
    }

    fn option(id: &str, status: RouteStatus) -> RouteOption {
        RouteOption {
            id: route(id),
            transport: TransportType::Bus,
            route_name: format!("Route {id}"),
            route_number: id.into(),
            estimated_duration_mins: 60,
            walking_distance_m: 100,
            stops: Vec::new(),
            status,
        }
    }

    fn delayed(mins: u32) -> RouteStatus {
        RouteStatus::Delayed(DelayMinutes::new(mins).unwrap())
    }

    #[test]
    fn minor_delay_alert() {
        let options = [option("a", RouteStatus::OnTime)];
        let mut source = ScriptedDelaySource::new().script(route("a"), [delayed(15)]);

        let outcome = evaluate_delays(&options, &mut source, &DelayConfig::default());

        assert_eq!(outcome.options[0].status, delayed(15));
        assert_eq!(outcome.alerts.len(), 1);
        let alert = &outcome.alerts[0];
        assert_eq!(alert.kind, NotificationKind::Delay);
        assert_eq!(alert.expires_after, DELAY_TTL);
        assert_eq!(alert.route_id, Some(route("a")));
        assert_eq!(alert.message, "Route a is running 15 min late");
    }

    #[test]
    fn major_delay_is_a_warning() {
        let options = [option("a", RouteStatus::OnTime)];
        let mut source = ScriptedDelaySource::new().script(route("a"), [delayed(16)]);

        let outcome = evaluate_delays(&options, &mut source, &DelayConfig::default());

        assert_eq!(outcome.alerts[0].kind, NotificationKind::Warning);
        assert_eq!(outcome.alerts[0].expires_after, WARNING_TTL);
        assert_eq!(outcome.alerts[0].title.as_deref(), Some("Major delay"));
    }

    #[test]
    fn still_delayed_is_silent() {
        let options = [option("a", delayed(10))];
        let mut source = ScriptedDelaySource::new().script(route("a"), [delayed(25)]);

        let outcome = evaluate_delays(&options, &mut source, &DelayConfig::default());

        assert_eq!(outcome.options[0].status, delayed(25));
        assert!(outcome.alerts.is_empty());
        assert!(outcome.recovered.is_empty());
    }

    #[test]
    fn cancellation_alert_is_persistent_error() {
        let options = [option("a", delayed(10)), option("b", RouteStatus::Cancelled)];
        let mut source = ScriptedDelaySource::new()
            .script(route("a"), [RouteStatus::Cancelled])
            .script(route("b"), [RouteStatus::Cancelled]);

        let outcome = evaluate_delays(&options, &mut source, &DelayConfig::default());

        assert_eq!(outcome.alerts.len(), 1);
        let alert = &outcome.alerts[0];
        assert_eq!(alert.kind, NotificationKind::Cancellation);
        assert!(alert.kind.is_error());
        assert!(alert.persistent);
        assert_eq!(alert.route_id, Some(route("a")));
    }

    #[test]
    fn recovery_is_reported() {
        let options = [option("a", delayed(10)), option("b", RouteStatus::OnTime)];
        let mut source = ScriptedDelaySource::new().script(route("a"), [RouteStatus::OnTime]);

        let outcome = evaluate_delays(&options, &mut source, &DelayConfig::default());

        assert_eq!(outcome.recovered, vec![route("a")]);
        assert!(outcome.alerts.is_empty());
        assert!(outcome.options.iter().all(|o| o.status.is_on_time()));
    }

    #[test]
    fn order_and_ids_are_preserved() {
        let options = [
            option("x", RouteStatus::OnTime),
            option("y", RouteStatus::OnTime),
            option("z", RouteStatus::OnTime),
        ];
        let config = DelayConfig::default().with_delay_probability(1.0);
        let mut source = RandomDelaySource::seeded(5);

        let outcome = evaluate_delays(&options, &mut source, &config);

        let ids: Vec<_> = outcome.options.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, ["x", "y", "z"]);
        assert_eq!(outcome.alerts.len(), 3);
    }

    #[test]
    fn initial_alerts_for_delivered_delays() {
        let options = [
            option("a", RouteStatus::OnTime),
            option("b", delayed(10)),
            option("c", RouteStatus::Cancelled),
        ];

        let alerts = initial_alerts(&options, &DelayConfig::default());

        let kinds: Vec<_> = alerts.iter().map(|a| a.kind).collect();
        assert_eq!(kinds, [NotificationKind::Delay, NotificationKind::Cancellation]);
    }
}
