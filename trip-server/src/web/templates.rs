//! Askama templates for the web frontend.

use askama::Template;

use crate::domain::{
    OptionsSummary, RouteOption, RouteStatus, TransportType, format_duration,
    format_walking_distance,
};
use crate::notify::Notification;
use crate::places::Place;
use crate::resolver::route_color;

// ============================================================================
// Page Templates
// ============================================================================

/// Home page: origin picker, destination search and the option list.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub location_label: String,
    pub origins: Vec<String>,
    pub popular: Vec<PlaceView>,
    pub recent: Vec<PlaceView>,
}

// ============================================================================
// Fragment Templates
// ============================================================================

/// Candidate options for the current destination.
#[derive(Template)]
#[template(path = "options_list.html")]
pub struct OptionsListTemplate {
    pub destination: String,
    pub loading: bool,
    pub options: Vec<OptionView>,
    pub summary: Option<SummaryView>,
}

/// Live notifications.
#[derive(Template)]
#[template(path = "notifications.html")]
pub struct NotificationsTemplate {
    pub notifications: Vec<NotificationView>,
}

// ============================================================================
// View Models
// ============================================================================

/// A destination button.
#[derive(Debug, Clone)]
pub struct PlaceView {
    pub name: String,
    pub icon: &'static str,
}

impl PlaceView {
    pub fn from_place(place: &Place) -> Self {
        Self {
            name: place.name.clone(),
            icon: place.kind.icon(),
        }
    }
}

/// One row of the option list.
#[derive(Debug, Clone)]
pub struct OptionView {
    pub id: String,
    pub icon: &'static str,
    pub transport: &'static str,
    pub route_name: String,
    pub route_number: String,
    pub duration: String,
    pub walking: String,
    pub status_text: &'static str,
    pub status_class: &'static str,
    /// e.g. "+10 min"; empty unless delayed
    pub delay: String,
    pub color: &'static str,
}

impl OptionView {
    /// `index` is the option's position in the list, which picks its colour.
    pub fn from_option(option: &RouteOption, index: usize) -> Self {
        let (icon, transport) = match option.transport {
            TransportType::Bus => ("🚌", option.transport.label()),
            TransportType::Train => ("🚆", option.transport.label()),
        };
        let (status_class, delay) = match option.status {
            RouteStatus::OnTime => ("on-time", String::new()),
            RouteStatus::Delayed(mins) => ("delayed", format!("+{mins} min")),
            RouteStatus::Cancelled => ("cancelled", String::new()),
        };

        Self {
            id: option.id.to_string(),
            icon,
            transport,
            route_name: option.route_name.clone(),
            route_number: option.route_number.clone(),
            duration: format_duration(option.estimated_duration_mins),
            walking: format_walking_distance(option.walking_distance_m),
            status_text: option.status.text(),
            status_class,
            delay,
            color: route_color(option, index),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.status_class == "cancelled"
    }
}

/// The line under the option list.
#[derive(Debug, Clone)]
pub struct SummaryView {
    pub fastest: String,
    pub least_walking: String,
    pub on_time: String,
}

impl SummaryView {
    pub fn from_summary(summary: &OptionsSummary) -> Self {
        Self {
            fastest: format_duration(summary.fastest_minutes),
            least_walking: format_walking_distance(summary.least_walking_meters),
            on_time: format!("{}/{} on time", summary.on_time_count, summary.total),
        }
    }
}

/// One notification card.
#[derive(Debug, Clone)]
pub struct NotificationView {
    pub id: u64,
    pub kind: &'static str,
    pub title: String,
    pub message: String,
    pub time: String,
    pub dismissable: bool,
}

impl NotificationView {
    pub fn from_notification(n: &Notification) -> Self {
        Self {
            id: n.id.0,
            kind: n.kind.as_str(),
            title: n.title.clone().unwrap_or_default(),
            message: n.message.clone(),
            time: n.timestamp.format("%H:%M").to_string(),
            dismissable: n.persistent || n.kind.is_error(),
        }
    }
}
