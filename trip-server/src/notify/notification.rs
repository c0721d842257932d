//! Notification values.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::domain::RouteId;

/// Lifetime of general notices (info, success, failure banners).
pub const GENERAL_TTL: Duration = Duration::from_secs(12);

/// Lifetime of a minor delay alert.
pub const DELAY_TTL: Duration = Duration::from_secs(30);

/// Lifetime of a major delay alert.
pub const WARNING_TTL: Duration = Duration::from_secs(45);

/// Category of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    Info,
    Delay,
    Cancellation,
}

impl NotificationKind {
    /// Kinds displayed with error severity.
    pub fn is_error(&self) -> bool {
        matches!(self, NotificationKind::Error | NotificationKind::Cancellation)
    }

    /// Kinds limited to one live entry per route.
    pub fn is_deduplicated(&self) -> bool {
        matches!(self, NotificationKind::Delay | NotificationKind::Warning)
    }

    pub fn default_ttl(&self) -> Duration {
        match self {
            NotificationKind::Delay => DELAY_TTL,
            NotificationKind::Warning => WARNING_TTL,
            _ => GENERAL_TTL,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Success => "success",
            NotificationKind::Error => "error",
            NotificationKind::Warning => "warning",
            NotificationKind::Info => "info",
            NotificationKind::Delay => "delay",
            NotificationKind::Cancellation => "cancellation",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Queue-assigned identifier, unique and increasing within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NotificationId(pub u64);

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A notification that has not been queued yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationDraft {
    pub kind: NotificationKind,
    pub title: Option<String>,
    pub message: String,
    pub route_id: Option<RouteId>,
    pub persistent: bool,
    pub expires_after: Duration,
}

impl NotificationDraft {
    /// A draft with the kind's default lifetime. Cancellations never expire.
    pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            title: None,
            message: message.into(),
            route_id: None,
            persistent: kind == NotificationKind::Cancellation,
            expires_after: kind.default_ttl(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Error, message)
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn for_route(mut self, route_id: RouteId) -> Self {
        self.route_id = Some(route_id);
        self
    }

    /// Keep the notification until it is dismissed.
    pub fn persistent(mut self) -> Self {
        self.persistent = true;
        self
    }

    pub fn expires_after(mut self, ttl: Duration) -> Self {
        self.expires_after = ttl;
        self
    }
}

/// A queued notification.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: NotificationId,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_id: Option<RouteId>,
    pub persistent: bool,
    #[serde(serialize_with = "as_millis")]
    pub expires_after: Duration,
}

impl Notification {
    pub(crate) fn from_draft(
        id: NotificationId,
        draft: NotificationDraft,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            kind: draft.kind,
            title: draft.title,
            message: draft.message,
            timestamp,
            route_id: draft.route_id,
            persistent: draft.persistent,
            expires_after: draft.expires_after,
        }
    }

    /// Whether this entry is a delay or warning alert for `route_id`.
    pub fn is_route_alert(&self, route_id: &RouteId) -> bool {
        self.kind.is_deduplicated() && self.route_id.as_ref() == Some(route_id)
    }
}

fn as_millis<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}
