//! User-facing notifications.
//!
//! Notices (info, success, failure banners) and route alerts (delay,
//! warning, cancellation) share one ordered queue.

mod notification;
mod queue;

pub use notification::{
    DELAY_TTL, GENERAL_TTL, Notification, NotificationDraft, NotificationId, NotificationKind,
    WARNING_TTL,
};
pub use queue::{NotificationQueue, PushOutcome};
