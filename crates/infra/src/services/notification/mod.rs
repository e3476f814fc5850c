mod feed;
mod gate;
mod sink;

pub use feed::NotificationFeed;
pub use gate::DeliveryGate;
use serde::{Deserialize, Serialize};
pub use sink::{EmailRelaySink, NotificationSink, WebhookSink};
use std::sync::Arc;
use tickd_domain::{ReminderChannel, ID};
use tracing::warn;

/// A delivered reminder together with the task context it was delivered
/// with. A notification is only ever emitted after the owning task lookup
/// succeeded, so `task_title` is always present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderNotification {
    pub reminder_id: ID,
    pub task_id: ID,
    pub user_id: ID,
    #[serde(rename = "type")]
    pub channel: ReminderChannel,
    pub task_title: String,
    pub due_date: Option<i64>,
    /// The effective fire time that triggered this delivery
    pub fired_at: i64,
    pub delivered_at: i64,
}

/// Fans a `ReminderNotification` out to its delivery targets. Every
/// notification lands in the in-process feed; PUSH and EMAIL reminders are
/// additionally posted to their out-of-process sink. Sink failures are
/// logged and swallowed, delivery is best-effort.
pub struct Notifier {
    pub feed: NotificationFeed,
    push: Arc<dyn NotificationSink>,
    email: Arc<dyn NotificationSink>,
}

impl Notifier {
    pub fn new(
        feed: NotificationFeed,
        push: Arc<dyn NotificationSink>,
        email: Arc<dyn NotificationSink>,
    ) -> Self {
        Self { feed, push, email }
    }

    pub async fn dispatch(&self, notification: ReminderNotification) {
        let sink = match notification.channel {
            ReminderChannel::InApp => None,
            ReminderChannel::Push => Some(&self.push),
            ReminderChannel::Email => Some(&self.email),
        };
        if let Some(sink) = sink {
            if let Err(e) = sink.deliver(&notification).await {
                warn!(
                    "Unable to deliver reminder: {} over {:?}: {:?}",
                    notification.reminder_id, notification.channel, e
                );
            }
        }
        self.feed.push(notification);
    }
}
