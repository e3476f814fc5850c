mod notification;

pub use notification::{
    DeliveryGate, EmailRelaySink, NotificationFeed, NotificationSink, Notifier,
    ReminderNotification, WebhookSink,
};
