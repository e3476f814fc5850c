mod inmemory;
mod postgres;

pub use inmemory::InMemoryReminderRepo;
pub use postgres::PostgresReminderRepo;
use tickd_domain::{Reminder, ID};

use crate::repos::shared::repo::DeleteResult;

/// The state transition methods (`mark_sent`, `snooze`, `dismiss`) are
/// conditional writes: they only apply when the stored status permits the
/// transition and return `None` otherwise. Multiple pollers or sessions can
/// therefore race on the same reminder without lost updates or double
/// delivery.
#[async_trait::async_trait]
pub trait IReminderRepo: Send + Sync {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()>;
    async fn find(&self, reminder_id: &ID) -> Option<Reminder>;
    async fn find_by_task(&self, task_id: &ID) -> Vec<Reminder>;
    /// All reminders across users whose effective fire time has been
    /// reached. This is the query the delivery poller drives from.
    async fn find_due_before(&self, before: i64) -> anyhow::Result<Vec<Reminder>>;
    /// Due reminders scoped to one user, for the client facing listDue
    async fn find_due_by_user(&self, user_id: &ID, before: i64) -> anyhow::Result<Vec<Reminder>>;
    /// PENDING or SNOOZED -> SENT. `None` when the reminder is missing or
    /// already SENT/DISMISSED.
    async fn mark_sent(&self, reminder_id: &ID, now: i64) -> Option<Reminder>;
    /// Defers a non-dismissed reminder to `until` and increments its
    /// snooze count. `None` when the reminder is missing or DISMISSED.
    async fn snooze(&self, reminder_id: &ID, until: i64) -> Option<Reminder>;
    /// Terminal transition. `None` when the reminder is missing or was
    /// already DISMISSED (the stored `dismissed_at` is left untouched).
    async fn dismiss(&self, reminder_id: &ID, now: i64) -> Option<Reminder>;
    /// Dismisses every non-terminal reminder of a task. Used by the task
    /// completion policy.
    async fn dismiss_by_task(&self, task_id: &ID, now: i64) -> anyhow::Result<Vec<Reminder>>;
    async fn delete(&self, reminder_id: &ID) -> Option<Reminder>;
    async fn delete_by_task(&self, task_id: &ID) -> anyhow::Result<DeleteResult>;
}
