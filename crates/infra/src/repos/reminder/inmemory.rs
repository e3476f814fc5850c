use super::IReminderRepo;
use crate::repos::shared::{inmemory_repo::*, repo::DeleteResult};
use tickd_domain::{Reminder, ReminderStatus, ID};

pub struct InMemoryReminderRepo {
    reminders: std::sync::Mutex<Vec<Reminder>>,
}

impl InMemoryReminderRepo {
    pub fn new() -> Self {
        Self {
            reminders: std::sync::Mutex::new(vec![]),
        }
    }
}

#[async_trait::async_trait]
impl IReminderRepo for InMemoryReminderRepo {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()> {
        insert(reminder, &self.reminders);
        Ok(())
    }

    async fn find(&self, reminder_id: &ID) -> Option<Reminder> {
        find(reminder_id, &self.reminders)
    }

    async fn find_by_task(&self, task_id: &ID) -> Vec<Reminder> {
        let mut reminders = find_by(&self.reminders, |r| r.task_id == *task_id);
        reminders.sort_by_key(|r| r.fire_at);
        reminders
    }

    async fn find_due_before(&self, before: i64) -> anyhow::Result<Vec<Reminder>> {
        let mut reminders = find_by(&self.reminders, |r: &Reminder| r.is_due(before));
        reminders.sort_by_key(|r| r.effective_fire_at());
        Ok(reminders)
    }

    async fn find_due_by_user(&self, user_id: &ID, before: i64) -> anyhow::Result<Vec<Reminder>> {
        let mut reminders = find_by(&self.reminders, |r: &Reminder| {
            r.user_id == *user_id && r.is_due(before)
        });
        reminders.sort_by_key(|r| r.effective_fire_at());
        Ok(reminders)
    }

    async fn mark_sent(&self, reminder_id: &ID, now: i64) -> Option<Reminder> {
        let mut updated = update_many(
            &self.reminders,
            |r| {
                r.id == *reminder_id
                    && matches!(r.status, ReminderStatus::Pending | ReminderStatus::Snoozed)
            },
            |r| {
                r.mark_sent(now);
            },
        );
        updated.pop()
    }

    async fn snooze(&self, reminder_id: &ID, until: i64) -> Option<Reminder> {
        let mut updated = update_many(
            &self.reminders,
            |r| r.id == *reminder_id && r.status != ReminderStatus::Dismissed,
            |r| {
                r.status = ReminderStatus::Snoozed;
                r.snoozed_until = Some(until);
                r.snooze_count += 1;
            },
        );
        updated.pop()
    }

    async fn dismiss(&self, reminder_id: &ID, now: i64) -> Option<Reminder> {
        let mut updated = update_many(
            &self.reminders,
            |r| r.id == *reminder_id && r.status != ReminderStatus::Dismissed,
            |r| {
                r.dismiss(now);
            },
        );
        updated.pop()
    }

    async fn dismiss_by_task(&self, task_id: &ID, now: i64) -> anyhow::Result<Vec<Reminder>> {
        Ok(update_many(
            &self.reminders,
            |r| r.task_id == *task_id && r.status != ReminderStatus::Dismissed,
            |r| {
                r.dismiss(now);
            },
        ))
    }

    async fn delete(&self, reminder_id: &ID) -> Option<Reminder> {
        delete(reminder_id, &self.reminders)
    }

    async fn delete_by_task(&self, task_id: &ID) -> anyhow::Result<DeleteResult> {
        Ok(delete_by(&self.reminders, |r| r.task_id == *task_id))
    }
}
