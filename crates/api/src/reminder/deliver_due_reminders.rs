use crate::error::TickdError;
use crate::shared::usecase::UseCase;
use std::collections::HashMap;
use tickd_domain::{Task, ID};
use tickd_infra::{ReminderNotification, TickdContext};
use tracing::{error, warn};

/// The delivery poller's unit of work: finds every reminder whose effective
/// fire time has been reached, marks it SENT and dispatches a notification
/// with its task context. Runs on an interval from the job scheduler, but is
/// a plain usecase so tests can drive cycles by hand.
#[derive(Debug)]
pub struct DeliverDueRemindersUseCase;

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

impl From<UseCaseError> for TickdError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for DeliverDueRemindersUseCase {
    type Response = Vec<ReminderNotification>;

    type Error = UseCaseError;

    const NAME: &'static str = "DeliverDueReminders";

    async fn execute(&mut self, ctx: &TickdContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.get_timestamp_millis();
        let due = ctx
            .repos
            .reminders
            .find_due_before(now)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        if due.is_empty() {
            return Ok(Vec::new());
        }

        let task_ids = due
            .iter()
            .map(|r| r.task_id.clone())
            .collect::<std::collections::HashSet<_>>()
            .into_iter()
            .collect::<Vec<_>>();
        let tasks = ctx
            .repos
            .tasks
            .find_many(&task_ids)
            .await
            .map_err(|_| UseCaseError::StorageError)?
            .into_iter()
            .map(|task| (task.id.clone(), task))
            .collect::<HashMap<ID, Task>>();

        let mut delivered = Vec::new();
        for reminder in due {
            // The task lookup comes first: a reminder is never marked SENT
            // without the context its notification is built from. A missing
            // task means a delete raced this cycle, leave the reminder for
            // the cascade to clean up.
            let task = match tasks.get(&reminder.task_id) {
                Some(task) => task,
                None => {
                    error!(
                        "Unable to find task: {} for due reminder: {}",
                        reminder.task_id, reminder.id
                    );
                    continue;
                }
            };

            let effective_fire_at = reminder.effective_fire_at();
            if !ctx
                .delivery_gate
                .permits(&reminder.id, effective_fire_at, now)
            {
                continue;
            }

            // Conditional write, None means another poller or a user action
            // got there first, or the write failed. Either way nothing is
            // recorded in the gate, so a still-due reminder is retried on
            // the next cycle.
            let sent = match ctx.repos.reminders.mark_sent(&reminder.id, now).await {
                Some(sent) => sent,
                None => {
                    warn!(
                        "Due reminder: {} changed state before delivery, skipping",
                        reminder.id
                    );
                    continue;
                }
            };
            ctx.delivery_gate.record(&reminder.id, effective_fire_at, now);

            let notification = ReminderNotification {
                reminder_id: sent.id.clone(),
                task_id: task.id.clone(),
                user_id: sent.user_id.clone(),
                channel: sent.channel,
                task_title: task.title.clone(),
                due_date: task.due_date,
                fired_at: effective_fire_at,
                delivered_at: now,
            };
            ctx.notifier.dispatch(notification.clone()).await;
            delivered.push(notification);
        }

        Ok(delivered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::usecase::execute;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use tickd_domain::{Reminder, ReminderChannel, ReminderStatus};
    use tickd_infra::{DeleteResult, IReminderRepo, ISys};

    struct FrozenSys(i64);
    impl ISys for FrozenSys {
        fn get_timestamp_millis(&self) -> i64 {
            self.0
        }
    }

    /// Delegating repo whose next `mark_sent` fails the way the storage
    /// backend reports any write error
    struct MarkSentFailsOnce {
        inner: Arc<dyn IReminderRepo>,
        fail_next: AtomicBool,
    }

    impl MarkSentFailsOnce {
        fn new(inner: Arc<dyn IReminderRepo>) -> Self {
            Self {
                inner,
                fail_next: AtomicBool::new(true),
            }
        }
    }

    #[async_trait::async_trait]
    impl IReminderRepo for MarkSentFailsOnce {
        async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()> {
            self.inner.insert(reminder).await
        }

        async fn find(&self, reminder_id: &ID) -> Option<Reminder> {
            self.inner.find(reminder_id).await
        }

        async fn find_by_task(&self, task_id: &ID) -> Vec<Reminder> {
            self.inner.find_by_task(task_id).await
        }

        async fn find_due_before(&self, before: i64) -> anyhow::Result<Vec<Reminder>> {
            self.inner.find_due_before(before).await
        }

        async fn find_due_by_user(
            &self,
            user_id: &ID,
            before: i64,
        ) -> anyhow::Result<Vec<Reminder>> {
            self.inner.find_due_by_user(user_id, before).await
        }

        async fn mark_sent(&self, reminder_id: &ID, now: i64) -> Option<Reminder> {
            if self.fail_next.swap(false, Ordering::SeqCst) {
                return None;
            }
            self.inner.mark_sent(reminder_id, now).await
        }

        async fn snooze(&self, reminder_id: &ID, until: i64) -> Option<Reminder> {
            self.inner.snooze(reminder_id, until).await
        }

        async fn dismiss(&self, reminder_id: &ID, now: i64) -> Option<Reminder> {
            self.inner.dismiss(reminder_id, now).await
        }

        async fn dismiss_by_task(&self, task_id: &ID, now: i64) -> anyhow::Result<Vec<Reminder>> {
            self.inner.dismiss_by_task(task_id, now).await
        }

        async fn delete(&self, reminder_id: &ID) -> Option<Reminder> {
            self.inner.delete(reminder_id).await
        }

        async fn delete_by_task(&self, task_id: &ID) -> anyhow::Result<DeleteResult> {
            self.inner.delete_by_task(task_id).await
        }
    }

    async fn run_cycle(ctx: &TickdContext, now: i64) -> Vec<ReminderNotification> {
        let mut ctx = ctx.clone();
        ctx.sys = Arc::new(FrozenSys(now));
        execute(DeliverDueRemindersUseCase, &ctx)
            .await
            .expect("Delivery cycle to run")
    }

    async fn setup(ctx: &TickdContext, fire_at: i64) -> Reminder {
        let user_id = ID::default();
        let task = Task::new(user_id.clone(), "Call dentist".into(), Some(fire_at), 0);
        ctx.repos.tasks.insert(&task).await.unwrap();
        let reminder = Reminder::new(task.id, user_id, ReminderChannel::InApp, fire_at);
        ctx.repos.reminders.insert(&reminder).await.unwrap();
        reminder
    }

    #[actix_web::main]
    #[test]
    async fn delivers_due_reminder_exactly_once() {
        let ctx = TickdContext::create_inmemory();
        let reminder = setup(&ctx, 1000).await;

        // Not yet due
        assert!(run_cycle(&ctx, 999).await.is_empty());

        let delivered = run_cycle(&ctx, 1000).await;
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].reminder_id, reminder.id);
        assert_eq!(delivered[0].task_title, "Call dentist");
        assert_eq!(delivered[0].fired_at, 1000);

        let stored = ctx.repos.reminders.find(&reminder.id).await.unwrap();
        assert_eq!(stored.status, ReminderStatus::Sent);
        assert_eq!(stored.sent_at, Some(1000));

        // Subsequent cycles must not deliver it again
        assert!(run_cycle(&ctx, 1100).await.is_empty());
        assert!(run_cycle(&ctx, 2000).await.is_empty());

        // It landed in the user's feed exactly once
        let toasts = ctx.notifier.feed.list(&reminder.user_id, 2000);
        assert_eq!(toasts.len(), 1);
    }

    #[actix_web::main]
    #[test]
    async fn delivers_again_after_snooze() {
        let ctx = TickdContext::create_inmemory();
        let reminder = setup(&ctx, 1000).await;

        assert_eq!(run_cycle(&ctx, 1000).await.len(), 1);

        let until = 1000 + 5 * 60 * 1000;
        ctx.repos
            .reminders
            .snooze(&reminder.id, until)
            .await
            .expect("To snooze");

        // Still snoozed
        assert!(run_cycle(&ctx, until - 1).await.is_empty());

        let delivered = run_cycle(&ctx, until).await;
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].fired_at, until);

        let stored = ctx.repos.reminders.find(&reminder.id).await.unwrap();
        assert_eq!(stored.status, ReminderStatus::Sent);
        assert_eq!(stored.snoozed_until, None);
        assert_eq!(stored.snooze_count, 1);
    }

    #[actix_web::main]
    #[test]
    async fn retries_on_next_cycle_after_failed_sent_write() {
        let mut ctx = TickdContext::create_inmemory();
        ctx.repos.reminders = Arc::new(MarkSentFailsOnce::new(ctx.repos.reminders.clone()));
        let reminder = setup(&ctx, 1000).await;

        // The sent write fails, nothing is delivered and the reminder
        // stays pending
        assert!(run_cycle(&ctx, 1000).await.is_empty());
        let stored = ctx.repos.reminders.find(&reminder.id).await.unwrap();
        assert_eq!(stored.status, ReminderStatus::Pending);
        assert!(ctx.notifier.feed.list(&reminder.user_id, 1000).is_empty());

        // The next cycle must not be blocked by the failed attempt
        let delivered = run_cycle(&ctx, 1030).await;
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].reminder_id, reminder.id);
        let stored = ctx.repos.reminders.find(&reminder.id).await.unwrap();
        assert_eq!(stored.status, ReminderStatus::Sent);
        assert_eq!(ctx.notifier.feed.list(&reminder.user_id, 1030).len(), 1);
    }

    #[actix_web::main]
    #[test]
    async fn dismissed_reminder_is_never_delivered() {
        let ctx = TickdContext::create_inmemory();
        let reminder = setup(&ctx, 1000).await;
        ctx.repos.reminders.dismiss(&reminder.id, 500).await;

        assert!(run_cycle(&ctx, 2000).await.is_empty());
        let stored = ctx.repos.reminders.find(&reminder.id).await.unwrap();
        assert_eq!(stored.status, ReminderStatus::Dismissed);
        assert_eq!(stored.sent_at, None);
    }

    #[actix_web::main]
    #[test]
    async fn missing_task_leaves_reminder_pending() {
        let ctx = TickdContext::create_inmemory();
        let user_id = ID::default();
        // Reminder without a task, as when a delete raced the poller
        let reminder = Reminder::new(ID::default(), user_id, ReminderChannel::InApp, 1000);
        ctx.repos.reminders.insert(&reminder).await.unwrap();

        assert!(run_cycle(&ctx, 2000).await.is_empty());
        let stored = ctx.repos.reminders.find(&reminder.id).await.unwrap();
        assert_eq!(stored.status, ReminderStatus::Pending);
    }

    #[actix_web::main]
    #[test]
    async fn delivers_for_multiple_users_in_one_cycle() {
        let ctx = TickdContext::create_inmemory();
        let first = setup(&ctx, 500).await;
        let second = setup(&ctx, 800).await;

        let delivered = run_cycle(&ctx, 1000).await;
        assert_eq!(delivered.len(), 2);
        // Ordered by effective fire time
        assert_eq!(delivered[0].reminder_id, first.id);
        assert_eq!(delivered[1].reminder_id, second.id);

        assert_eq!(ctx.notifier.feed.list(&first.user_id, 1000).len(), 1);
        assert_eq!(ctx.notifier.feed.list(&second.user_id, 1000).len(), 1);
    }
}
