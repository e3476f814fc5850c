use super::{
    delete_reminder::DeleteReminderUseCase, dismiss_reminder::DismissReminderUseCase,
    snooze_reminder::SnoozeReminderUseCase,
};
use crate::shared::usecase::Subscriber;
use tickd_domain::Reminder;
use tickd_infra::TickdContext;

/// A snoozed, dismissed or deleted reminder must not keep its toast in the
/// notification feed
pub struct RemoveToastOnReminderResolved;

#[async_trait::async_trait(?Send)]
impl Subscriber<SnoozeReminderUseCase> for RemoveToastOnReminderResolved {
    async fn notify(&self, e: &Reminder, ctx: &TickdContext) {
        ctx.notifier.feed.remove(&e.user_id, &e.id);
    }
}

#[async_trait::async_trait(?Send)]
impl Subscriber<DismissReminderUseCase> for RemoveToastOnReminderResolved {
    async fn notify(&self, e: &Reminder, ctx: &TickdContext) {
        ctx.notifier.feed.remove(&e.user_id, &e.id);
    }
}

#[async_trait::async_trait(?Send)]
impl Subscriber<DeleteReminderUseCase> for RemoveToastOnReminderResolved {
    async fn notify(&self, e: &Reminder, ctx: &TickdContext) {
        ctx.notifier.feed.remove(&e.user_id, &e.id);
    }
}
