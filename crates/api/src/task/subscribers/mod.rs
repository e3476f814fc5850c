use super::{complete_task::CompleteTaskUseCase, delete_task::DeleteTaskUseCase};
use crate::shared::usecase::Subscriber;
use tickd_domain::{Reminder, Task};
use tickd_infra::TickdContext;

/// The inmemory backend has no cascading foreign keys, and even on
/// postgres a toast for a deleted task must not linger in the feed.
pub struct DeleteRemindersOnTaskDeleted;

#[async_trait::async_trait(?Send)]
impl Subscriber<DeleteTaskUseCase> for DeleteRemindersOnTaskDeleted {
    async fn notify(&self, e: &(Task, Vec<Reminder>), ctx: &TickdContext) {
        let (task, _) = e;
        // Sideeffect, ignore result
        let _ = ctx.repos.reminders.delete_by_task(&task.id).await;
        ctx.notifier.feed.remove_by_task(&task.user_id, &task.id);
    }
}

pub struct RemoveToastsOnTaskCompleted;

#[async_trait::async_trait(?Send)]
impl Subscriber<CompleteTaskUseCase> for RemoveToastsOnTaskCompleted {
    async fn notify(&self, e: &(Task, Vec<Reminder>), ctx: &TickdContext) {
        let (task, _) = e;
        if ctx.config.dismiss_reminders_on_complete {
            ctx.notifier.feed.remove_by_task(&task.user_id, &task.id);
        }
    }
}
