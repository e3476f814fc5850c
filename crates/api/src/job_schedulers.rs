use crate::reminder::deliver_due_reminders::DeliverDueRemindersUseCase;
use crate::shared::usecase::execute;
use actix_web::rt::time::interval;
use std::time::Duration;
use tickd_infra::TickdContext;
use tracing::error;

/// Spawns the delivery poller on the server's event loop. Each tick runs
/// one `DeliverDueRemindersUseCase` cycle; a failing cycle is logged and
/// the next tick retries, since due reminders stay due until delivered.
pub fn start_reminder_delivery_job(ctx: TickdContext) {
    actix_web::rt::spawn(async move {
        let mut poll_interval = interval(Duration::from_secs(ctx.config.reminder_poll_interval_secs));
        loop {
            poll_interval.tick().await;
            if let Err(e) = execute(DeliverDueRemindersUseCase, &ctx).await {
                error!("Reminder delivery cycle failed: {:?}", e);
            }
        }
    });
}
