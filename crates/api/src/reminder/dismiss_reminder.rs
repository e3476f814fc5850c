use super::subscribers::RemoveToastOnReminderResolved;
use crate::error::TickdError;
use crate::shared::{
    auth::protect_route,
    usecase::{execute, Subscriber, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use tickd_api_structs::dismiss_reminder::*;
use tickd_domain::{Reminder, ID};
use tickd_infra::TickdContext;

pub async fn dismiss_reminder_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<TickdContext>,
) -> Result<HttpResponse, TickdError> {
    let user_id = protect_route(&http_req)?;

    let usecase = DismissReminderUseCase {
        user_id,
        reminder_id: path_params.reminder_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|reminder| HttpResponse::Ok().json(APIResponse::new(reminder)))
        .map_err(TickdError::from)
}

#[derive(Debug)]
pub struct DismissReminderUseCase {
    pub user_id: ID,
    pub reminder_id: ID,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
}

impl From<UseCaseError> for TickdError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(reminder_id) => Self::NotFound(format!(
                "The reminder with id: {}, was not found.",
                reminder_id
            )),
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for DismissReminderUseCase {
    type Response = Reminder;

    type Error = UseCaseError;

    const NAME: &'static str = "DismissReminder";

    async fn execute(&mut self, ctx: &TickdContext) -> Result<Self::Response, Self::Error> {
        let reminder = match ctx.repos.reminders.find(&self.reminder_id).await {
            Some(reminder) if reminder.user_id == self.user_id => reminder,
            _ => return Err(UseCaseError::NotFound(self.reminder_id.clone())),
        };

        let now = ctx.sys.get_timestamp_millis();
        // Dismissing an already dismissed reminder is a successful noop,
        // the stored reminder (with its original dismissed_at) is returned
        match ctx.repos.reminders.dismiss(&self.reminder_id, now).await {
            Some(dismissed) => Ok(dismissed),
            None => Ok(reminder),
        }
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(RemoveToastOnReminderResolved)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tickd_domain::{ReminderChannel, ReminderStatus, Task};
    use tickd_infra::ISys;

    struct FrozenSys(i64);
    impl ISys for FrozenSys {
        fn get_timestamp_millis(&self) -> i64 {
            self.0
        }
    }

    async fn setup(ctx: &TickdContext) -> Reminder {
        let user_id = ID::default();
        let task = Task::new(user_id.clone(), "Pay rent".into(), Some(1000), 0);
        ctx.repos.tasks.insert(&task).await.unwrap();
        let reminder = Reminder::new(task.id, user_id, ReminderChannel::InApp, 1000);
        ctx.repos.reminders.insert(&reminder).await.unwrap();
        reminder
    }

    #[actix_web::main]
    #[test]
    async fn dismisses_pending_reminder() {
        let mut ctx = TickdContext::create_inmemory();
        ctx.sys = Arc::new(FrozenSys(2000));
        let reminder = setup(&ctx).await;

        let usecase = DismissReminderUseCase {
            user_id: reminder.user_id.clone(),
            reminder_id: reminder.id.clone(),
        };
        let dismissed = execute(usecase, &ctx).await.expect("To dismiss reminder");

        assert_eq!(dismissed.status, ReminderStatus::Dismissed);
        assert_eq!(dismissed.dismissed_at, Some(2000));
    }

    #[actix_web::main]
    #[test]
    async fn double_dismiss_is_a_noop_success() {
        let mut ctx = TickdContext::create_inmemory();
        ctx.sys = Arc::new(FrozenSys(2000));
        let reminder = setup(&ctx).await;
        ctx.repos.reminders.dismiss(&reminder.id, 1500).await;

        let usecase = DismissReminderUseCase {
            user_id: reminder.user_id.clone(),
            reminder_id: reminder.id.clone(),
        };
        let dismissed = execute(usecase, &ctx).await.expect("To dismiss reminder");

        assert_eq!(dismissed.status, ReminderStatus::Dismissed);
        // The original dismissal time is preserved
        assert_eq!(dismissed.dismissed_at, Some(1500));
    }

    #[actix_web::main]
    #[test]
    async fn rejects_unknown_reminder() {
        let ctx = TickdContext::create_inmemory();

        let reminder_id = ID::default();
        let usecase = DismissReminderUseCase {
            user_id: ID::default(),
            reminder_id: reminder_id.clone(),
        };
        let res = execute(usecase, &ctx).await;
        assert_eq!(res.unwrap_err(), UseCaseError::NotFound(reminder_id));
    }
}
