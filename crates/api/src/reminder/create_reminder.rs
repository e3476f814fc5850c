use crate::error::TickdError;
use crate::shared::{
    auth::protect_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use tickd_api_structs::create_reminder::*;
use tickd_domain::{fire_at_from_offset, Reminder, ReminderChannel, ID};
use tickd_infra::TickdContext;

pub async fn create_reminder_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<TickdContext>,
) -> Result<HttpResponse, TickdError> {
    let user_id = protect_route(&http_req)?;

    let body = body.0;
    let usecase = CreateReminderUseCase {
        user_id,
        task_id: path_params.task_id.clone(),
        channel: body.reminder_type,
        fire_at: body.fire_at,
        relative_offset: body.relative_offset,
    };

    execute(usecase, &ctx)
        .await
        .map(|reminder| HttpResponse::Created().json(APIResponse::new(reminder)))
        .map_err(TickdError::from)
}

#[derive(Debug)]
pub struct CreateReminderUseCase {
    pub user_id: ID,
    pub task_id: ID,
    pub channel: ReminderChannel,
    /// Absolute fire time. A time in the past is allowed and treated as
    /// immediately due on the next poll.
    pub fire_at: Option<i64>,
    /// Minutes before the task due date, requires the task to have one
    pub relative_offset: Option<i64>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    TaskNotFound(ID),
    InvalidSchedule(String),
    StorageError,
}

impl From<UseCaseError> for TickdError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::TaskNotFound(task_id) => {
                Self::NotFound(format!("The task with id: {}, was not found.", task_id))
            }
            UseCaseError::InvalidSchedule(msg) => Self::BadClientData(msg),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateReminderUseCase {
    type Response = Reminder;

    type Error = UseCaseError;

    const NAME: &'static str = "CreateReminder";

    async fn execute(&mut self, ctx: &TickdContext) -> Result<Self::Response, Self::Error> {
        let task = match ctx.repos.tasks.find(&self.task_id).await {
            Some(task) if task.user_id == self.user_id => task,
            _ => return Err(UseCaseError::TaskNotFound(self.task_id.clone())),
        };

        let (fire_at, relative_offset) = match (self.fire_at, self.relative_offset) {
            (Some(fire_at), None) => (fire_at, None),
            (None, Some(offset)) => {
                if offset < 0 {
                    return Err(UseCaseError::InvalidSchedule(format!(
                        "The relative offset: {} cannot be negative",
                        offset
                    )));
                }
                let due_date = task.due_date.ok_or_else(|| {
                    UseCaseError::InvalidSchedule(format!(
                        "The task with id: {} has no due date to schedule a relative reminder against",
                        task.id
                    ))
                })?;
                (fire_at_from_offset(due_date, offset), Some(offset))
            }
            _ => {
                return Err(UseCaseError::InvalidSchedule(
                    "Exactly one of fireAt and relativeOffset must be specified".into(),
                ))
            }
        };

        let mut reminder = Reminder::new(
            task.id.clone(),
            self.user_id.clone(),
            self.channel,
            fire_at,
        );
        reminder.relative_offset = relative_offset;

        ctx.repos
            .reminders
            .insert(&reminder)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(reminder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tickd_domain::{ReminderStatus, Task};

    async fn setup_task(ctx: &TickdContext, due_date: Option<i64>) -> Task {
        let task = Task::new(ID::default(), "Ship release".into(), due_date, 0);
        ctx.repos.tasks.insert(&task).await.unwrap();
        task
    }

    #[actix_web::main]
    #[test]
    async fn creates_relative_reminder() {
        let ctx = TickdContext::create_inmemory();
        // 2025-03-10T15:00:00Z
        let due_date = 1741618800000;
        let task = setup_task(&ctx, Some(due_date)).await;

        let usecase = CreateReminderUseCase {
            user_id: task.user_id.clone(),
            task_id: task.id.clone(),
            channel: ReminderChannel::InApp,
            fire_at: None,
            relative_offset: Some(30),
        };
        let reminder = execute(usecase, &ctx).await.expect("To create reminder");

        // 2025-03-10T14:30:00Z
        assert_eq!(reminder.fire_at, 1741617000000);
        assert_eq!(reminder.relative_offset, Some(30));
        assert_eq!(reminder.status, ReminderStatus::Pending);
        assert_eq!(reminder.snooze_count, 0);
    }

    #[actix_web::main]
    #[test]
    async fn creates_absolute_reminder_in_the_past() {
        let ctx = TickdContext::create_inmemory();
        let task = setup_task(&ctx, None).await;

        let usecase = CreateReminderUseCase {
            user_id: task.user_id.clone(),
            task_id: task.id.clone(),
            channel: ReminderChannel::Push,
            fire_at: Some(1),
            relative_offset: None,
        };
        let reminder = execute(usecase, &ctx).await.expect("To create reminder");

        // Past fire times are valid, the reminder is due on the next poll
        assert_eq!(reminder.fire_at, 1);
        assert!(reminder.is_due(1000));
    }

    #[actix_web::main]
    #[test]
    async fn rejects_relative_offset_without_due_date() {
        let ctx = TickdContext::create_inmemory();
        let task = setup_task(&ctx, None).await;

        let usecase = CreateReminderUseCase {
            user_id: task.user_id.clone(),
            task_id: task.id.clone(),
            channel: ReminderChannel::InApp,
            fire_at: None,
            relative_offset: Some(30),
        };
        let res = execute(usecase, &ctx).await;
        assert!(matches!(
            res.unwrap_err(),
            UseCaseError::InvalidSchedule(_)
        ));
    }

    #[actix_web::main]
    #[test]
    async fn rejects_ambiguous_schedule() {
        let ctx = TickdContext::create_inmemory();
        let task = setup_task(&ctx, Some(1000)).await;

        for (fire_at, relative_offset) in [(Some(500), Some(5)), (None, None)] {
            let usecase = CreateReminderUseCase {
                user_id: task.user_id.clone(),
                task_id: task.id.clone(),
                channel: ReminderChannel::InApp,
                fire_at,
                relative_offset,
            };
            let res = execute(usecase, &ctx).await;
            assert!(matches!(
                res.unwrap_err(),
                UseCaseError::InvalidSchedule(_)
            ));
        }
    }

    #[actix_web::main]
    #[test]
    async fn rejects_unknown_task() {
        let ctx = TickdContext::create_inmemory();

        let task_id = ID::default();
        let usecase = CreateReminderUseCase {
            user_id: ID::default(),
            task_id: task_id.clone(),
            channel: ReminderChannel::InApp,
            fire_at: Some(100),
            relative_offset: None,
        };
        let res = execute(usecase, &ctx).await;
        assert_eq!(res.unwrap_err(), UseCaseError::TaskNotFound(task_id));
    }
}
