use crate::error::TickdError;
use crate::shared::{
    auth::protect_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use tickd_api_structs::create_task::*;
use tickd_domain::{fire_at_from_offset, Reminder, ReminderSettings, Task, ID};
use tickd_infra::TickdContext;

pub async fn create_task_controller(
    http_req: HttpRequest,
    body: web::Json<RequestBody>,
    ctx: web::Data<TickdContext>,
) -> Result<HttpResponse, TickdError> {
    let user_id = protect_route(&http_req)?;

    let body = body.0;
    let usecase = CreateTaskUseCase {
        user_id,
        title: body.title,
        due_date: body.due_date,
        reminders: body.reminders,
    };

    execute(usecase, &ctx)
        .await
        .map(|(task, reminders)| HttpResponse::Created().json(APIResponse::new(task, reminders)))
        .map_err(TickdError::from)
}

#[derive(Debug)]
pub struct CreateTaskUseCase {
    pub user_id: ID,
    pub title: String,
    pub due_date: Option<i64>,
    /// Reminder presets to attach at creation, only valid together with
    /// a due date
    pub reminders: Vec<ReminderSettings>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    ReminderWithoutDueDate,
    InvalidReminder,
    StorageError,
}

impl From<UseCaseError> for TickdError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::ReminderWithoutDueDate => Self::BadClientData(
                "A relative reminder can only be attached to a task with a due date".into(),
            ),
            UseCaseError::InvalidReminder => {
                Self::BadClientData("Invalid reminder specified for the task".into())
            }
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateTaskUseCase {
    type Response = (Task, Vec<Reminder>);

    type Error = UseCaseError;

    const NAME: &'static str = "CreateTask";

    async fn execute(&mut self, ctx: &TickdContext) -> Result<Self::Response, Self::Error> {
        let due_date = match (self.due_date, self.reminders.is_empty()) {
            (None, false) => return Err(UseCaseError::ReminderWithoutDueDate),
            (due_date, _) => due_date,
        };
        for settings in &self.reminders {
            if !settings.is_valid() {
                return Err(UseCaseError::InvalidReminder);
            }
        }

        let now = ctx.sys.get_timestamp_millis();
        let task = Task::new(self.user_id.clone(), self.title.clone(), due_date, now);
        ctx.repos
            .tasks
            .insert(&task)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        let mut reminders = Vec::with_capacity(self.reminders.len());
        for settings in &self.reminders {
            // Validated above: presets require a due date
            let due_date = due_date.expect("Task due date to be present");
            let mut reminder = Reminder::new(
                task.id.clone(),
                self.user_id.clone(),
                settings.channel,
                fire_at_from_offset(due_date, settings.minutes_before),
            );
            reminder.relative_offset = Some(settings.minutes_before);
            ctx.repos
                .reminders
                .insert(&reminder)
                .await
                .map_err(|_| UseCaseError::StorageError)?;
            reminders.push(reminder);
        }

        Ok((task, reminders))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tickd_domain::{ReminderChannel, ReminderStatus};

    #[actix_web::main]
    #[test]
    async fn creates_task_without_due_date() {
        let ctx = TickdContext::create_inmemory();

        let usecase = CreateTaskUseCase {
            user_id: Default::default(),
            title: "Buy milk".into(),
            due_date: None,
            reminders: vec![],
        };

        let (task, reminders) = execute(usecase, &ctx).await.expect("To create task");
        assert_eq!(task.title, "Buy milk");
        assert!(!task.completed);
        assert!(reminders.is_empty());
        assert!(ctx.repos.tasks.find(&task.id).await.is_some());
    }

    #[actix_web::main]
    #[test]
    async fn creates_task_with_reminder_presets() {
        let ctx = TickdContext::create_inmemory();
        let due_date = 1741618800000;

        let usecase = CreateTaskUseCase {
            user_id: Default::default(),
            title: "File taxes".into(),
            due_date: Some(due_date),
            reminders: vec![
                ReminderSettings {
                    channel: ReminderChannel::InApp,
                    minutes_before: 30,
                },
                ReminderSettings {
                    channel: ReminderChannel::Email,
                    minutes_before: 1440,
                },
            ],
        };

        let (task, reminders) = execute(usecase, &ctx).await.expect("To create task");
        assert_eq!(reminders.len(), 2);
        assert_eq!(reminders[0].fire_at, due_date - 30 * 60 * 1000);
        assert_eq!(reminders[0].relative_offset, Some(30));
        assert_eq!(reminders[0].status, ReminderStatus::Pending);
        assert_eq!(reminders[1].fire_at, due_date - 1440 * 60 * 1000);
        assert_eq!(
            ctx.repos.reminders.find_by_task(&task.id).await.len(),
            2
        );
    }

    #[actix_web::main]
    #[test]
    async fn rejects_reminder_presets_without_due_date() {
        let ctx = TickdContext::create_inmemory();

        let usecase = CreateTaskUseCase {
            user_id: Default::default(),
            title: "Walk the dog".into(),
            due_date: None,
            reminders: vec![ReminderSettings {
                channel: ReminderChannel::InApp,
                minutes_before: 5,
            }],
        };

        let res = execute(usecase, &ctx).await;
        assert_eq!(res.unwrap_err(), UseCaseError::ReminderWithoutDueDate);
    }

    #[actix_web::main]
    #[test]
    async fn rejects_negative_offset() {
        let ctx = TickdContext::create_inmemory();

        let usecase = CreateTaskUseCase {
            user_id: Default::default(),
            title: "Water plants".into(),
            due_date: Some(1000),
            reminders: vec![ReminderSettings {
                channel: ReminderChannel::InApp,
                minutes_before: -5,
            }],
        };

        let res = execute(usecase, &ctx).await;
        assert_eq!(res.unwrap_err(), UseCaseError::InvalidReminder);
    }
}
