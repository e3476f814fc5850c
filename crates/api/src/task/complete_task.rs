use super::subscribers::RemoveToastsOnTaskCompleted;
use crate::error::TickdError;
use crate::shared::{
    auth::protect_route,
    usecase::{execute, Subscriber, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use tickd_api_structs::complete_task::*;
use tickd_domain::{Reminder, Task, ID};
use tickd_infra::TickdContext;

pub async fn complete_task_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<TickdContext>,
) -> Result<HttpResponse, TickdError> {
    let user_id = protect_route(&http_req)?;

    let usecase = CompleteTaskUseCase {
        user_id,
        task_id: path_params.task_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|(task, reminders)| HttpResponse::Ok().json(APIResponse::new(task, reminders)))
        .map_err(TickdError::from)
}

#[derive(Debug)]
pub struct CompleteTaskUseCase {
    pub user_id: ID,
    pub task_id: ID,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
    StorageError,
}

impl From<UseCaseError> for TickdError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(task_id) => {
                Self::NotFound(format!("The task with id: {}, was not found.", task_id))
            }
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CompleteTaskUseCase {
    type Response = (Task, Vec<Reminder>);

    type Error = UseCaseError;

    const NAME: &'static str = "CompleteTask";

    async fn execute(&mut self, ctx: &TickdContext) -> Result<Self::Response, Self::Error> {
        let mut task = match ctx.repos.tasks.find(&self.task_id).await {
            Some(task) if task.user_id == self.user_id => task,
            _ => return Err(UseCaseError::NotFound(self.task_id.clone())),
        };

        let now = ctx.sys.get_timestamp_millis();
        task.completed = true;
        task.updated = now;
        ctx.repos
            .tasks
            .save(&task)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        if ctx.config.dismiss_reminders_on_complete {
            ctx.repos
                .reminders
                .dismiss_by_task(&task.id, now)
                .await
                .map_err(|_| UseCaseError::StorageError)?;
        }

        let reminders = ctx.repos.reminders.find_by_task(&task.id).await;
        Ok((task, reminders))
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(RemoveToastsOnTaskCompleted)]
    }
}
