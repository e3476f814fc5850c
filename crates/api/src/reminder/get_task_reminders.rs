use crate::error::TickdError;
use crate::shared::{
    auth::protect_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use tickd_api_structs::get_task_reminders::*;
use tickd_domain::{Reminder, ID};
use tickd_infra::TickdContext;

pub async fn get_task_reminders_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<TickdContext>,
) -> Result<HttpResponse, TickdError> {
    let user_id = protect_route(&http_req)?;

    let usecase = GetTaskRemindersUseCase {
        user_id,
        task_id: path_params.task_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|reminders| HttpResponse::Ok().json(APIResponse::new(reminders)))
        .map_err(TickdError::from)
}

#[derive(Debug)]
pub struct GetTaskRemindersUseCase {
    pub user_id: ID,
    pub task_id: ID,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    TaskNotFound(ID),
}

impl From<UseCaseError> for TickdError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::TaskNotFound(task_id) => {
                Self::NotFound(format!("The task with id: {}, was not found.", task_id))
            }
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetTaskRemindersUseCase {
    type Response = Vec<Reminder>;

    type Error = UseCaseError;

    const NAME: &'static str = "GetTaskReminders";

    async fn execute(&mut self, ctx: &TickdContext) -> Result<Self::Response, Self::Error> {
        match ctx.repos.tasks.find(&self.task_id).await {
            Some(task) if task.user_id == self.user_id => {}
            _ => return Err(UseCaseError::TaskNotFound(self.task_id.clone())),
        };

        Ok(ctx.repos.reminders.find_by_task(&self.task_id).await)
    }
}
