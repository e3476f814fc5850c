use crate::error::TickdError;
use crate::shared::{
    auth::protect_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use tickd_api_structs::update_task::*;
use tickd_domain::{Reminder, Task, ID};
use tickd_infra::TickdContext;

pub async fn update_task_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<TickdContext>,
) -> Result<HttpResponse, TickdError> {
    let user_id = protect_route(&http_req)?;

    let body = body.0;
    let usecase = UpdateTaskUseCase {
        user_id,
        task_id: path_params.task_id.clone(),
        title: body.title,
        due_date: body.due_date,
    };

    execute(usecase, &ctx)
        .await
        .map(|(task, reminders)| HttpResponse::Ok().json(APIResponse::new(task, reminders)))
        .map_err(TickdError::from)
}

#[derive(Debug)]
pub struct UpdateTaskUseCase {
    pub user_id: ID,
    pub task_id: ID,
    pub title: Option<String>,
    pub due_date: Option<i64>,
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
impl UseCase for UpdateTaskUseCase {
    type Response = (Task, Vec<Reminder>);

    type Error = UseCaseError;

    const NAME: &'static str = "UpdateTask";

    async fn execute(&mut self, ctx: &TickdContext) -> Result<Self::Response, Self::Error> {
        let mut task = match ctx.repos.tasks.find(&self.task_id).await {
            Some(task) if task.user_id == self.user_id => task,
            _ => return Err(UseCaseError::NotFound(self.task_id.clone())),
        };

        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(due_date) = self.due_date {
            // Existing relative reminders keep the fire time computed at
            // their creation, they are not recalculated for the new due
            // date
            task.due_date = Some(due_date);
        }
        task.updated = ctx.sys.get_timestamp_millis();

        ctx.repos
            .tasks
            .save(&task)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        let reminders = ctx.repos.reminders.find_by_task(&task.id).await;
        Ok((task, reminders))
    }
}
