use super::subscribers::DeleteRemindersOnTaskDeleted;
use crate::error::TickdError;
use crate::shared::{
    auth::protect_route,
    usecase::{execute, Subscriber, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use tickd_api_structs::delete_task::*;
use tickd_domain::{Reminder, Task, ID};
use tickd_infra::TickdContext;

pub async fn delete_task_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<TickdContext>,
) -> Result<HttpResponse, TickdError> {
    let user_id = protect_route(&http_req)?;

    let usecase = DeleteTaskUseCase {
        user_id,
        task_id: path_params.task_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|(task, reminders)| HttpResponse::Ok().json(APIResponse::new(task, reminders)))
        .map_err(TickdError::from)
}

#[derive(Debug)]
pub struct DeleteTaskUseCase {
    pub user_id: ID,
    pub task_id: ID,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
}

impl From<UseCaseError> for TickdError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(task_id) => {
                Self::NotFound(format!("The task with id: {}, was not found.", task_id))
            }
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for DeleteTaskUseCase {
    type Response = (Task, Vec<Reminder>);

    type Error = UseCaseError;

    const NAME: &'static str = "DeleteTask";

    async fn execute(&mut self, ctx: &TickdContext) -> Result<Self::Response, Self::Error> {
        let task = match ctx.repos.tasks.find(&self.task_id).await {
            Some(task) if task.user_id == self.user_id => task,
            _ => return Err(UseCaseError::NotFound(self.task_id.clone())),
        };

        let reminders = ctx.repos.reminders.find_by_task(&task.id).await;
        ctx.repos
            .tasks
            .delete(&task.id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.task_id.clone()))?;

        Ok((task, reminders))
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(DeleteRemindersOnTaskDeleted)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tickd_domain::ReminderChannel;

    #[actix_web::main]
    #[test]
    async fn deleting_task_also_deletes_reminders() {
        let ctx = TickdContext::create_inmemory();
        let user_id = ID::default();
        let task = Task::new(user_id.clone(), "Old task".into(), Some(1000), 0);
        ctx.repos.tasks.insert(&task).await.unwrap();
        let reminder = Reminder::new(
            task.id.clone(),
            user_id.clone(),
            ReminderChannel::InApp,
            1000,
        );
        ctx.repos.reminders.insert(&reminder).await.unwrap();

        let usecase = DeleteTaskUseCase {
            user_id,
            task_id: task.id.clone(),
        };
        let (_, reminders) = execute(usecase, &ctx).await.expect("To delete task");
        assert_eq!(reminders.len(), 1);

        assert!(ctx.repos.tasks.find(&task.id).await.is_none());
        assert!(ctx.repos.reminders.find_by_task(&task.id).await.is_empty());
        assert!(ctx.repos.reminders.find(&reminder.id).await.is_none());
    }
}
