use crate::error::TickdError;
use crate::shared::{
    auth::protect_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use tickd_api_structs::get_due_reminders::*;
use tickd_domain::{Reminder, ID};
use tickd_infra::TickdContext;

pub async fn get_due_reminders_controller(
    http_req: HttpRequest,
    ctx: web::Data<TickdContext>,
) -> Result<HttpResponse, TickdError> {
    let user_id = protect_route(&http_req)?;

    let usecase = GetDueRemindersUseCase { user_id };

    execute(usecase, &ctx)
        .await
        .map(|reminders| HttpResponse::Ok().json(APIResponse::new(reminders)))
        .map_err(TickdError::from)
}

#[derive(Debug)]
pub struct GetDueRemindersUseCase {
    pub user_id: ID,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

impl From<UseCaseError> for TickdError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetDueRemindersUseCase {
    type Response = Vec<Reminder>;

    type Error = UseCaseError;

    const NAME: &'static str = "GetDueReminders";

    async fn execute(&mut self, ctx: &TickdContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.get_timestamp_millis();
        ctx.repos
            .reminders
            .find_due_by_user(&self.user_id, now)
            .await
            .map_err(|_| UseCaseError::StorageError)
    }
}
