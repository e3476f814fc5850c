use super::subscribers::RemoveToastOnReminderResolved;
use crate::error::TickdError;
use crate::shared::{
    auth::protect_route,
    usecase::{execute, Subscriber, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use tickd_api_structs::snooze_reminder::*;
use tickd_domain::{Reminder, ReminderStateError, ID, SNOOZE_PRESETS_MINUTES};
use tickd_infra::TickdContext;

pub async fn snooze_reminder_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<TickdContext>,
) -> Result<HttpResponse, TickdError> {
    let user_id = protect_route(&http_req)?;

    let body = body.0;
    let usecase = SnoozeReminderUseCase {
        user_id,
        reminder_id: path_params.reminder_id.clone(),
        minutes: body.minutes,
        until: body.until,
    };

    execute(usecase, &ctx)
        .await
        .map(|reminder| HttpResponse::Ok().json(APIResponse::new(reminder)))
        .map_err(TickdError::from)
}

#[derive(Debug)]
pub struct SnoozeReminderUseCase {
    pub user_id: ID,
    pub reminder_id: ID,
    /// Quick snooze by preset duration
    pub minutes: Option<i64>,
    /// Arbitrary deferral to an absolute time
    pub until: Option<i64>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
    InvalidSchedule(String),
    InvalidState(ReminderStateError),
}

impl From<UseCaseError> for TickdError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(reminder_id) => Self::NotFound(format!(
                "The reminder with id: {}, was not found.",
                reminder_id
            )),
            UseCaseError::InvalidSchedule(msg) => Self::BadClientData(msg),
            UseCaseError::InvalidState(e) => Self::BadClientData(e.to_string()),
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for SnoozeReminderUseCase {
    type Response = Reminder;

    type Error = UseCaseError;

    const NAME: &'static str = "SnoozeReminder";

    async fn execute(&mut self, ctx: &TickdContext) -> Result<Self::Response, Self::Error> {
        let reminder = match ctx.repos.reminders.find(&self.reminder_id).await {
            Some(reminder) if reminder.user_id == self.user_id => reminder,
            _ => return Err(UseCaseError::NotFound(self.reminder_id.clone())),
        };

        let now = ctx.sys.get_timestamp_millis();
        let until = match (self.minutes, self.until) {
            (Some(minutes), None) => {
                if !SNOOZE_PRESETS_MINUTES.contains(&minutes) {
                    return Err(UseCaseError::InvalidSchedule(format!(
                        "The snooze duration: {} minutes is not one of the presets: {:?}",
                        minutes, SNOOZE_PRESETS_MINUTES
                    )));
                }
                now + minutes * 60 * 1000
            }
            (None, Some(until)) => until,
            _ => {
                return Err(UseCaseError::InvalidSchedule(
                    "Exactly one of minutes and until must be specified".into(),
                ))
            }
        };

        // Validate the transition on a copy first so that a dismissed
        // reminder or a past snooze time gets a precise error instead of
        // the generic conditional-write failure below. A past snooze time
        // is a scheduling error, only dismissal is a state error.
        let mut validated = reminder.clone();
        validated.snooze(until, now).map_err(|e| match e {
            ReminderStateError::SnoozeTimeNotInFuture(_) => {
                UseCaseError::InvalidSchedule(e.to_string())
            }
            ReminderStateError::AlreadyDismissed => UseCaseError::InvalidState(e),
        })?;

        ctx.repos
            .reminders
            .snooze(&self.reminder_id, until)
            .await
            // The conditional write only loses to a concurrent dismissal
            .ok_or(UseCaseError::InvalidState(
                ReminderStateError::AlreadyDismissed,
            ))
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(RemoveToastOnReminderResolved)]
    }
}
