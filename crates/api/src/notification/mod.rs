use crate::error::TickdError;
use crate::shared::auth::protect_route;
use actix_web::{web, HttpRequest, HttpResponse};
use tickd_api_structs::dtos::NotificationDTO;
use tickd_api_structs::get_notifications;
use tickd_infra::TickdContext;

/// Thin read over the in-process feed, no usecase needed
async fn get_notifications_controller(
    http_req: HttpRequest,
    ctx: web::Data<TickdContext>,
) -> Result<HttpResponse, TickdError> {
    let user_id = protect_route(&http_req)?;

    let now = ctx.sys.get_timestamp_millis();
    let notifications = ctx
        .notifier
        .feed
        .list(&user_id, now)
        .into_iter()
        .map(|n| NotificationDTO {
            reminder_id: n.reminder_id,
            task_id: n.task_id,
            channel: n.channel,
            task_title: n.task_title,
            due_date: n.due_date,
            fired_at: n.fired_at,
            delivered_at: n.delivered_at,
        })
        .collect();

    Ok(HttpResponse::Ok().json(get_notifications::APIResponse { notifications }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/notifications",
        web::get().to(get_notifications_controller),
    );
}
