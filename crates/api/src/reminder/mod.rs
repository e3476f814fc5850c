mod create_reminder;
pub mod deliver_due_reminders;
mod delete_reminder;
mod dismiss_reminder;
mod get_due_reminders;
mod get_task_reminders;
mod snooze_reminder;
mod subscribers;

use actix_web::web;
use create_reminder::create_reminder_controller;
use delete_reminder::delete_reminder_controller;
use dismiss_reminder::dismiss_reminder_controller;
use get_due_reminders::get_due_reminders_controller;
use get_task_reminders::get_task_reminders_controller;
use snooze_reminder::snooze_reminder_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/tasks/{task_id}/reminders",
        web::post().to(create_reminder_controller),
    );
    cfg.route(
        "/tasks/{task_id}/reminders",
        web::get().to(get_task_reminders_controller),
    );
    cfg.route(
        "/reminders/due",
        web::get().to(get_due_reminders_controller),
    );
    cfg.route(
        "/reminders/{reminder_id}/snooze",
        web::post().to(snooze_reminder_controller),
    );
    cfg.route(
        "/reminders/{reminder_id}/dismiss",
        web::post().to(dismiss_reminder_controller),
    );
    cfg.route(
        "/reminders/{reminder_id}",
        web::delete().to(delete_reminder_controller),
    );
}
