use actix_web::{web, HttpResponse};
use tickd_api_structs::get_service_health;

async fn status() -> HttpResponse {
    HttpResponse::Ok().json(get_service_health::APIResponse {
        message: "Ok!\r\n".into(),
    })
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/healthcheck", web::get().to(status));
}
