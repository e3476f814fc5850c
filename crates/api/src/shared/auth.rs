use crate::error::TickdError;
use actix_web::HttpRequest;
use tickd_domain::ID;

/// Header carrying the id of the user a request acts on behalf of.
/// Session handling proper lives in front of this service; this guard
/// only establishes the ownership scope every query is bound to.
pub const TICKD_USER_ID_HEADER: &str = "tickd-user-id";

pub fn protect_route(http_req: &HttpRequest) -> Result<ID, TickdError> {
    let header = http_req
        .headers()
        .get(TICKD_USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| {
            TickdError::Unauthorized(format!(
                "Missing or malformed `{}` header",
                TICKD_USER_ID_HEADER
            ))
        })?;

    header
        .parse()
        .map_err(|_| TickdError::Unauthorized(format!("Malformed user id: {}", header)))
}
