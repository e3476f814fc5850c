use crate::dtos::NotificationDTO;
use serde::{Deserialize, Serialize};

pub mod get_notifications {
    use super::*;

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub notifications: Vec<NotificationDTO>,
    }
}
