use serde::{Deserialize, Serialize};
use tickd_domain::{ReminderChannel, ID};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NotificationDTO {
    pub reminder_id: ID,
    pub task_id: ID,
    #[serde(rename = "type")]
    pub channel: ReminderChannel,
    pub task_title: String,
    pub due_date: Option<i64>,
    pub fired_at: i64,
    pub delivered_at: i64,
}
