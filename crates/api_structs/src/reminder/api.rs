use crate::dtos::ReminderDTO;
use serde::{Deserialize, Serialize};
use tickd_domain::{Reminder, ReminderChannel, ID};

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderResponse {
    pub reminder: ReminderDTO,
}

impl ReminderResponse {
    pub fn new(reminder: Reminder) -> Self {
        Self {
            reminder: ReminderDTO::new(reminder),
        }
    }
}

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemindersResponse {
    pub reminders: Vec<ReminderDTO>,
}

impl RemindersResponse {
    pub fn new(reminders: Vec<Reminder>) -> Self {
        Self {
            reminders: reminders.into_iter().map(ReminderDTO::new).collect(),
        }
    }
}

pub mod create_reminder {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub task_id: ID,
    }

    /// Exactly one of `fire_at` and `relative_offset` must be given
    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        #[serde(rename = "type")]
        pub reminder_type: ReminderChannel,
        pub fire_at: Option<i64>,
        pub relative_offset: Option<i64>,
    }

    pub type APIResponse = ReminderResponse;
}

pub mod get_task_reminders {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub task_id: ID,
    }

    pub type APIResponse = RemindersResponse;
}

pub mod get_due_reminders {
    use super::*;

    pub type APIResponse = RemindersResponse;
}

pub mod snooze_reminder {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub reminder_id: ID,
    }

    /// Either a preset number of `minutes` or an absolute `until` time
    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub minutes: Option<i64>,
        pub until: Option<i64>,
    }

    pub type APIResponse = ReminderResponse;
}

pub mod dismiss_reminder {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub reminder_id: ID,
    }

    pub type APIResponse = ReminderResponse;
}

pub mod delete_reminder {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub reminder_id: ID,
    }

    pub type APIResponse = ReminderResponse;
}
