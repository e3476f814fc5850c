use crate::dtos::{ReminderDTO, TaskDTO};
use serde::{Deserialize, Serialize};
use tickd_domain::{Reminder, ReminderSettings, Task, ID};

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    pub task: TaskDTO,
    pub reminders: Vec<ReminderDTO>,
}

impl TaskResponse {
    pub fn new(task: Task, reminders: Vec<Reminder>) -> Self {
        Self {
            task: TaskDTO::new(task),
            reminders: reminders.into_iter().map(ReminderDTO::new).collect(),
        }
    }
}

pub mod create_task {
    use super::*;

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub title: String,
        pub due_date: Option<i64>,
        /// Reminder presets to attach right away. Only valid together
        /// with a due date.
        #[serde(default)]
        pub reminders: Vec<ReminderSettings>,
    }

    pub type APIResponse = TaskResponse;
}

pub mod get_task {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub task_id: ID,
    }

    pub type APIResponse = TaskResponse;
}

pub mod update_task {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub task_id: ID,
    }

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub title: Option<String>,
        pub due_date: Option<i64>,
    }

    pub type APIResponse = TaskResponse;
}

pub mod complete_task {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub task_id: ID,
    }

    pub type APIResponse = TaskResponse;
}

pub mod delete_task {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub task_id: ID,
    }

    pub type APIResponse = TaskResponse;
}
