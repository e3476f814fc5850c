use serde::{Deserialize, Serialize};
use tickd_domain::{Task, ID};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskDTO {
    pub id: ID,
    pub user_id: ID,
    pub title: String,
    pub due_date: Option<i64>,
    pub completed: bool,
    pub created: i64,
    pub updated: i64,
}

impl TaskDTO {
    pub fn new(task: Task) -> Self {
        Self {
            id: task.id,
            user_id: task.user_id,
            title: task.title,
            due_date: task.due_date,
            completed: task.completed,
            created: task.created,
            updated: task.updated,
        }
    }
}
