use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};

/// A `Task` is the owning entity of `Reminder`s. Only the fields the
/// reminder core needs are modelled here: reminders are meaningless
/// without a task title and due date to present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: ID,
    pub user_id: ID,
    pub title: String,
    /// Due date in millis. Relative reminders can only be attached to
    /// tasks that have one.
    pub due_date: Option<i64>,
    pub completed: bool,
    pub created: i64,
    pub updated: i64,
}

impl Task {
    pub fn new(user_id: ID, title: String, due_date: Option<i64>, now: i64) -> Self {
        Self {
            id: Default::default(),
            user_id,
            title,
            due_date,
            completed: false,
            created: now,
            updated: now,
        }
    }
}

impl Entity<ID> for Task {
    fn id(&self) -> ID {
        self.id.clone()
    }
}
