mod inmemory;
mod postgres;

pub use inmemory::InMemoryTaskRepo;
pub use postgres::PostgresTaskRepo;
use tickd_domain::{Task, ID};

#[async_trait::async_trait]
pub trait ITaskRepo: Send + Sync {
    async fn insert(&self, task: &Task) -> anyhow::Result<()>;
    async fn save(&self, task: &Task) -> anyhow::Result<()>;
    async fn find(&self, task_id: &ID) -> Option<Task>;
    async fn find_many(&self, task_ids: &[ID]) -> anyhow::Result<Vec<Task>>;
    /// Deleting a task cascades to its reminders in the postgres backend.
    /// The inmemory backend relies on the caller deleting reminders
    /// explicitly through `IReminderRepo::delete_by_task`.
    async fn delete(&self, task_id: &ID) -> Option<Task>;
}
