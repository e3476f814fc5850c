use super::ITaskRepo;
use crate::repos::shared::inmemory_repo::*;
use tickd_domain::{Task, ID};

pub struct InMemoryTaskRepo {
    tasks: std::sync::Mutex<Vec<Task>>,
}

impl InMemoryTaskRepo {
    pub fn new() -> Self {
        Self {
            tasks: std::sync::Mutex::new(vec![]),
        }
    }
}

#[async_trait::async_trait]
impl ITaskRepo for InMemoryTaskRepo {
    async fn insert(&self, task: &Task) -> anyhow::Result<()> {
        insert(task, &self.tasks);
        Ok(())
    }

    async fn save(&self, task: &Task) -> anyhow::Result<()> {
        save(task, &self.tasks);
        Ok(())
    }

    async fn find(&self, task_id: &ID) -> Option<Task> {
        find(task_id, &self.tasks)
    }

    async fn find_many(&self, task_ids: &[ID]) -> anyhow::Result<Vec<Task>> {
        Ok(find_by(&self.tasks, |t| task_ids.contains(&t.id)))
    }

    async fn delete(&self, task_id: &ID) -> Option<Task> {
        delete(task_id, &self.tasks)
    }
}
