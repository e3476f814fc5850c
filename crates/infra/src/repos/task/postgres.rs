use super::ITaskRepo;
use sqlx::{types::Uuid, FromRow, PgPool};
use tickd_domain::{Task, ID};
use tracing::error;

pub struct PostgresTaskRepo {
    pool: PgPool,
}

impl PostgresTaskRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct TaskRaw {
    task_uid: Uuid,
    user_uid: Uuid,
    title: String,
    due_date: Option<i64>,
    completed: bool,
    created: i64,
    updated: i64,
}

impl From<TaskRaw> for Task {
    fn from(raw: TaskRaw) -> Self {
        Self {
            id: raw.task_uid.into(),
            user_id: raw.user_uid.into(),
            title: raw.title,
            due_date: raw.due_date,
            completed: raw.completed,
            created: raw.created,
            updated: raw.updated,
        }
    }
}

#[async_trait::async_trait]
impl ITaskRepo for PostgresTaskRepo {
    async fn insert(&self, task: &Task) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO tasks
            (task_uid, user_uid, title, due_date, completed, created, updated)
            VALUES($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(task.id.inner_ref())
        .bind(task.user_id.inner_ref())
        .bind(&task.title)
        .bind(task.due_date)
        .bind(task.completed)
        .bind(task.created)
        .bind(task.updated)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn save(&self, task: &Task) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE tasks
            SET title = $2,
                due_date = $3,
                completed = $4,
                updated = $5
            WHERE task_uid = $1
            "#,
        )
        .bind(task.id.inner_ref())
        .bind(&task.title)
        .bind(task.due_date)
        .bind(task.completed)
        .bind(task.updated)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find(&self, task_id: &ID) -> Option<Task> {
        sqlx::query_as::<_, TaskRaw>(
            r#"
            SELECT * FROM tasks
            WHERE task_uid = $1
            "#,
        )
        .bind(task_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_default()
        .map(|task| task.into())
    }

    async fn find_many(&self, task_ids: &[ID]) -> anyhow::Result<Vec<Task>> {
        let ids = task_ids
            .iter()
            .map(|id| *id.inner_ref())
            .collect::<Vec<_>>();
        let tasks = sqlx::query_as::<_, TaskRaw>(
            r#"
            SELECT * FROM tasks
            WHERE task_uid = ANY($1)
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(tasks.into_iter().map(|task| task.into()).collect())
    }

    async fn delete(&self, task_id: &ID) -> Option<Task> {
        match sqlx::query_as::<_, TaskRaw>(
            r#"
            DELETE FROM tasks
            WHERE task_uid = $1
            RETURNING *
            "#,
        )
        .bind(task_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        {
            Ok(task) => task.map(|task| task.into()),
            Err(e) => {
                error!("Unable to delete task: {:?}. Error: {:?}", task_id, e);
                None
            }
        }
    }
}
