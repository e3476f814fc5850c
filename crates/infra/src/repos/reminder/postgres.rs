use super::IReminderRepo;
use crate::repos::shared::repo::DeleteResult;
use sqlx::{types::Uuid, FromRow, PgPool};
use tickd_domain::{Reminder, ID};
use tracing::error;

pub struct PostgresReminderRepo {
    pool: PgPool,
}

impl PostgresReminderRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ReminderRaw {
    reminder_uid: Uuid,
    task_uid: Uuid,
    user_uid: Uuid,
    channel: String,
    fire_at: i64,
    relative_offset: Option<i64>,
    status: String,
    snoozed_until: Option<i64>,
    snooze_count: i64,
    sent_at: Option<i64>,
    dismissed_at: Option<i64>,
}

impl From<ReminderRaw> for Reminder {
    fn from(raw: ReminderRaw) -> Self {
        Self {
            id: raw.reminder_uid.into(),
            task_id: raw.task_uid.into(),
            user_id: raw.user_uid.into(),
            channel: raw
                .channel
                .parse()
                .expect("Reminder channel from database to be valid"),
            fire_at: raw.fire_at,
            relative_offset: raw.relative_offset,
            status: raw
                .status
                .parse()
                .expect("Reminder status from database to be valid"),
            snoozed_until: raw.snoozed_until,
            snooze_count: raw.snooze_count,
            sent_at: raw.sent_at,
            dismissed_at: raw.dismissed_at,
        }
    }
}

#[async_trait::async_trait]
impl IReminderRepo for PostgresReminderRepo {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO reminders
            (reminder_uid, task_uid, user_uid, channel, fire_at, relative_offset,
             status, snoozed_until, snooze_count, sent_at, dismissed_at)
            VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(reminder.id.inner_ref())
        .bind(reminder.task_id.inner_ref())
        .bind(reminder.user_id.inner_ref())
        .bind(reminder.channel.as_str())
        .bind(reminder.fire_at)
        .bind(reminder.relative_offset)
        .bind(reminder.status.as_str())
        .bind(reminder.snoozed_until)
        .bind(reminder.snooze_count)
        .bind(reminder.sent_at)
        .bind(reminder.dismissed_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find(&self, reminder_id: &ID) -> Option<Reminder> {
        sqlx::query_as::<_, ReminderRaw>(
            r#"
            SELECT * FROM reminders
            WHERE reminder_uid = $1
            "#,
        )
        .bind(reminder_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_default()
        .map(|reminder| reminder.into())
    }

    async fn find_by_task(&self, task_id: &ID) -> Vec<Reminder> {
        sqlx::query_as::<_, ReminderRaw>(
            r#"
            SELECT * FROM reminders
            WHERE task_uid = $1
            ORDER BY fire_at
            "#,
        )
        .bind(task_id.inner_ref())
        .fetch_all(&self.pool)
        .await
        .unwrap_or_default()
        .into_iter()
        .map(|reminder| reminder.into())
        .collect()
    }

    async fn find_due_before(&self, before: i64) -> anyhow::Result<Vec<Reminder>> {
        let reminders = sqlx::query_as::<_, ReminderRaw>(
            r#"
            SELECT * FROM reminders
            WHERE status IN ('PENDING', 'SNOOZED')
            AND COALESCE(snoozed_until, fire_at) <= $1
            ORDER BY COALESCE(snoozed_until, fire_at)
            "#,
        )
        .bind(before)
        .fetch_all(&self.pool)
        .await?;
        Ok(reminders.into_iter().map(|reminder| reminder.into()).collect())
    }

    async fn find_due_by_user(&self, user_id: &ID, before: i64) -> anyhow::Result<Vec<Reminder>> {
        let reminders = sqlx::query_as::<_, ReminderRaw>(
            r#"
            SELECT * FROM reminders
            WHERE user_uid = $1
            AND status IN ('PENDING', 'SNOOZED')
            AND COALESCE(snoozed_until, fire_at) <= $2
            ORDER BY COALESCE(snoozed_until, fire_at)
            "#,
        )
        .bind(user_id.inner_ref())
        .bind(before)
        .fetch_all(&self.pool)
        .await?;
        Ok(reminders.into_iter().map(|reminder| reminder.into()).collect())
    }

    async fn mark_sent(&self, reminder_id: &ID, now: i64) -> Option<Reminder> {
        match sqlx::query_as::<_, ReminderRaw>(
            r#"
            UPDATE reminders
            SET status = 'SENT',
                sent_at = $2,
                snoozed_until = NULL
            WHERE reminder_uid = $1
            AND status IN ('PENDING', 'SNOOZED')
            RETURNING *
            "#,
        )
        .bind(reminder_id.inner_ref())
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        {
            Ok(reminder) => reminder.map(|reminder| reminder.into()),
            Err(e) => {
                error!(
                    "Unable to mark reminder: {:?} as sent. Error: {:?}",
                    reminder_id, e
                );
                None
            }
        }
    }

    async fn snooze(&self, reminder_id: &ID, until: i64) -> Option<Reminder> {
        match sqlx::query_as::<_, ReminderRaw>(
            r#"
            UPDATE reminders
            SET status = 'SNOOZED',
                snoozed_until = $2,
                snooze_count = snooze_count + 1
            WHERE reminder_uid = $1
            AND status != 'DISMISSED'
            RETURNING *
            "#,
        )
        .bind(reminder_id.inner_ref())
        .bind(until)
        .fetch_optional(&self.pool)
        .await
        {
            Ok(reminder) => reminder.map(|reminder| reminder.into()),
            Err(e) => {
                error!(
                    "Unable to snooze reminder: {:?}. Error: {:?}",
                    reminder_id, e
                );
                None
            }
        }
    }

    async fn dismiss(&self, reminder_id: &ID, now: i64) -> Option<Reminder> {
        match sqlx::query_as::<_, ReminderRaw>(
            r#"
            UPDATE reminders
            SET status = 'DISMISSED',
                dismissed_at = $2,
                snoozed_until = NULL
            WHERE reminder_uid = $1
            AND status != 'DISMISSED'
            RETURNING *
            "#,
        )
        .bind(reminder_id.inner_ref())
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        {
            Ok(reminder) => reminder.map(|reminder| reminder.into()),
            Err(e) => {
                error!(
                    "Unable to dismiss reminder: {:?}. Error: {:?}",
                    reminder_id, e
                );
                None
            }
        }
    }

    async fn dismiss_by_task(&self, task_id: &ID, now: i64) -> anyhow::Result<Vec<Reminder>> {
        let reminders = sqlx::query_as::<_, ReminderRaw>(
            r#"
            UPDATE reminders
            SET status = 'DISMISSED',
                dismissed_at = $2,
                snoozed_until = NULL
            WHERE task_uid = $1
            AND status != 'DISMISSED'
            RETURNING *
            "#,
        )
        .bind(task_id.inner_ref())
        .bind(now)
        .fetch_all(&self.pool)
        .await?;
        Ok(reminders.into_iter().map(|reminder| reminder.into()).collect())
    }

    async fn delete(&self, reminder_id: &ID) -> Option<Reminder> {
        match sqlx::query_as::<_, ReminderRaw>(
            r#"
            DELETE FROM reminders
            WHERE reminder_uid = $1
            RETURNING *
            "#,
        )
        .bind(reminder_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        {
            Ok(reminder) => reminder.map(|reminder| reminder.into()),
            Err(e) => {
                error!(
                    "Unable to delete reminder: {:?}. Error: {:?}",
                    reminder_id, e
                );
                None
            }
        }
    }

    async fn delete_by_task(&self, task_id: &ID) -> anyhow::Result<DeleteResult> {
        let res = sqlx::query(
            r#"
            DELETE FROM reminders
            WHERE task_uid = $1
            "#,
        )
        .bind(task_id.inner_ref())
        .execute(&self.pool)
        .await?;
        Ok(DeleteResult {
            deleted_count: res.rows_affected() as i64,
        })
    }
}
