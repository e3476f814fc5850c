use super::ReminderNotification;
use tracing::debug;

/// An out-of-process delivery target for reminder notifications
#[async_trait::async_trait]
pub trait NotificationSink: Send + Sync {
    async fn deliver(&self, notification: &ReminderNotification) -> anyhow::Result<()>;
}

/// Posts PUSH reminders to the configured webhook. An unconfigured sink
/// drops deliveries, push is best-effort.
pub struct WebhookSink {
    url: Option<String>,
    client: reqwest::Client,
}

impl WebhookSink {
    pub fn new(url: Option<String>) -> Self {
        Self {
            url,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait::async_trait]
impl NotificationSink for WebhookSink {
    async fn deliver(&self, notification: &ReminderNotification) -> anyhow::Result<()> {
        let url = match &self.url {
            Some(url) => url,
            None => {
                debug!(
                    "No push webhook configured, dropping reminder: {}",
                    notification.reminder_id
                );
                return Ok(());
            }
        };
        self.client
            .post(url)
            .json(notification)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

/// Posts EMAIL reminders to the configured mail relay. An unconfigured
/// sink drops deliveries.
pub struct EmailRelaySink {
    url: Option<String>,
    client: reqwest::Client,
}

impl EmailRelaySink {
    pub fn new(url: Option<String>) -> Self {
        Self {
            url,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait::async_trait]
impl NotificationSink for EmailRelaySink {
    async fn deliver(&self, notification: &ReminderNotification) -> anyhow::Result<()> {
        let url = match &self.url {
            Some(url) => url,
            None => {
                debug!(
                    "No email relay configured, dropping reminder: {}",
                    notification.reminder_id
                );
                return Ok(());
            }
        };
        self.client
            .post(url)
            .json(notification)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
