use tracing::warn;

#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the application to run on
    pub port: usize,
    /// How often the reminder delivery job polls for due reminders
    pub reminder_poll_interval_secs: u64,
    /// How long an undelivered in-app toast stays visible before it
    /// auto-expires. Expiry only removes it from the feed, the underlying
    /// reminder is not dismissed.
    pub notification_ttl_millis: i64,
    /// Maximum number of in-app toasts kept per user
    pub notification_feed_capacity: usize,
    /// Maximum number of entries in the delivered-reminders gate
    pub delivery_gate_capacity: usize,
    /// How long a delivered-reminder entry is retained in the gate
    pub delivery_gate_window_millis: i64,
    /// Whether completing a task dismisses its non-terminal reminders
    pub dismiss_reminders_on_complete: bool,
    /// Webhook URL that PUSH reminders are posted to. When unset, PUSH
    /// delivery is logged and dropped.
    pub push_webhook_url: Option<String>,
    /// Relay URL that EMAIL reminders are posted to. When unset, EMAIL
    /// delivery is logged and dropped.
    pub email_relay_url: Option<String>,
}

fn env_parse<T: std::str::FromStr + std::fmt::Display + Copy>(var: &str, default: T) -> T {
    match std::env::var(var) {
        Ok(raw) => match raw.parse::<T>() {
            Ok(val) => val,
            Err(_) => {
                warn!(
                    "The given {}: {} is not valid, falling back to the default: {}.",
                    var, raw, default
                );
                default
            }
        },
        Err(_) => default,
    }
}

impl Config {
    pub fn new() -> Self {
        Self {
            port: env_parse("PORT", 5000),
            reminder_poll_interval_secs: env_parse("REMINDER_POLL_INTERVAL_SECS", 30),
            notification_ttl_millis: env_parse("NOTIFICATION_TTL_SECS", 300) * 1000,
            notification_feed_capacity: env_parse("NOTIFICATION_FEED_CAPACITY", 50),
            delivery_gate_capacity: env_parse("DELIVERY_GATE_CAPACITY", 2048),
            delivery_gate_window_millis: 1000 * 60 * 60 * 24, // 1 day
            dismiss_reminders_on_complete: env_parse("COMPLETE_DISMISSES_REMINDERS", true),
            push_webhook_url: std::env::var("PUSH_WEBHOOK_URL").ok(),
            email_relay_url: std::env::var("EMAIL_RELAY_URL").ok(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
