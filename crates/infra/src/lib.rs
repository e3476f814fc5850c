mod config;
mod repos;
mod services;
mod system;

pub use config::Config;
pub use repos::{DeleteResult, IReminderRepo, ITaskRepo, Repos};
pub use services::*;
use sqlx::migrate::MigrateError;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
pub use system::ISys;
use system::WallClockSys;

#[derive(Clone)]
pub struct TickdContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub notifier: Arc<Notifier>,
    pub delivery_gate: Arc<DeliveryGate>,
}

struct ContextParams {
    pub postgres_connection_string: String,
}

impl TickdContext {
    async fn create(params: ContextParams) -> Self {
        let repos = Repos::create_postgres(&params.postgres_connection_string)
            .await
            .expect("Postgres credentials must be set and valid");
        let config = Config::new();
        let notifier = create_notifier(&config);
        let delivery_gate = create_delivery_gate(&config);
        Self {
            repos,
            config,
            sys: Arc::new(WallClockSys),
            notifier,
            delivery_gate,
        }
    }

    pub fn create_inmemory() -> Self {
        let config = Config::new();
        let notifier = create_notifier(&config);
        let delivery_gate = create_delivery_gate(&config);
        Self {
            repos: Repos::create_inmemory(),
            config,
            sys: Arc::new(WallClockSys),
            notifier,
            delivery_gate,
        }
    }
}

fn create_notifier(config: &Config) -> Arc<Notifier> {
    Arc::new(Notifier::new(
        NotificationFeed::new(
            config.notification_feed_capacity,
            config.notification_ttl_millis,
        ),
        Arc::new(WebhookSink::new(config.push_webhook_url.clone())),
        Arc::new(EmailRelaySink::new(config.email_relay_url.clone())),
    ))
}

fn create_delivery_gate(config: &Config) -> Arc<DeliveryGate> {
    Arc::new(DeliveryGate::new(
        config.delivery_gate_capacity,
        config.delivery_gate_window_millis,
    ))
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> TickdContext {
    TickdContext::create(ContextParams {
        postgres_connection_string: get_psql_connection_string(),
    })
    .await
}

fn get_psql_connection_string() -> String {
    const PSQL_CONNECTION_STRING: &str = "DATABASE_URL";

    std::env::var(PSQL_CONNECTION_STRING)
        .unwrap_or_else(|_| panic!("{} env var to be present.", PSQL_CONNECTION_STRING))
}

pub async fn run_migration() -> Result<(), MigrateError> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&get_psql_connection_string())
        .await
        .expect("TO CONNECT TO POSTGRES");

    sqlx::migrate!().run(&pool).await
}
