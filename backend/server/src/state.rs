use std::sync::Arc;

use super::{
    config::Config,
    database::{RecordStore, RedisStore, init_redis},
    error::StartupError,
    mail::{Notifier, SmtpNotifier},
};

pub struct State {
    pub port: u16,
    pub store: Arc<dyn RecordStore>,
    pub notifier: Arc<dyn Notifier>,
}

impl State {
    pub async fn new() -> Result<Arc<Self>, StartupError> {
        let config = Config::load()?;

        let redis_connection = init_redis(&config.redis_url).await?;
        let notifier = SmtpNotifier::new(&config)?;

        Ok(Self::with_clients(
            config.port,
            Arc::new(RedisStore::new(redis_connection)),
            Arc::new(notifier),
        ))
    }

    pub fn with_clients(
        port: u16,
        store: Arc<dyn RecordStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Arc<Self> {
        Arc::new(Self {
            port,
            store,
            notifier,
        })
    }
}
