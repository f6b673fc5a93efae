use std::sync::Arc;

use tracing::info;

use crate::ai::{AiGateway, ModelGateway, OfflineModel};
use crate::clock::{Clock, SystemClock};
use crate::config::{AppConfig, StoreConfig};
use crate::storage::{FsStore, KvStore, MemoryStore, S3Store};

/// Everything the controller needs from the outside world.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn KvStore>,
    pub gateway: Arc<dyn AiGateway>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let store: Arc<dyn KvStore> = match &config.store {
            StoreConfig::Memory => Arc::new(MemoryStore::new()),
            StoreConfig::Fs { dir } => Arc::new(FsStore::new(dir).await?),
            StoreConfig::S3(s3) => Arc::new(
                S3Store::new(
                    &s3.endpoint,
                    &s3.bucket,
                    &s3.access_key,
                    &s3.secret_key,
                    &s3.region,
                )
                .await?,
            ),
        };
        info!(backend = config.store.backend(), model = %config.ai_model, "state initialised");

        let gateway = Arc::new(ModelGateway::new(OfflineModel, config.ai_model.clone())) as Arc<dyn AiGateway>;

        Ok(Self {
            config,
            store,
            gateway,
            clock: Arc::new(SystemClock),
        })
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        store: Arc<dyn KvStore>,
        gateway: Arc<dyn AiGateway>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            config,
            store,
            gateway,
            clock,
        }
    }

    #[cfg(test)]
    pub fn fake(store: MemoryStore, gateway: Arc<dyn AiGateway>) -> Self {
        let config = Arc::new(AppConfig {
            store: StoreConfig::Memory,
            default_language: crate::profile::Language::PtPt,
            ai_model: "test-model".into(),
        });
        Self::from_parts(config, Arc::new(store), gateway, crate::testing::fixed_clock())
    }
}
