// bookstore/src/state.rs

use crate::config::{AppConfig, PaymentProvider, StoreBackend};
use crate::errors::{AppError, Result};
use crate::gateway::{MockGateway, PaymentGateway, StripeGateway};
use crate::pipelines;
use crate::store::{MemoryShopStore, PgShopStore, ShopStore};
use shopflow::FlowRegistry;
use std::sync::Arc;
use tracing::{info, warn};

/// Shared by every worker and copied into each pipeline context.
#[derive(Clone)]
pub struct AppState {
  pub store: Arc<dyn ShopStore>,
  pub gateway: Arc<dyn PaymentGateway>,
  pub flows: Arc<FlowRegistry<AppError>>,
  pub config: Arc<AppConfig>,
}

impl AppState {
  /// Builds the state and registers every pipeline.
  pub fn new(config: Arc<AppConfig>, store: Arc<dyn ShopStore>, gateway: Arc<dyn PaymentGateway>) -> Self {
    let flows = Arc::new(FlowRegistry::<AppError>::new());
    pipelines::register_all_pipelines(&flows);
    Self {
      store,
      gateway,
      flows,
      config,
    }
  }

  /// Connects the configured store and gateway. The memory store is always
  /// seeded; Postgres only when `SEED_DB` is set.
  pub async fn from_config(config: Arc<AppConfig>) -> Result<Self> {
    let store: Arc<dyn ShopStore> = match config.store_backend {
      StoreBackend::Postgres => {
        let url = config
          .database_url
          .as_deref()
          .ok_or_else(|| AppError::Config("DATABASE_URL is not set".to_string()))?;
        Arc::new(PgShopStore::connect(url).await?)
      }
      StoreBackend::Memory => {
        warn!("Using the in-memory store; nothing survives a restart.");
        Arc::new(MemoryShopStore::new())
      }
    };
    if config.seed_db || config.store_backend == StoreBackend::Memory {
      store.seed_catalog().await?;
    }

    let gateway: Arc<dyn PaymentGateway> = match config.payment_provider {
      PaymentProvider::Stripe => {
        let key = config
          .stripe_secret_key
          .clone()
          .ok_or_else(|| AppError::Config("STRIPE_SECRET_KEY is not set".to_string()))?;
        Arc::new(StripeGateway::new(key, config.stripe_api_base.clone()))
      }
      PaymentProvider::Mock => Arc::new(MockGateway::new()),
    };
    info!(store = ?config.store_backend, gateway = ?config.payment_provider, "Application state ready.");

    Ok(Self::new(config, store, gateway))
  }
}
