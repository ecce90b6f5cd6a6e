// bookstore/src/lib.rs

//! A small bookstore: category browsing, a session-keyed cart, checkout
//! through a hosted payment page, and order history.

pub mod checkout;
pub mod config;
pub mod errors;
pub mod gateway;
pub mod models;
pub mod pipelines;
pub mod services;
pub mod state;
pub mod store;
pub mod web;

#[cfg(test)]
pub(crate) mod test_support {
  use crate::config::AppConfig;
  use crate::gateway::MockGateway;
  use crate::models::ShippingDetails;
  use crate::state::AppState;
  use crate::store::{MemoryShopStore, ShopStore};
  use std::sync::Arc;

  pub fn memory_config() -> AppConfig {
    AppConfig::from_lookup(|name| match name {
      "STORE_BACKEND" => Some("memory".to_string()),
      "APP_BASE_URL" => Some("http://shop.test".to_string()),
      _ => None,
    })
    .expect("memory config")
  }

  /// State over a seeded in-memory store and the mock gateway.
  pub async fn memory_state() -> AppState {
    let store = MemoryShopStore::new();
    store.seed_catalog().await.expect("seed catalog");
    AppState::new(Arc::new(memory_config()), Arc::new(store), Arc::new(MockGateway::new()))
  }

  pub fn shipping() -> ShippingDetails {
    ShippingDetails {
      first_name: "Ada".to_string(),
      last_name: "Lovelace".to_string(),
      address: "12 Analytical Way".to_string(),
      city: "Barrie".to_string(),
      province: "ON".to_string(),
      postal_code: "L4M 3X9".to_string(),
      phone: "705-555-0100".to_string(),
    }
  }
}
