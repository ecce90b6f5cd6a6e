// bookstore/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;

/// Which `ShopStore` implementation backs the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
  Postgres,
  Memory,
}

/// Which hosted-checkout provider `/Shop/Payment` redirects to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentProvider {
  Stripe,
  Mock,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub database_url: Option<String>,
  pub store_backend: StoreBackend,
  /// Absolute base used for the gateway's success and cancel URLs.
  pub app_base_url: String,

  pub payment_provider: PaymentProvider,
  pub stripe_secret_key: Option<String>,
  pub stripe_api_base: String,
  /// Lowercase ISO code; the store sells in one currency only.
  pub currency: String,

  /// Signing/encryption key material for the session cookie (>= 64 bytes).
  pub session_secret: Option<String>,
  pub secure_cookies: bool,

  pub seed_db: bool,
}

const MIN_SESSION_SECRET_LEN: usize = 64;

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok();
    Self::from_lookup(|name| env::var(name).ok())
  }

  /// Builds the config from any variable source. `from_env` passes the
  /// process environment; tests pass a map.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
    let get_or = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

    let server_host = get_or("SERVER_HOST", "127.0.0.1");
    let server_port = get_or("SERVER_PORT", "8080")
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;

    let store_backend = match get_or("STORE_BACKEND", "postgres").to_lowercase().as_str() {
      "postgres" => StoreBackend::Postgres,
      "memory" => StoreBackend::Memory,
      other => return Err(AppError::Config(format!("Unknown STORE_BACKEND '{}'", other))),
    };
    let database_url = lookup("DATABASE_URL");
    if store_backend == StoreBackend::Postgres && database_url.is_none() {
      return Err(AppError::Config(
        "Missing environment variable 'DATABASE_URL' (required by STORE_BACKEND=postgres)".to_string(),
      ));
    }

    let app_base_url = lookup("APP_BASE_URL")
      .unwrap_or_else(|| format!("http://{}:{}", server_host, server_port))
      .trim_end_matches('/')
      .to_string();

    let payment_provider = match get_or("PAYMENT_PROVIDER", "mock").to_lowercase().as_str() {
      "stripe" => PaymentProvider::Stripe,
      "mock" => PaymentProvider::Mock,
      other => return Err(AppError::Config(format!("Unknown PAYMENT_PROVIDER '{}'", other))),
    };
    let stripe_secret_key = lookup("STRIPE_SECRET_KEY");
    if payment_provider == PaymentProvider::Stripe && stripe_secret_key.is_none() {
      return Err(AppError::Config(
        "Missing environment variable 'STRIPE_SECRET_KEY' (required by PAYMENT_PROVIDER=stripe)".to_string(),
      ));
    }
    let stripe_api_base = get_or("STRIPE_API_BASE", "https://api.stripe.com")
      .trim_end_matches('/')
      .to_string();

    let currency = get_or("CURRENCY", "cad").to_lowercase();
    if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
      return Err(AppError::Config(format!("Invalid CURRENCY '{}'", currency)));
    }

    let session_secret = lookup("SESSION_SECRET");
    if let Some(secret) = &session_secret {
      if secret.len() < MIN_SESSION_SECRET_LEN {
        return Err(AppError::Config(format!(
          "SESSION_SECRET must be at least {} bytes",
          MIN_SESSION_SECRET_LEN
        )));
      }
    }

    let parse_bool = |name: &str| {
      get_or(name, "false")
        .parse::<bool>()
        .map_err(|e| AppError::Config(format!("Invalid {} value: {}", name, e)))
    };
    let secure_cookies = parse_bool("SECURE_COOKIES")?;
    let seed_db = parse_bool("SEED_DB")?;

    tracing::info!(
      ?store_backend,
      ?payment_provider,
      %currency,
      "Application configuration loaded successfully."
    );

    Ok(Self {
      server_host,
      server_port,
      database_url,
      store_backend,
      app_base_url,
      payment_provider,
      stripe_secret_key,
      stripe_api_base,
      currency,
      session_secret,
      secure_cookies,
      seed_db,
    })
  }
}
