// bookstore/src/main.rs

use actix_web::cookie::Key;
use actix_web::{web as actix_data, App, HttpServer};
use bookstore::config::AppConfig;
use bookstore::state::AppState;
use bookstore::web::{configure_app_routes, session_middleware};
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO)
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .with_span_events(FmtSpan::CLOSE)
    .init();

  tracing::info!("Starting bookstore server...");

  let app_config = match AppConfig::from_env() {
    Ok(cfg) => Arc::new(cfg),
    Err(e) => {
      tracing::error!(error = %e, "Failed to load application configuration.");
      return Err(std::io::Error::other(e.to_string()));
    }
  };

  let app_state = AppState::from_config(app_config.clone()).await.map_err(|e| {
    tracing::error!(error = %e, "Failed to initialise application state.");
    std::io::Error::other(e.to_string())
  })?;

  let session_key = match &app_config.session_secret {
    Some(secret) => Key::from(secret.as_bytes()),
    None => {
      tracing::warn!("SESSION_SECRET not set; sessions will not survive a restart.");
      Key::generate()
    }
  };
  let secure_cookies = app_config.secure_cookies;

  let server_address = format!("{}:{}", app_config.server_host, app_config.server_port);
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(session_middleware(session_key.clone(), secure_cookies))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await
}
