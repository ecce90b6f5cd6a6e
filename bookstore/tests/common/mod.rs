// bookstore/tests/common/mod.rs
#![allow(dead_code)]

use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use actix_web::http::header;
use actix_web::test::TestRequest;
use bookstore::config::AppConfig;
use bookstore::gateway::MockGateway;
use bookstore::state::AppState;
use bookstore::store::{MemoryShopStore, ShopStore};
use bookstore::web::session::SESSION_COOKIE_NAME;
use once_cell::sync::Lazy;
use std::sync::Arc;

pub const BASE_URL: &str = "http://shop.test";

/// Seeded ids: categories Fantasy=1, History=2, Science Fiction=3; the
/// books below belong to them.
pub const HOBBIT_ID: i32 = 2;
pub const HOBBIT_PRICE: i64 = 1899;
pub const SPQR_ID: i32 = 4;
pub const SPQR_PRICE: i64 = 2450;
pub const DUNE_ID: i32 = 6;
pub const DUNE_PRICE: i64 = 1999;

static TRACING: Lazy<()> = Lazy::new(|| {
  let filter = std::env::var("TEST_LOG").unwrap_or_else(|_| "warn".to_string());
  let _ = tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
    .with_test_writer()
    .try_init();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING);
}

pub fn test_config() -> AppConfig {
  AppConfig::from_lookup(|name| match name {
    "STORE_BACKEND" => Some("memory".to_string()),
    "APP_BASE_URL" => Some(BASE_URL.to_string()),
    _ => None,
  })
  .expect("test config")
}

/// State over a freshly seeded memory store and the mock gateway.
pub async fn test_state() -> AppState {
  setup_tracing();
  let store = MemoryShopStore::new();
  store.seed_catalog().await.expect("seed");
  AppState::new(Arc::new(test_config()), Arc::new(store), Arc::new(MockGateway::new()))
}

/// Builds the app the way `main` does, minus the request logger.
macro_rules! init_app {
  ($state:expr) => {
    actix_web::test::init_service(
      actix_web::App::new()
        .app_data(actix_web::web::Data::new($state.clone()))
        .wrap(bookstore::web::session_middleware(actix_web::cookie::Key::generate(), false))
        .configure(bookstore::web::configure_app_routes),
    )
    .await
  };
}

/// Holds one visitor's session cookie between requests.
#[derive(Default)]
pub struct Browser {
  cookie: Option<Cookie<'static>>,
}

impl Browser {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn prepare(&self, req: TestRequest) -> TestRequest {
    match &self.cookie {
      Some(cookie) => req.cookie(cookie.clone()),
      None => req,
    }
  }

  pub fn absorb<B>(&mut self, resp: &ServiceResponse<B>) {
    if let Some(cookie) = resp.response().cookies().find(|c| c.name() == SESSION_COOKIE_NAME) {
      self.cookie = if cookie.value().is_empty() {
        None
      } else {
        Some(cookie.into_owned())
      };
    }
  }
}

/// Sends `$req` as `$browser`, keeping whatever session cookie comes back.
macro_rules! send {
  ($app:expr, $browser:expr, $req:expr) => {{
    let resp = actix_web::test::call_service(&$app, $browser.prepare($req).to_request()).await;
    $browser.absorb(&resp);
    resp
  }};
}

pub fn location<B>(resp: &ServiceResponse<B>) -> String {
  resp
    .headers()
    .get(header::LOCATION)
    .and_then(|v| v.to_str().ok())
    .unwrap_or_default()
    .to_string()
}

/// Path part of an absolute URL on the test host.
pub fn local_path(url: &str) -> String {
  url.strip_prefix(BASE_URL).unwrap_or(url).to_string()
}

pub fn add_to_cart_form(book_id: i32, quantity: i32) -> TestRequest {
  TestRequest::post()
    .uri("/Shop/AddToCart")
    .set_form([("BookId", book_id.to_string()), ("Quantity", quantity.to_string())])
}

pub fn credentials_form(uri: &str, email: &str, password: &str) -> TestRequest {
  TestRequest::post()
    .uri(uri)
    .set_form([("Email", email), ("Password", password)])
}

pub fn checkout_form() -> TestRequest {
  TestRequest::post().uri("/Shop/Checkout").set_form([
    ("FirstName", "Ada"),
    ("LastName", "Lovelace"),
    ("Address", "12 Analytical Way"),
    ("City", "Barrie"),
    ("Province", "ON"),
    ("PostalCode", "L4M 3X9"),
    ("Phone", "705-555-0100"),
  ])
}
