// bookstore/src/gateway/mod.rs

//! Hosted-checkout payment providers.

use crate::errors::Result;
use async_trait::async_trait;
use serde::Serialize;

pub mod mock;
pub mod stripe;

pub use mock::MockGateway;
pub use stripe::StripeGateway;

/// Placeholder the provider replaces with the real session id when it
/// redirects to the success URL.
pub const SESSION_ID_PLACEHOLDER: &str = "{CHECKOUT_SESSION_ID}";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GatewayLineItem {
  pub name: String,
  pub unit_amount_cents: i64,
  pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutSessionRequest {
  /// Customer key, echoed back by the provider as its client reference.
  pub client_reference: String,
  pub currency: String,
  pub line_items: Vec<GatewayLineItem>,
  pub success_url: String,
  pub cancel_url: String,
}

impl CheckoutSessionRequest {
  pub fn amount_total_cents(&self) -> i64 {
    self.line_items.iter().map(|li| li.unit_amount_cents * li.quantity).sum()
  }
}

/// A session opened on the provider; the customer is redirected to `url`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostedCheckout {
  pub id: String,
  pub url: String,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
  async fn create_checkout_session(&self, request: &CheckoutSessionRequest) -> Result<HostedCheckout>;
  async fn is_session_paid(&self, session_id: &str) -> Result<bool>;
}
