// bookstore/src/gateway/stripe.rs

//! Stripe Checkout over its REST API (form-encoded requests, bearer key).

use super::{CheckoutSessionRequest, HostedCheckout, PaymentGateway};
use crate::errors::{AppError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, instrument, warn};

#[derive(Debug, Deserialize)]
struct SessionResponse {
  id: String,
  url: Option<String>,
  #[serde(default)]
  payment_status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
  error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
  message: Option<String>,
}

pub struct StripeGateway {
  client: reqwest::Client,
  secret_key: String,
  api_base: String,
}

impl StripeGateway {
  /// `api_base` is `https://api.stripe.com` in production; tests point it at
  /// a local mock server.
  pub fn new(secret_key: impl Into<String>, api_base: impl Into<String>) -> Self {
    Self {
      client: reqwest::Client::new(),
      secret_key: secret_key.into(),
      api_base: api_base.into().trim_end_matches('/').to_string(),
    }
  }

  fn form_for(request: &CheckoutSessionRequest) -> Vec<(String, String)> {
    let mut form = vec![
      ("mode".to_string(), "payment".to_string()),
      ("success_url".to_string(), request.success_url.clone()),
      ("cancel_url".to_string(), request.cancel_url.clone()),
      ("client_reference_id".to_string(), request.client_reference.clone()),
    ];
    for (i, item) in request.line_items.iter().enumerate() {
      let prefix = format!("line_items[{}]", i);
      form.push((format!("{}[price_data][currency]", prefix), request.currency.clone()));
      form.push((format!("{}[price_data][product_data][name]", prefix), item.name.clone()));
      form.push((format!("{}[price_data][unit_amount]", prefix), item.unit_amount_cents.to_string()));
      form.push((format!("{}[quantity]", prefix), item.quantity.to_string()));
    }
    form
  }

  async fn read_session(response: reqwest::Response) -> Result<SessionResponse> {
    let status = response.status();
    if status.is_success() {
      return Ok(response.json::<SessionResponse>().await?);
    }
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorEnvelope>(&body)
      .ok()
      .and_then(|env| env.error.message)
      .unwrap_or(body);
    warn!(%status, %message, "Stripe request rejected.");
    Err(AppError::Gateway(format!("Stripe responded {}: {}", status, message)))
  }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
  #[instrument(name = "StripeGateway::create_checkout_session", skip(self, request), fields(client_reference = %request.client_reference, lines = request.line_items.len()))]
  async fn create_checkout_session(&self, request: &CheckoutSessionRequest) -> Result<HostedCheckout> {
    let response = self
      .client
      .post(format!("{}/v1/checkout/sessions", self.api_base))
      .bearer_auth(&self.secret_key)
      .form(&Self::form_for(request))
      .send()
      .await?;
    let session = Self::read_session(response).await?;
    let url = session
      .url
      .ok_or_else(|| AppError::Gateway(format!("Stripe session {} has no redirect URL", session.id)))?;
    info!(session_id = %session.id, "Stripe checkout session created.");
    Ok(HostedCheckout { id: session.id, url })
  }

  #[instrument(name = "StripeGateway::is_session_paid", skip(self))]
  async fn is_session_paid(&self, session_id: &str) -> Result<bool> {
    let response = self
      .client
      .get(format!("{}/v1/checkout/sessions/{}", self.api_base, session_id))
      .bearer_auth(&self.secret_key)
      .send()
      .await?;
    let session = Self::read_session(response).await?;
    Ok(session.payment_status.as_deref() == Some("paid"))
  }
}
