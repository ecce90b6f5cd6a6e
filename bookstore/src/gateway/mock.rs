// bookstore/src/gateway/mock.rs

use super::{CheckoutSessionRequest, HostedCheckout, PaymentGateway, SESSION_ID_PLACEHOLDER};
use crate::errors::{AppError, Result};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::{info, instrument};
use uuid::Uuid;

/// Local stand-in for a hosted checkout: no page is shown, the "hosted" URL
/// is the success callback itself, and every session it opened counts as
/// paid.
#[derive(Default)]
pub struct MockGateway {
  // session id -> amount in cents
  sessions: RwLock<HashMap<String, i64>>,
}

impl MockGateway {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn amount_for(&self, session_id: &str) -> Option<i64> {
    self.sessions.read().get(session_id).copied()
  }
}

#[async_trait]
impl PaymentGateway for MockGateway {
  #[instrument(name = "MockGateway::create_checkout_session", skip(self, request), fields(client_reference = %request.client_reference, currency = %request.currency))]
  async fn create_checkout_session(&self, request: &CheckoutSessionRequest) -> Result<HostedCheckout> {
    let amount = request.amount_total_cents();
    if amount <= 0 {
      return Err(AppError::Payment("Amount must be greater than zero".to_string()));
    }

    let id = format!("mock_cs_{}", Uuid::new_v4().simple());
    self.sessions.write().insert(id.clone(), amount);
    info!(session_id = %id, amount, "Simulated hosted checkout session created.");

    Ok(HostedCheckout {
      url: request.success_url.replace(SESSION_ID_PLACEHOLDER, &id),
      id,
    })
  }

  async fn is_session_paid(&self, session_id: &str) -> Result<bool> {
    Ok(self.sessions.read().contains_key(session_id))
  }
}
