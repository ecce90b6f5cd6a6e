// bookstore/src/checkout.rs

//! Where a visitor is in the checkout flow. The stage is stored in session
//! next to the draft order.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckoutStage {
  #[default]
  Empty,
  DraftBuilt,
  PaymentPending,
  Settled,
}

impl CheckoutStage {
  /// Re-submitting the shipping form and re-opening a payment session are
  /// both allowed until the order is settled.
  pub fn can_transition_to(self, next: CheckoutStage) -> bool {
    use CheckoutStage::*;
    matches!(
      (self, next),
      (Empty, DraftBuilt)
        | (DraftBuilt, DraftBuilt)
        | (DraftBuilt, PaymentPending)
        | (PaymentPending, DraftBuilt)
        | (PaymentPending, PaymentPending)
        | (PaymentPending, Settled)
        | (Settled, Empty)
    )
  }

  pub fn has_draft(self) -> bool {
    matches!(self, CheckoutStage::DraftBuilt | CheckoutStage::PaymentPending)
  }
}
