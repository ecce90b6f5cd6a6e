// bookstore/src/models/order.rs

use super::cart_item::CartLine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Shipping fields collected by the checkout form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, Validate)]
pub struct ShippingDetails {
  #[validate(length(min = 1, max = 100, message = "First name is required."))]
  pub first_name: String,
  #[validate(length(min = 1, max = 100, message = "Last name is required."))]
  pub last_name: String,
  #[validate(length(min = 1, max = 200, message = "Address is required."))]
  pub address: String,
  #[validate(length(min = 1, max = 100, message = "City is required."))]
  pub city: String,
  #[validate(length(min = 1, max = 50, message = "Province is required."))]
  pub province: String,
  #[validate(length(min = 1, max = 20, message = "Postal code is required."))]
  pub postal_code: String,
  #[validate(length(min = 1, max = 30, message = "Phone is required."))]
  pub phone: String,
}

/// A persisted order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Order {
  pub id: i32,
  pub customer_id: String,
  #[sqlx(flatten)]
  #[serde(flatten)]
  pub shipping: ShippingDetails,
  pub order_date: DateTime<Utc>,
  pub total_cents: i64,
}

/// A cart line frozen at checkout time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftLine {
  pub book_id: i32,
  pub title: String,
  pub quantity: i32,
  pub price_cents: i32,
}

impl DraftLine {
  pub fn line_total_cents(&self) -> i64 {
    i64::from(self.quantity) * i64::from(self.price_cents)
  }
}

/// The order held in session between the checkout form and the payment
/// callback. The lines are the cart snapshot the customer pays for, so the
/// persisted details always add up to `total_cents`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDraft {
  pub customer_id: String,
  pub shipping: ShippingDetails,
  pub order_date: DateTime<Utc>,
  pub total_cents: i64,
  pub lines: Vec<DraftLine>,
  /// Hosted checkout session opened for this draft, once payment started.
  pub payment_session_id: Option<String>,
}

impl OrderDraft {
  pub fn from_cart(customer_id: &str, shipping: ShippingDetails, cart: &[CartLine], order_date: DateTime<Utc>) -> Self {
    let lines: Vec<DraftLine> = cart
      .iter()
      .map(|line| DraftLine {
        book_id: line.book_id,
        title: line.title.clone(),
        quantity: line.quantity,
        price_cents: line.price_cents,
      })
      .collect();
    let total_cents = lines.iter().map(DraftLine::line_total_cents).sum();
    Self {
      customer_id: customer_id.to_string(),
      shipping,
      order_date,
      total_cents,
      lines,
      payment_session_id: None,
    }
  }

  pub fn lines_total_cents(&self) -> i64 {
    self.lines.iter().map(DraftLine::line_total_cents).sum()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_support::shipping;

  #[test]
  fn draft_total_matches_cart_snapshot() {
    let cart = vec![
      CartLine {
        item_id: 1,
        book_id: 10,
        title: "Dune".to_string(),
        author: "Herbert".to_string(),
        quantity: 2,
        price_cents: 1899,
      },
      CartLine {
        item_id: 2,
        book_id: 11,
        title: "Emma".to_string(),
        author: "Austen".to_string(),
        quantity: 1,
        price_cents: 999,
      },
    ];
    let draft = OrderDraft::from_cart("ada@example.com", shipping(), &cart, Utc::now());
    assert_eq!(draft.total_cents, 2 * 1899 + 999);
    assert_eq!(draft.total_cents, draft.lines_total_cents());
    assert_eq!(draft.lines.len(), 2);
    assert!(draft.payment_session_id.is_none());
  }

  #[test]
  fn blank_shipping_field_fails_validation() {
    let mut details = shipping();
    details.city = String::new();
    let errs = details.validate().unwrap_err();
    assert!(errs.field_errors().contains_key("city"));
  }

  #[test]
  fn complete_shipping_passes_validation() {
    assert!(shipping().validate().is_ok());
  }
}
