// bookstore/src/models/cart_item.rs

use serde::Serialize;
use sqlx::FromRow;

/// Largest quantity a single cart line may hold.
pub const MAX_LINE_QUANTITY: i32 = 99;

/// One row of `cart_items`. `price_cents` is the book price at the moment
/// the line was first added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct CartItem {
  pub id: i32,
  pub customer_id: String,
  pub book_id: i32,
  pub quantity: i32,
  pub price_cents: i32,
}

/// A cart row joined to its book, as shown on the cart page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct CartLine {
  pub item_id: i32,
  pub book_id: i32,
  pub title: String,
  pub author: String,
  pub quantity: i32,
  pub price_cents: i32,
}

impl CartLine {
  pub fn line_total_cents(&self) -> i64 {
    i64::from(self.quantity) * i64::from(self.price_cents)
  }
}

/// Totals derived from a customer's cart lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
  pub item_count: i64,
  pub total_cents: i64,
}

impl CartSummary {
  pub fn of(lines: &[CartLine]) -> Self {
    lines.iter().fold(Self::default(), |acc, line| Self {
      item_count: acc.item_count + i64::from(line.quantity),
      total_cents: acc.total_cents + line.line_total_cents(),
    })
  }
}
