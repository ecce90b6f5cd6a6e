// bookstore/src/models/order_detail.rs

use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct OrderDetail {
  pub id: i32,
  pub order_id: i32,
  pub book_id: i32,
  pub quantity: i32,
  pub price_cents: i32,
}

/// An order detail joined to the book title for the order details page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct OrderDetailLine {
  pub book_id: i32,
  pub title: String,
  pub quantity: i32,
  pub price_cents: i32,
}
