// bookstore/src/models/book.rs

use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Book {
  pub id: i32,
  pub title: String,
  pub author: String,
  pub price_cents: i32,
  pub category_id: i32,
}
