// bookstore/src/store/mod.rs

//! Persistence behind one trait so the web layer and pipelines can run on
//! Postgres in production and on the in-memory store in tests.

use crate::errors::{AppError, Result};
use crate::models::{
  Book, CartItem, CartLine, Category, Order, OrderDetailLine, OrderDraft, User, MAX_LINE_QUANTITY,
};
use async_trait::async_trait;

pub mod memory;
pub mod postgres;
pub mod seed;

pub use memory::MemoryShopStore;
pub use postgres::PgShopStore;

/// Rejects a line quantity outside `1..=MAX_LINE_QUANTITY`.
pub(crate) fn check_line_quantity(quantity: i32) -> Result<()> {
  if (1..=MAX_LINE_QUANTITY).contains(&quantity) {
    Ok(())
  } else {
    Err(AppError::Validation(format!(
      "Quantity must be between 1 and {} per book.",
      MAX_LINE_QUANTITY
    )))
  }
}

#[async_trait]
pub trait ShopStore: Send + Sync {
  // --- Catalog ---

  /// All categories ordered by name.
  async fn list_categories(&self) -> Result<Vec<Category>>;
  async fn find_category(&self, category_id: i32) -> Result<Option<Category>>;
  /// Books of one category ordered by title.
  async fn books_in_category(&self, category_id: i32) -> Result<Vec<Book>>;
  async fn find_book(&self, book_id: i32) -> Result<Option<Book>>;

  // --- Cart ---

  /// Inserts a line for `(customer_id, book.id)` at the book's current price,
  /// or adds `quantity` to the existing line's quantity. Fails with
  /// `Validation` when the line would pass `MAX_LINE_QUANTITY`.
  async fn add_or_increment(&self, customer_id: &str, book: &Book, quantity: i32) -> Result<CartItem>;
  /// Deletes a line owned by `customer_id`. Returns `false` when no such
  /// line exists for that customer.
  async fn remove_cart_item(&self, customer_id: &str, item_id: i32) -> Result<bool>;
  /// The customer's lines joined to their books, ordered by title.
  async fn cart_lines(&self, customer_id: &str) -> Result<Vec<CartLine>>;
  /// Moves every line of `from_customer` into `to_customer`'s cart, summing
  /// quantities per book. Returns the number of lines moved.
  async fn adopt_cart(&self, from_customer: &str, to_customer: &str) -> Result<u64>;

  // --- Orders ---

  /// Persists the order and its details from the draft snapshot and clears
  /// the customer's cart, all or nothing.
  async fn settle_order(&self, draft: &OrderDraft) -> Result<Order>;
  /// The customer's orders, newest first.
  async fn orders_for(&self, customer_id: &str) -> Result<Vec<Order>>;
  /// One order with its detail lines, only when owned by `customer_id`.
  async fn find_order(&self, order_id: i32, customer_id: &str) -> Result<Option<(Order, Vec<OrderDetailLine>)>>;

  // --- Accounts ---

  async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;
  async fn create_user(&self, email: &str, password_hash: &str) -> Result<User>;

  /// Inserts the demo catalog when no category exists yet.
  async fn seed_catalog(&self) -> Result<()>;
}
