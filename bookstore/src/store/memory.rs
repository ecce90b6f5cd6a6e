// bookstore/src/store/memory.rs

use super::seed::DEMO_CATALOG;
use super::{check_line_quantity, ShopStore};
use crate::errors::{AppError, Result};
use crate::models::{
  Book, CartItem, CartLine, Category, Order, OrderDetail, OrderDetailLine, OrderDraft, User,
  MAX_LINE_QUANTITY,
};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::{debug, info};

#[derive(Default)]
struct Tables {
  categories: Vec<Category>,
  books: Vec<Book>,
  cart_items: Vec<CartItem>,
  orders: Vec<Order>,
  order_details: Vec<OrderDetail>,
  users: Vec<User>,
  // table name -> last id handed out, like a SERIAL column per table
  sequences: HashMap<&'static str, i32>,
}

impl Tables {
  fn next_id(&mut self, table: &'static str) -> i32 {
    let last = self.sequences.entry(table).or_insert(0);
    *last += 1;
    *last
  }

  fn book_title(&self, book_id: i32) -> String {
    self
      .books
      .iter()
      .find(|b| b.id == book_id)
      .map(|b| b.title.clone())
      .unwrap_or_default()
  }

  /// Adds `quantity` to the customer's line for `book_id`, creating it if
  /// needed. A line may never exceed `MAX_LINE_QUANTITY`.
  fn upsert_cart_line(&mut self, customer_id: &str, book_id: i32, quantity: i32, price_cents: i32) -> Result<CartItem> {
    check_line_quantity(quantity)?;
    if let Some(existing) = self
      .cart_items
      .iter_mut()
      .find(|ci| ci.customer_id == customer_id && ci.book_id == book_id)
    {
      let merged = existing
        .quantity
        .checked_add(quantity)
        .ok_or_else(|| AppError::Validation("Cart quantity is out of range.".to_string()))?;
      check_line_quantity(merged)?;
      existing.quantity = merged;
      return Ok(existing.clone());
    }
    let item = CartItem {
      id: self.next_id("cart_items"),
      customer_id: customer_id.to_string(),
      book_id,
      quantity,
      price_cents,
    };
    self.cart_items.push(item.clone());
    Ok(item)
  }

  /// Merge used by cart adoption: quantities are summed and capped at
  /// `MAX_LINE_QUANTITY` instead of failing the sign-in.
  fn merge_cart_line(&mut self, customer_id: &str, adopted: &CartItem) {
    if let Some(existing) = self
      .cart_items
      .iter_mut()
      .find(|ci| ci.customer_id == customer_id && ci.book_id == adopted.book_id)
    {
      existing.quantity = existing.quantity.saturating_add(adopted.quantity).min(MAX_LINE_QUANTITY);
      return;
    }
    let item = CartItem {
      id: self.next_id("cart_items"),
      customer_id: customer_id.to_string(),
      quantity: adopted.quantity.min(MAX_LINE_QUANTITY),
      ..adopted.clone()
    };
    self.cart_items.push(item);
  }
}

/// `ShopStore` kept entirely in process memory, for development and tests.
/// Every operation takes the single table lock once, so multi-row updates
/// are atomic with respect to each other.
#[derive(Default)]
pub struct MemoryShopStore {
  tables: RwLock<Tables>,
}

impl MemoryShopStore {
  pub fn new() -> Self {
    Self::default()
  }
}

#[async_trait]
impl ShopStore for MemoryShopStore {
  async fn list_categories(&self) -> Result<Vec<Category>> {
    let mut categories = self.tables.read().categories.clone();
    categories.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(categories)
  }

  async fn find_category(&self, category_id: i32) -> Result<Option<Category>> {
    Ok(self.tables.read().categories.iter().find(|c| c.id == category_id).cloned())
  }

  async fn books_in_category(&self, category_id: i32) -> Result<Vec<Book>> {
    let mut books: Vec<Book> = self
      .tables
      .read()
      .books
      .iter()
      .filter(|b| b.category_id == category_id)
      .cloned()
      .collect();
    books.sort_by(|a, b| a.title.cmp(&b.title));
    Ok(books)
  }

  async fn find_book(&self, book_id: i32) -> Result<Option<Book>> {
    Ok(self.tables.read().books.iter().find(|b| b.id == book_id).cloned())
  }

  async fn add_or_increment(&self, customer_id: &str, book: &Book, quantity: i32) -> Result<CartItem> {
    let item = self
      .tables
      .write()
      .upsert_cart_line(customer_id, book.id, quantity, book.price_cents)?;
    debug!(item_id = item.id, quantity = item.quantity, "Cart line upserted.");
    Ok(item)
  }

  async fn remove_cart_item(&self, customer_id: &str, item_id: i32) -> Result<bool> {
    let mut tables = self.tables.write();
    let before = tables.cart_items.len();
    tables
      .cart_items
      .retain(|ci| !(ci.id == item_id && ci.customer_id == customer_id));
    Ok(tables.cart_items.len() < before)
  }

  async fn cart_lines(&self, customer_id: &str) -> Result<Vec<CartLine>> {
    let tables = self.tables.read();
    let mut lines: Vec<CartLine> = tables
      .cart_items
      .iter()
      .filter(|ci| ci.customer_id == customer_id)
      .filter_map(|ci| {
        tables.books.iter().find(|b| b.id == ci.book_id).map(|book| CartLine {
          item_id: ci.id,
          book_id: ci.book_id,
          title: book.title.clone(),
          author: book.author.clone(),
          quantity: ci.quantity,
          price_cents: ci.price_cents,
        })
      })
      .collect();
    lines.sort_by(|a, b| a.title.cmp(&b.title));
    Ok(lines)
  }

  async fn adopt_cart(&self, from_customer: &str, to_customer: &str) -> Result<u64> {
    if from_customer == to_customer {
      return Ok(0);
    }
    let mut tables = self.tables.write();
    let (moving, staying): (Vec<CartItem>, Vec<CartItem>) = std::mem::take(&mut tables.cart_items)
      .into_iter()
      .partition(|ci| ci.customer_id == from_customer);
    tables.cart_items = staying;
    for item in &moving {
      tables.merge_cart_line(to_customer, item);
    }
    Ok(moving.len() as u64)
  }

  async fn settle_order(&self, draft: &OrderDraft) -> Result<Order> {
    let mut tables = self.tables.write();
    if let Some(line) = draft.lines.iter().find(|l| !tables.books.iter().any(|b| b.id == l.book_id)) {
      return Err(AppError::NotFound(format!("Book with ID {} not found.", line.book_id)));
    }

    let order = Order {
      id: tables.next_id("orders"),
      customer_id: draft.customer_id.clone(),
      shipping: draft.shipping.clone(),
      order_date: draft.order_date,
      total_cents: draft.total_cents,
    };
    for line in &draft.lines {
      let detail = OrderDetail {
        id: tables.next_id("order_details"),
        order_id: order.id,
        book_id: line.book_id,
        quantity: line.quantity,
        price_cents: line.price_cents,
      };
      tables.order_details.push(detail);
    }
    tables.orders.push(order.clone());
    tables.cart_items.retain(|ci| ci.customer_id != draft.customer_id);
    info!(order_id = order.id, "Order persisted and cart cleared.");
    Ok(order)
  }

  async fn orders_for(&self, customer_id: &str) -> Result<Vec<Order>> {
    let mut orders: Vec<Order> = self
      .tables
      .read()
      .orders
      .iter()
      .filter(|o| o.customer_id == customer_id)
      .cloned()
      .collect();
    orders.sort_by(|a, b| b.order_date.cmp(&a.order_date).then(b.id.cmp(&a.id)));
    Ok(orders)
  }

  async fn find_order(&self, order_id: i32, customer_id: &str) -> Result<Option<(Order, Vec<OrderDetailLine>)>> {
    let tables = self.tables.read();
    let Some(order) = tables
      .orders
      .iter()
      .find(|o| o.id == order_id && o.customer_id == customer_id)
      .cloned()
    else {
      return Ok(None);
    };
    let mut details: Vec<OrderDetailLine> = tables
      .order_details
      .iter()
      .filter(|d| d.order_id == order.id)
      .map(|d| OrderDetailLine {
        book_id: d.book_id,
        title: tables.book_title(d.book_id),
        quantity: d.quantity,
        price_cents: d.price_cents,
      })
      .collect();
    details.sort_by(|a, b| a.title.cmp(&b.title));
    Ok(Some((order, details)))
  }

  async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
    Ok(self.tables.read().users.iter().find(|u| u.email == email).cloned())
  }

  async fn create_user(&self, email: &str, password_hash: &str) -> Result<User> {
    let mut tables = self.tables.write();
    if tables.users.iter().any(|u| u.email == email) {
      return Err(AppError::Validation("An account with this email already exists.".to_string()));
    }
    let user = User {
      id: tables.next_id("users"),
      email: email.to_string(),
      password_hash: password_hash.to_string(),
      created_at: Utc::now(),
    };
    tables.users.push(user.clone());
    Ok(user)
  }

  async fn seed_catalog(&self) -> Result<()> {
    let mut tables = self.tables.write();
    if !tables.categories.is_empty() {
      return Ok(());
    }
    for (category_name, books) in DEMO_CATALOG {
      let category = Category {
        id: tables.next_id("categories"),
        name: (*category_name).to_string(),
      };
      for (title, author, price_cents) in books.iter() {
        let book = Book {
          id: tables.next_id("books"),
          title: (*title).to_string(),
          author: (*author).to_string(),
          price_cents: *price_cents,
          category_id: category.id,
        };
        tables.books.push(book);
      }
      tables.categories.push(category);
    }
    info!(categories = DEMO_CATALOG.len(), "Demo catalog seeded.");
    Ok(())
  }
}
