// bookstore/src/store/postgres.rs

use super::seed::DEMO_CATALOG;
use super::{check_line_quantity, ShopStore};
use crate::errors::{AppError, Result};
use crate::models::{
  Book, CartItem, CartLine, Category, Order, OrderDetailLine, OrderDraft, User, MAX_LINE_QUANTITY,
};
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::{debug, info, instrument};

const ORDER_COLUMNS: &str =
  "id, customer_id, first_name, last_name, address, city, province, postal_code, phone, order_date, total_cents";

#[derive(Clone)]
pub struct PgShopStore {
  pool: PgPool,
}

impl PgShopStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  /// Connects and applies the embedded migrations.
  pub async fn connect(database_url: &str) -> Result<Self> {
    let pool = PgPoolOptions::new().max_connections(10).connect(database_url).await?;
    info!("Successfully connected to the database.");
    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Database migrations applied.");
    Ok(Self::new(pool))
  }
}

#[async_trait]
impl ShopStore for PgShopStore {
  async fn list_categories(&self) -> Result<Vec<Category>> {
    let categories = sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY name ASC")
      .fetch_all(&self.pool)
      .await?;
    Ok(categories)
  }

  async fn find_category(&self, category_id: i32) -> Result<Option<Category>> {
    let category = sqlx::query_as::<_, Category>("SELECT id, name FROM categories WHERE id = $1")
      .bind(category_id)
      .fetch_optional(&self.pool)
      .await?;
    Ok(category)
  }

  async fn books_in_category(&self, category_id: i32) -> Result<Vec<Book>> {
    let books = sqlx::query_as::<_, Book>(
      "SELECT id, title, author, price_cents, category_id FROM books WHERE category_id = $1 ORDER BY title ASC",
    )
    .bind(category_id)
    .fetch_all(&self.pool)
    .await?;
    Ok(books)
  }

  async fn find_book(&self, book_id: i32) -> Result<Option<Book>> {
    let book = sqlx::query_as::<_, Book>("SELECT id, title, author, price_cents, category_id FROM books WHERE id = $1")
      .bind(book_id)
      .fetch_optional(&self.pool)
      .await?;
    Ok(book)
  }

  #[instrument(name = "PgShopStore::add_or_increment", skip(self, book), fields(book_id = book.id))]
  async fn add_or_increment(&self, customer_id: &str, book: &Book, quantity: i32) -> Result<CartItem> {
    check_line_quantity(quantity)?;
    // The conflict branch only updates while the sum stays within the limit;
    // otherwise no row comes back.
    let item = sqlx::query_as::<_, CartItem>(
      r#"
      INSERT INTO cart_items (customer_id, book_id, quantity, price_cents)
      VALUES ($1, $2, $3, $4)
      ON CONFLICT (customer_id, book_id) DO UPDATE
      SET quantity = cart_items.quantity + EXCLUDED.quantity
      WHERE cart_items.quantity + EXCLUDED.quantity <= $5
      RETURNING id, customer_id, book_id, quantity, price_cents
      "#,
    )
    .bind(customer_id)
    .bind(book.id)
    .bind(quantity)
    .bind(book.price_cents)
    .bind(MAX_LINE_QUANTITY)
    .fetch_optional(&self.pool)
    .await?
    .ok_or_else(|| AppError::Validation(format!("Quantity cannot exceed {} per book.", MAX_LINE_QUANTITY)))?;
    debug!(item_id = item.id, quantity = item.quantity, "Cart line upserted.");
    Ok(item)
  }

  async fn remove_cart_item(&self, customer_id: &str, item_id: i32) -> Result<bool> {
    let result = sqlx::query("DELETE FROM cart_items WHERE id = $1 AND customer_id = $2")
      .bind(item_id)
      .bind(customer_id)
      .execute(&self.pool)
      .await?;
    Ok(result.rows_affected() > 0)
  }

  async fn cart_lines(&self, customer_id: &str) -> Result<Vec<CartLine>> {
    let lines = sqlx::query_as::<_, CartLine>(
      r#"
      SELECT ci.id AS item_id, ci.book_id, b.title, b.author, ci.quantity, ci.price_cents
      FROM cart_items ci
      JOIN books b ON b.id = ci.book_id
      WHERE ci.customer_id = $1
      ORDER BY b.title ASC
      "#,
    )
    .bind(customer_id)
    .fetch_all(&self.pool)
    .await?;
    Ok(lines)
  }

  #[instrument(name = "PgShopStore::adopt_cart", skip(self))]
  async fn adopt_cart(&self, from_customer: &str, to_customer: &str) -> Result<u64> {
    if from_customer == to_customer {
      return Ok(0);
    }
    let mut tx = self.pool.begin().await?;
    let moved = sqlx::query(
      r#"
      INSERT INTO cart_items (customer_id, book_id, quantity, price_cents)
      SELECT $2, book_id, LEAST(quantity, $3), price_cents FROM cart_items WHERE customer_id = $1
      ON CONFLICT (customer_id, book_id) DO UPDATE
      SET quantity = LEAST(cart_items.quantity + EXCLUDED.quantity, $3)
      "#,
    )
    .bind(from_customer)
    .bind(to_customer)
    .bind(MAX_LINE_QUANTITY)
    .execute(&mut *tx)
    .await?
    .rows_affected();
    sqlx::query("DELETE FROM cart_items WHERE customer_id = $1")
      .bind(from_customer)
      .execute(&mut *tx)
      .await?;
    tx.commit().await?;
    Ok(moved)
  }

  #[instrument(name = "PgShopStore::settle_order", skip(self, draft), fields(customer_id = %draft.customer_id, total_cents = draft.total_cents))]
  async fn settle_order(&self, draft: &OrderDraft) -> Result<Order> {
    let mut tx = self.pool.begin().await?;

    let order = sqlx::query_as::<_, Order>(&format!(
      r#"
      INSERT INTO orders (customer_id, first_name, last_name, address, city, province, postal_code, phone, order_date, total_cents)
      VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
      RETURNING {}
      "#,
      ORDER_COLUMNS
    ))
    .bind(&draft.customer_id)
    .bind(&draft.shipping.first_name)
    .bind(&draft.shipping.last_name)
    .bind(&draft.shipping.address)
    .bind(&draft.shipping.city)
    .bind(&draft.shipping.province)
    .bind(&draft.shipping.postal_code)
    .bind(&draft.shipping.phone)
    .bind(draft.order_date)
    .bind(draft.total_cents)
    .fetch_one(&mut *tx)
    .await?;

    for line in &draft.lines {
      sqlx::query("INSERT INTO order_details (order_id, book_id, quantity, price_cents) VALUES ($1, $2, $3, $4)")
        .bind(order.id)
        .bind(line.book_id)
        .bind(line.quantity)
        .bind(line.price_cents)
        .execute(&mut *tx)
        .await?;
    }

    sqlx::query("DELETE FROM cart_items WHERE customer_id = $1")
      .bind(&draft.customer_id)
      .execute(&mut *tx)
      .await?;

    tx.commit().await?;
    info!(order_id = order.id, "Order persisted and cart cleared.");
    Ok(order)
  }

  async fn orders_for(&self, customer_id: &str) -> Result<Vec<Order>> {
    let orders = sqlx::query_as::<_, Order>(&format!(
      "SELECT {} FROM orders WHERE customer_id = $1 ORDER BY order_date DESC, id DESC",
      ORDER_COLUMNS
    ))
    .bind(customer_id)
    .fetch_all(&self.pool)
    .await?;
    Ok(orders)
  }

  async fn find_order(&self, order_id: i32, customer_id: &str) -> Result<Option<(Order, Vec<OrderDetailLine>)>> {
    let order = sqlx::query_as::<_, Order>(&format!(
      "SELECT {} FROM orders WHERE id = $1 AND customer_id = $2",
      ORDER_COLUMNS
    ))
    .bind(order_id)
    .bind(customer_id)
    .fetch_optional(&self.pool)
    .await?;

    let Some(order) = order else {
      return Ok(None);
    };

    let details = sqlx::query_as::<_, OrderDetailLine>(
      r#"
      SELECT od.book_id, b.title, od.quantity, od.price_cents
      FROM order_details od
      JOIN books b ON b.id = od.book_id
      WHERE od.order_id = $1
      ORDER BY b.title ASC
      "#,
    )
    .bind(order.id)
    .fetch_all(&self.pool)
    .await?;

    Ok(Some((order, details)))
  }

  async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT id, email, password_hash, created_at FROM users WHERE email = $1")
      .bind(email)
      .fetch_optional(&self.pool)
      .await?;
    Ok(user)
  }

  async fn create_user(&self, email: &str, password_hash: &str) -> Result<User> {
    sqlx::query_as::<_, User>(
      "INSERT INTO users (email, password_hash) VALUES ($1, $2) RETURNING id, email, password_hash, created_at",
    )
    .bind(email)
    .bind(password_hash)
    .fetch_one(&self.pool)
    .await
    .map_err(|e| match e {
      sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
        AppError::Validation("An account with this email already exists.".to_string())
      }
      other => AppError::Sqlx(other),
    })
  }

  #[instrument(name = "PgShopStore::seed_catalog", skip(self))]
  async fn seed_catalog(&self) -> Result<()> {
    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
      .fetch_one(&self.pool)
      .await?;
    if existing > 0 {
      info!(existing, "Catalog already present; skipping seed.");
      return Ok(());
    }

    let mut tx = self.pool.begin().await?;
    for (category_name, books) in DEMO_CATALOG {
      let category_id: i32 = sqlx::query_scalar("INSERT INTO categories (name) VALUES ($1) RETURNING id")
        .bind(*category_name)
        .fetch_one(&mut *tx)
        .await?;
      for (title, author, price_cents) in books.iter() {
        sqlx::query("INSERT INTO books (title, author, price_cents, category_id) VALUES ($1, $2, $3, $4)")
          .bind(*title)
          .bind(*author)
          .bind(*price_cents)
          .bind(category_id)
          .execute(&mut *tx)
          .await?;
      }
    }
    tx.commit().await?;
    info!(categories = DEMO_CATALOG.len(), "Demo catalog seeded.");
    Ok(())
  }
}
