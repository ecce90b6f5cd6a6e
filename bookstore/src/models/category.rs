// bookstore/src/models/category.rs

use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Category {
  pub id: i32,
  pub name: String,
}
