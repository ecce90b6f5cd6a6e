// bookstore/src/web/handlers/shop_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::{info, instrument, warn};

use super::redirect_found;
use crate::errors::AppError;
use crate::state::AppState;

#[instrument(name = "handler::list_categories", skip(app_state))]
pub async fn list_categories_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let categories = app_state.store.list_categories().await?;
  info!(count = categories.len(), "Categories listed.");
  Ok(HttpResponse::Ok().json(json!({
      "message": "Categories fetched successfully.",
      "categories": categories
  })))
}

/// Unknown or malformed category ids send the visitor back to the index.
#[instrument(name = "handler::shop_by_category", skip(app_state, path), fields(raw_id = %path.as_str()))]
pub async fn shop_by_category_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let Ok(category_id) = path.into_inner().parse::<i32>() else {
    warn!("Malformed category id; redirecting to index.");
    return Ok(redirect_found("/Shop"));
  };

  let Some(category) = app_state.store.find_category(category_id).await? else {
    warn!(category_id, "Unknown category; redirecting to index.");
    return Ok(redirect_found("/Shop"));
  };

  let books = app_state.store.books_in_category(category.id).await?;
  info!(category_id, count = books.len(), "Category books listed.");
  Ok(HttpResponse::Ok().json(json!({
      "message": "Books fetched successfully.",
      "category": category.name,
      "books": books
  })))
}
