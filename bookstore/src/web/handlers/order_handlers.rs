// bookstore/src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::{instrument, warn};

use super::redirect_found;
use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::SignedInUser;

#[instrument(name = "handler::list_orders", skip(app_state, user), fields(user = %user.email))]
pub async fn list_orders_handler(
  app_state: web::Data<AppState>,
  user: SignedInUser,
) -> Result<HttpResponse, AppError> {
  let orders = app_state.store.orders_for(&user.email).await?;
  Ok(HttpResponse::Ok().json(json!({
      "message": "Orders fetched successfully.",
      "orders": orders
  })))
}

/// Orders that are unknown or belong to someone else redirect to the list.
#[instrument(name = "handler::order_details", skip(app_state, user, path), fields(user = %user.email, raw_id = %path.as_str()))]
pub async fn order_details_handler(
  app_state: web::Data<AppState>,
  user: SignedInUser,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let Ok(order_id) = path.into_inner().parse::<i32>() else {
    return Ok(redirect_found("/Orders"));
  };
  match app_state.store.find_order(order_id, &user.email).await? {
    Some((order, details)) => Ok(HttpResponse::Ok().json(json!({
        "message": "Order fetched successfully.",
        "order": order,
        "details": details
    }))),
    None => {
      warn!(order_id, "Order not found for this customer.");
      Ok(redirect_found("/Orders"))
    }
  }
}
