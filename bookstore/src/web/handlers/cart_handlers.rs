// bookstore/src/web/handlers/cart_handlers.rs

use actix_session::Session;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use shopflow::{ContextData, PipelineResult};
use tracing::{info, instrument, warn};

use super::{redirect_found, redirect_see_other};
use crate::errors::AppError;
use crate::models::CartSummary;
use crate::pipelines::contexts::{AddToCartCtxData, ViewCartCtxData};
use crate::state::AppState;
use crate::web::extractors::CustomerKey;
use crate::web::session;

#[derive(Deserialize, Debug)]
pub struct AddToCartForm {
  #[serde(rename = "BookId")]
  pub book_id: i32,
  #[serde(rename = "Quantity")]
  pub quantity: i32,
}

#[instrument(
    name = "handler::add_to_cart",
    skip(app_state, form, customer, session),
    fields(customer_id = %customer.0, book_id = form.book_id, quantity = form.quantity)
)]
pub async fn add_to_cart_handler(
  app_state: web::Data<AppState>,
  form: web::Form<AddToCartForm>,
  customer: CustomerKey,
  session: Session,
) -> Result<HttpResponse, AppError> {
  let ctx_data = ContextData::new(AddToCartCtxData {
    app_state: app_state.get_ref().clone(),
    customer_id: customer.0.clone(),
    book_id: form.book_id,
    quantity: form.quantity,
    book: None,
    cart_item: None,
    summary: CartSummary::default(),
  });

  match app_state.flows.run(ctx_data.clone()).await? {
    PipelineResult::Completed => {
      let item_count = ctx_data.read().summary.item_count;
      session::store_item_count(&session, item_count)?;
      info!(item_count, "Item added to cart.");
      Ok(redirect_see_other("/Shop/Cart"))
    }
    PipelineResult::Stopped => {
      warn!("Add to Cart pipeline was stopped by a handler.");
      Err(AppError::PipelineHalted)
    }
  }
}

#[instrument(name = "handler::view_cart", skip(app_state, customer, session), fields(customer_id = %customer.0))]
pub async fn view_cart_handler(
  app_state: web::Data<AppState>,
  customer: CustomerKey,
  session: Session,
) -> Result<HttpResponse, AppError> {
  let ctx_data = ContextData::new(ViewCartCtxData {
    app_state: app_state.get_ref().clone(),
    customer_id: customer.0.clone(),
    lines: Vec::new(),
    summary: CartSummary::default(),
  });

  if app_state.flows.run(ctx_data.clone()).await? == PipelineResult::Stopped {
    return Err(AppError::PipelineHalted);
  }

  let (lines, summary) = {
    let guard = ctx_data.read();
    (guard.lines.clone(), guard.summary)
  };
  session::store_item_count(&session, summary.item_count)?;

  Ok(HttpResponse::Ok().json(json!({
      "message": "Cart fetched successfully.",
      "lines": lines,
      "itemCount": summary.item_count,
      "totalCents": summary.total_cents,
  })))
}

/// Removing an id that is not in this visitor's cart changes nothing.
#[instrument(name = "handler::remove_from_cart", skip(app_state, customer), fields(customer_id = %customer.0))]
pub async fn remove_from_cart_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i32>,
  customer: CustomerKey,
) -> Result<HttpResponse, AppError> {
  let item_id = path.into_inner();
  let removed = app_state.store.remove_cart_item(&customer.0, item_id).await?;
  info!(item_id, removed, "Remove from cart handled.");
  Ok(redirect_found("/Shop/Cart"))
}
