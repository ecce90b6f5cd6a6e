// bookstore/src/pipelines/contexts.rs

//! Per-request data the pipelines run against. Handlers wrap these in
//! `shopflow::ContextData` and read the results back after the run.

use crate::checkout::CheckoutStage;
use crate::gateway::HostedCheckout;
use crate::models::{Book, CartItem, CartLine, CartSummary, Order, OrderDraft, ShippingDetails, User};
use crate::state::AppState;

#[derive(Clone)]
pub struct AddToCartCtxData {
  pub app_state: AppState,
  pub customer_id: String,
  pub book_id: i32,
  pub quantity: i32,
  pub book: Option<Book>,
  pub cart_item: Option<CartItem>,
  pub summary: CartSummary,
}

#[derive(Clone)]
pub struct ViewCartCtxData {
  pub app_state: AppState,
  pub customer_id: String,
  pub lines: Vec<CartLine>,
  pub summary: CartSummary,
}

#[derive(Clone)]
pub struct BuildDraftCtxData {
  pub app_state: AppState,
  pub customer_id: String,
  pub shipping: ShippingDetails,
  pub current_stage: CheckoutStage,
  pub lines: Vec<CartLine>,
  pub draft: Option<OrderDraft>,
}

#[derive(Clone)]
pub struct StartPaymentCtxData {
  pub app_state: AppState,
  pub draft: OrderDraft,
  pub hosted: Option<HostedCheckout>,
}

#[derive(Clone)]
pub struct SaveOrderCtxData {
  pub app_state: AppState,
  pub draft: OrderDraft,
  /// `session_id` query parameter of the success callback.
  pub callback_session_id: Option<String>,
  pub order: Option<Order>,
}

#[derive(Clone)]
pub struct SignupCtxData {
  pub app_state: AppState,
  pub email: String,
  pub password: String,
  /// Customer key bound to the session before registering, if anonymous.
  pub anonymous_customer_id: Option<String>,
  pub created_user: Option<User>,
  pub adopted_lines: u64,
}

#[derive(Clone)]
pub struct SigninCtxData {
  pub app_state: AppState,
  pub email: String,
  pub password: String,
  pub anonymous_customer_id: Option<String>,
  pub user: Option<User>,
  pub adopted_lines: u64,
}
