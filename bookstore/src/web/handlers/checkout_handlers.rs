// bookstore/src/web/handlers/checkout_handlers.rs

use actix_session::Session;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use shopflow::{ContextData, PipelineResult};
use tracing::{info, instrument, warn};

use super::{redirect_found, redirect_see_other};
use crate::checkout::CheckoutStage;
use crate::errors::AppError;
use crate::models::ShippingDetails;
use crate::pipelines::contexts::{BuildDraftCtxData, SaveOrderCtxData, StartPaymentCtxData};
use crate::state::AppState;
use crate::web::extractors::{CustomerKey, SignedInUser};
use crate::web::session;

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct CheckoutForm {
  pub first_name: String,
  pub last_name: String,
  pub address: String,
  pub city: String,
  pub province: String,
  pub postal_code: String,
  pub phone: String,
}

impl From<CheckoutForm> for ShippingDetails {
  fn from(form: CheckoutForm) -> Self {
    ShippingDetails {
      first_name: form.first_name.trim().to_string(),
      last_name: form.last_name.trim().to_string(),
      address: form.address.trim().to_string(),
      city: form.city.trim().to_string(),
      province: form.province.trim().to_string(),
      postal_code: form.postal_code.trim().to_string(),
      phone: form.phone.trim().to_string(),
    }
  }
}

#[derive(Deserialize, Debug)]
pub struct SaveOrderQuery {
  pub session_id: Option<String>,
}

/// Shipping fields of the current draft, for pre-filling the form.
#[instrument(name = "handler::checkout_form", skip(session))]
pub async fn checkout_form_handler(session: Session) -> Result<HttpResponse, AppError> {
  let stage = session::checkout_stage(&session)?;
  let draft = session::load_draft(&session)?;
  Ok(HttpResponse::Ok().json(json!({
      "message": "Checkout form.",
      "stage": stage,
      "shipping": draft.map(|d| d.shipping),
  })))
}

#[instrument(
    name = "handler::submit_checkout",
    skip(app_state, user, customer, session, form),
    fields(user = %user.email, customer_id = %customer.0)
)]
pub async fn submit_checkout_handler(
  app_state: web::Data<AppState>,
  user: SignedInUser,
  customer: CustomerKey,
  session: Session,
  form: web::Form<CheckoutForm>,
) -> Result<HttpResponse, AppError> {
  let ctx_data = ContextData::new(BuildDraftCtxData {
    app_state: app_state.get_ref().clone(),
    customer_id: customer.0.clone(),
    shipping: form.into_inner().into(),
    current_stage: session::checkout_stage(&session)?,
    lines: Vec::new(),
    draft: None,
  });

  match app_state.flows.run(ctx_data.clone()).await? {
    PipelineResult::Completed => {
      let draft = ctx_data
        .read()
        .draft
        .clone()
        .ok_or_else(|| AppError::Internal("Build Draft completed without a draft.".to_string()))?;
      session::store_draft(&session, &draft, CheckoutStage::DraftBuilt)?;
      info!(total_cents = draft.total_cents, "Draft order stored in session.");
      Ok(redirect_see_other("/Shop/Payment"))
    }
    PipelineResult::Stopped => {
      info!("No draft built; back to the cart.");
      Ok(redirect_see_other("/Shop/Cart"))
    }
  }
}

#[instrument(name = "handler::start_payment", skip(app_state, session))]
pub async fn start_payment_handler(
  app_state: web::Data<AppState>,
  session: Session,
) -> Result<HttpResponse, AppError> {
  let stage = session::checkout_stage(&session)?;
  let draft = match session::load_draft(&session)? {
    Some(draft) if stage.can_transition_to(CheckoutStage::PaymentPending) => draft,
    _ => {
      warn!(?stage, "Payment requested without a draft order.");
      return Ok(redirect_found("/Shop/Checkout"));
    }
  };

  let ctx_data = ContextData::new(StartPaymentCtxData {
    app_state: app_state.get_ref().clone(),
    draft,
    hosted: None,
  });
  if app_state.flows.run(ctx_data.clone()).await? == PipelineResult::Stopped {
    return Err(AppError::PipelineHalted);
  }

  let (draft, hosted) = {
    let guard = ctx_data.read();
    (guard.draft.clone(), guard.hosted.clone())
  };
  let hosted = hosted.ok_or_else(|| AppError::Internal("Start Payment completed without a session.".to_string()))?;
  session::store_draft(&session, &draft, CheckoutStage::PaymentPending)?;
  info!(session_id = %hosted.id, "Redirecting to hosted payment page.");
  Ok(redirect_see_other(&hosted.url))
}

/// Success callback of the hosted payment page.
#[instrument(name = "handler::save_order", skip(app_state, session, query), fields(session_id = ?query.session_id))]
pub async fn save_order_handler(
  app_state: web::Data<AppState>,
  session: Session,
  query: web::Query<SaveOrderQuery>,
) -> Result<HttpResponse, AppError> {
  let stage = session::checkout_stage(&session)?;
  let draft = match session::load_draft(&session)? {
    Some(draft) if stage.can_transition_to(CheckoutStage::Settled) => draft,
    _ => {
      warn!(?stage, "Save Order without a pending payment; nothing to persist.");
      return Ok(redirect_found("/Shop/Cart"));
    }
  };

  let ctx_data = ContextData::new(SaveOrderCtxData {
    app_state: app_state.get_ref().clone(),
    draft,
    callback_session_id: query.into_inner().session_id,
    order: None,
  });
  if app_state.flows.run(ctx_data.clone()).await? == PipelineResult::Stopped {
    return Err(AppError::PipelineHalted);
  }

  let order = ctx_data
    .read()
    .order
    .clone()
    .ok_or_else(|| AppError::Internal("Save Order completed without an order.".to_string()))?;
  session::clear_checkout(&session);
  info!(order_id = order.id, "Checkout settled; session checkout state cleared.");
  Ok(redirect_found(&format!("/Orders/Details/{}", order.id)))
}
