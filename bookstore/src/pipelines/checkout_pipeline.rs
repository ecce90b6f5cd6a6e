// bookstore/src/pipelines/checkout_pipeline.rs

//! Checkout in three request-sized pipelines: build the draft from the cart,
//! open a hosted payment session for it, and persist it once paid.

use crate::checkout::CheckoutStage;
use crate::errors::AppError;
use crate::gateway::{CheckoutSessionRequest, GatewayLineItem, SESSION_ID_PLACEHOLDER};
use crate::models::OrderDraft;
use crate::pipelines::contexts::{BuildDraftCtxData, SaveOrderCtxData, StartPaymentCtxData};
use chrono::Utc;
use shopflow::{ContextData, FlowRegistry, Pipeline, PipelineControl, SkipCondition};
use std::sync::Arc;
use tracing::{error, info, warn};
use validator::Validate;

pub fn register_build_draft_pipeline(flows: &FlowRegistry<AppError>) {
  let mut p = Pipeline::<BuildDraftCtxData, AppError>::new(&[
    ("validate_shipping", false, None),
    ("snapshot_cart", false, None),
    ("build_draft", false, None),
  ]);

  p.on_step("validate_shipping", |ctx_data: ContextData<BuildDraftCtxData>| {
    Box::pin(async move {
      let (shipping, stage) = {
        let guard = ctx_data.read();
        (guard.shipping.clone(), guard.current_stage)
      };
      if !stage.can_transition_to(CheckoutStage::DraftBuilt) {
        warn!(?stage, "Checkout: draft cannot be rebuilt from this stage.");
        return Ok(PipelineControl::Stop);
      }
      shipping.validate()?;
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  p.on_step("snapshot_cart", |ctx_data: ContextData<BuildDraftCtxData>| {
    Box::pin(async move {
      let (customer_id, store) = {
        let guard = ctx_data.read();
        (guard.customer_id.clone(), guard.app_state.store.clone())
      };
      let lines = store.cart_lines(&customer_id).await?;
      if lines.is_empty() {
        info!(%customer_id, "Checkout: cart is empty, nothing to draft.");
        return Ok(PipelineControl::Stop);
      }
      ctx_data.write().lines = lines;
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  p.on_step("build_draft", |ctx_data: ContextData<BuildDraftCtxData>| {
    Box::pin(async move {
      let mut guard = ctx_data.write();
      let draft = OrderDraft::from_cart(&guard.customer_id, guard.shipping.clone(), &guard.lines, Utc::now());
      info!(
        customer_id = %draft.customer_id,
        total_cents = draft.total_cents,
        lines = draft.lines.len(),
        "Checkout: draft order built."
      );
      guard.draft = Some(draft);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  flows.register_pipeline(p);
  info!("Build Draft pipeline registered.");
}

pub fn register_start_payment_pipeline(flows: &FlowRegistry<AppError>) {
  let mut p = Pipeline::<StartPaymentCtxData, AppError>::new(&[
    ("open_payment_session", false, None),
    ("record_session_id", false, None),
  ]);

  p.on_step("open_payment_session", |ctx_data: ContextData<StartPaymentCtxData>| {
    Box::pin(async move {
      let (request, gateway) = {
        let guard = ctx_data.read();
        let config = &guard.app_state.config;
        let request = CheckoutSessionRequest {
          client_reference: guard.draft.customer_id.clone(),
          currency: config.currency.clone(),
          line_items: guard
            .draft
            .lines
            .iter()
            .map(|line| GatewayLineItem {
              name: line.title.clone(),
              unit_amount_cents: i64::from(line.price_cents),
              quantity: i64::from(line.quantity),
            })
            .collect(),
          success_url: format!(
            "{}/Shop/SaveOrder?session_id={}",
            config.app_base_url, SESSION_ID_PLACEHOLDER
          ),
          cancel_url: format!("{}/Shop/Cart", config.app_base_url),
        };
        (request, guard.app_state.gateway.clone())
      };

      let hosted = gateway.create_checkout_session(&request).await?;
      info!(session_id = %hosted.id, amount_cents = request.amount_total_cents(), "Checkout: payment session opened.");
      ctx_data.write().hosted = Some(hosted);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  p.on_step("record_session_id", |ctx_data: ContextData<StartPaymentCtxData>| {
    Box::pin(async move {
      let mut guard = ctx_data.write();
      let session_id = guard
        .hosted
        .as_ref()
        .map(|h| h.id.clone())
        .ok_or_else(|| AppError::Internal("Payment session missing after open_payment_session step.".to_string()))?;
      guard.draft.payment_session_id = Some(session_id);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  flows.register_pipeline(p);
  info!("Start Payment pipeline registered.");
}

pub fn register_save_order_pipeline(flows: &FlowRegistry<AppError>) {
  let no_payment_session: SkipCondition<SaveOrderCtxData> =
    Arc::new(|ctx_data: ContextData<SaveOrderCtxData>| ctx_data.read().draft.payment_session_id.is_none());

  let mut p = Pipeline::<SaveOrderCtxData, AppError>::new(&[
    ("verify_payment", false, Some(no_payment_session)),
    ("settle_order", false, None),
  ]);

  p.on_step("verify_payment", |ctx_data: ContextData<SaveOrderCtxData>| {
    Box::pin(async move {
      let (expected, received, gateway) = {
        let guard = ctx_data.read();
        (
          guard.draft.payment_session_id.clone(),
          guard.callback_session_id.clone(),
          guard.app_state.gateway.clone(),
        )
      };
      let expected = expected.unwrap_or_default();

      if received.as_deref() != Some(expected.as_str()) {
        warn!(%expected, ?received, "Save Order: callback session id does not match the draft.");
        return Err(AppError::Payment(
          "Payment session does not match the pending order.".to_string(),
        ));
      }
      if !gateway.is_session_paid(&expected).await? {
        warn!(session_id = %expected, "Save Order: payment not completed.");
        return Err(AppError::Payment("Payment has not been completed.".to_string()));
      }
      info!(session_id = %expected, "Save Order: payment confirmed.");
      Ok(PipelineControl::Continue)
    })
  });

  p.on_step("settle_order", |ctx_data: ContextData<SaveOrderCtxData>| {
    Box::pin(async move {
      let (draft, store) = {
        let guard = ctx_data.read();
        (guard.draft.clone(), guard.app_state.store.clone())
      };
      if draft.total_cents != draft.lines_total_cents() {
        error!(
          total_cents = draft.total_cents,
          lines_total_cents = draft.lines_total_cents(),
          "Save Order: draft total disagrees with its lines."
        );
        return Err(AppError::Internal("Draft order total is inconsistent.".to_string()));
      }

      let order = store.settle_order(&draft).await?;
      info!(order_id = order.id, customer_id = %order.customer_id, "Save Order: order settled.");
      ctx_data.write().order = Some(order);
      Ok(PipelineControl::Continue)
    })
  });

  flows.register_pipeline(p);
  info!("Save Order pipeline registered.");
}
