// bookstore/src/pipelines/cart_pipeline.rs

use crate::errors::AppError;
use crate::models::{CartSummary, MAX_LINE_QUANTITY};
use crate::pipelines::contexts::{AddToCartCtxData, ViewCartCtxData};
use shopflow::{ContextData, FlowRegistry, Pipeline, PipelineControl};
use tracing::{info, warn};

pub fn register_add_to_cart_pipeline(flows: &FlowRegistry<AppError>) {
  let mut p = Pipeline::<AddToCartCtxData, AppError>::new(&[
    ("validate_quantity", false, None),
    ("load_book", false, None),
    ("upsert_cart_line", false, None),
  ]);

  p.on_step("validate_quantity", |ctx_data: ContextData<AddToCartCtxData>| {
    Box::pin(async move {
      let quantity = ctx_data.read().quantity;
      if quantity <= 0 {
        warn!(quantity, "Add to Cart: non-positive quantity rejected.");
        return Err(AppError::Validation("Quantity must be a positive number.".to_string()));
      }
      if quantity > MAX_LINE_QUANTITY {
        warn!(quantity, "Add to Cart: quantity above the per-line limit rejected.");
        return Err(AppError::Validation(format!(
          "Quantity cannot exceed {} per book.",
          MAX_LINE_QUANTITY
        )));
      }
      Ok(PipelineControl::Continue)
    })
  });

  p.on_step("load_book", |ctx_data: ContextData<AddToCartCtxData>| {
    Box::pin(async move {
      let (book_id, store) = {
        let guard = ctx_data.read();
        (guard.book_id, guard.app_state.store.clone())
      };

      match store.find_book(book_id).await? {
        Some(book) => {
          ctx_data.write().book = Some(book);
          Ok(PipelineControl::Continue)
        }
        None => {
          warn!(book_id, "Add to Cart: book not found.");
          Err(AppError::NotFound(format!("Book with ID {} not found.", book_id)))
        }
      }
    })
  });

  p.on_step("upsert_cart_line", |ctx_data: ContextData<AddToCartCtxData>| {
    Box::pin(async move {
      let (customer_id, book, quantity, store) = {
        let guard = ctx_data.read();
        (
          guard.customer_id.clone(),
          guard.book.clone(),
          guard.quantity,
          guard.app_state.store.clone(),
        )
      };
      let book = book.ok_or_else(|| AppError::Internal("Book missing after load_book step.".to_string()))?;

      let item = store.add_or_increment(&customer_id, &book, quantity).await?;
      info!(
        %customer_id,
        book_id = book.id,
        new_quantity = item.quantity,
        "Add to Cart: line upserted."
      );
      ctx_data.write().cart_item = Some(item);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  // Keeps the navigation badge in step with the cart just changed.
  p.after_step("upsert_cart_line", |ctx_data: ContextData<AddToCartCtxData>| {
    Box::pin(async move {
      let (customer_id, store) = {
        let guard = ctx_data.read();
        (guard.customer_id.clone(), guard.app_state.store.clone())
      };
      let lines = store.cart_lines(&customer_id).await?;
      ctx_data.write().summary = CartSummary::of(&lines);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  flows.register_pipeline(p);
  info!("Add to Cart pipeline registered.");
}

pub fn register_view_cart_pipeline(flows: &FlowRegistry<AppError>) {
  let mut p = Pipeline::<ViewCartCtxData, AppError>::new(&[
    ("load_cart_lines", false, None),
    ("summarize_cart", false, None),
  ]);

  p.on_step("load_cart_lines", |ctx_data: ContextData<ViewCartCtxData>| {
    Box::pin(async move {
      let (customer_id, store) = {
        let guard = ctx_data.read();
        (guard.customer_id.clone(), guard.app_state.store.clone())
      };
      let lines = store.cart_lines(&customer_id).await?;
      ctx_data.write().lines = lines;
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  p.on_step("summarize_cart", |ctx_data: ContextData<ViewCartCtxData>| {
    Box::pin(async move {
      let summary = CartSummary::of(&ctx_data.read().lines);
      ctx_data.write().summary = summary;
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  flows.register_pipeline(p);
  info!("View Cart pipeline registered.");
}
