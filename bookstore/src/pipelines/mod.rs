// bookstore/src/pipelines/mod.rs

//! Every multi-step request flow of the shop, expressed as a `shopflow`
//! pipeline and registered once at startup.

use crate::errors::AppError;
use shopflow::FlowRegistry;

pub mod common_steps;
pub mod contexts;

pub mod cart_pipeline;
pub mod checkout_pipeline;
pub mod signin_pipeline;
pub mod signup_pipeline;

/// Registers all pipelines with `flows`.
pub fn register_all_pipelines(flows: &FlowRegistry<AppError>) {
  tracing::info!("Registering shop pipelines...");

  cart_pipeline::register_add_to_cart_pipeline(flows);
  cart_pipeline::register_view_cart_pipeline(flows);
  checkout_pipeline::register_build_draft_pipeline(flows);
  checkout_pipeline::register_start_payment_pipeline(flows);
  checkout_pipeline::register_save_order_pipeline(flows);
  signup_pipeline::register_signup_pipeline(flows);
  signin_pipeline::register_signin_pipeline(flows);

  tracing::info!("All shop pipelines registered.");
}
