// tests/common/mod.rs
#![allow(dead_code)]

use shopflow::{ContextData, FlowError, PipelineControl};
use tracing::Level;

/// Context used across the engine tests: a running tally of priced lines
/// plus a trail of the steps that actually ran.
#[derive(Clone, Debug, Default)]
pub struct TallyContext {
  pub total_cents: i64,
  pub lines: Vec<String>,
  pub trail: Vec<String>,
  pub stop_at: Option<String>,
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TestError {
  #[error("shopflow error: {0}")]
  Flow(String),

  #[error("handler failed: {0}")]
  Handler(String),
}

impl From<FlowError> for TestError {
  fn from(fe: FlowError) -> Self {
    TestError::Flow(format!("{:?}", fe))
  }
}

/// Handler that records `step_name`, adds one priced line and stops if the
/// context asks it to.
pub fn add_line_handler(step_name: &'static str, amount_cents: i64) -> shopflow::Handler<TallyContext, TestError> {
  Box::new(move |ctx: ContextData<TallyContext>| {
    Box::pin(async move {
      let mut guard = ctx.write();
      guard.total_cents += amount_cents;
      guard.lines.push(format!("{}:{}", step_name, amount_cents));
      guard.trail.push(step_name.to_string());
      tracing::debug!(target: "test_handlers", step = step_name, total = guard.total_cents, "line added");
      if guard.stop_at.as_deref() == Some(step_name) {
        return Ok(PipelineControl::Stop);
      }
      Ok(PipelineControl::Continue)
    })
  })
}

pub fn failing_handler(step_name: &'static str, reason: &'static str) -> shopflow::Handler<TallyContext, TestError> {
  Box::new(move |ctx: ContextData<TallyContext>| {
    Box::pin(async move {
      ctx.write().trail.push(step_name.to_string());
      Err(TestError::Handler(reason.to_string()))
    })
  })
}

use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
