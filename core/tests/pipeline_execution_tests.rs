// tests/pipeline_execution_tests.rs
mod common;

use common::*;
use serial_test::serial;
use shopflow::{ContextData, FlowError, Pipeline, PipelineControl, PipelineResult};
use std::sync::Arc;

#[tokio::test]
#[serial]
async fn test_steps_run_in_declared_order() {
  setup_tracing();
  let mut pipeline = Pipeline::<TallyContext, TestError>::new(&[
    ("load", false, None),
    ("price", false, None),
    ("save", false, None),
  ]);
  pipeline.on_step("load", add_line_handler("load", 100));
  pipeline.on_step("price", add_line_handler("price", 250));
  pipeline.on_step("save", add_line_handler("save", 0));

  let ctx = ContextData::new(TallyContext::default());
  let result = pipeline.run(ctx.clone()).await;

  assert_eq!(result.unwrap(), PipelineResult::Completed);
  let guard = ctx.read();
  assert_eq!(guard.total_cents, 350);
  assert_eq!(guard.trail, vec!["load", "price", "save"]);
}

#[tokio::test]
#[serial]
async fn test_stop_halts_remaining_steps() {
  setup_tracing();
  let mut pipeline = Pipeline::<TallyContext, TestError>::new(&[
    ("first", false, None),
    ("halt", false, None),
    ("never", false, None),
  ]);
  pipeline.on_step("first", add_line_handler("first", 10));
  pipeline.on_step("halt", add_line_handler("halt", 20));
  pipeline.on_step("never", add_line_handler("never", 1000));

  let ctx = ContextData::new(TallyContext {
    stop_at: Some("halt".to_string()),
    ..Default::default()
  });
  let result = pipeline.run(ctx.clone()).await;

  assert_eq!(result.unwrap(), PipelineResult::Stopped);
  let guard = ctx.read();
  assert_eq!(guard.total_cents, 30);
  assert_eq!(guard.trail, vec!["first", "halt"]);
}

#[tokio::test]
#[serial]
async fn test_handler_error_is_returned_and_later_steps_do_not_run() {
  setup_tracing();
  let mut pipeline = Pipeline::<TallyContext, TestError>::new(&[
    ("ok_step", false, None),
    ("bad_step", false, None),
    ("after_bad", false, None),
  ]);
  pipeline.on_step("ok_step", add_line_handler("ok_step", 5));
  pipeline.on_step("bad_step", failing_handler("bad_step", "book vanished"));
  pipeline.on_step("after_bad", add_line_handler("after_bad", 5));

  let ctx = ContextData::new(TallyContext::default());
  let err = pipeline.run(ctx.clone()).await.unwrap_err();

  assert_eq!(err, TestError::Handler("book vanished".to_string()));
  assert_eq!(ctx.read().trail, vec!["ok_step", "bad_step"]);
}

#[tokio::test]
#[serial]
async fn test_skip_condition_is_evaluated_against_current_context() {
  setup_tracing();
  let mut pipeline = Pipeline::<TallyContext, TestError>::new(&[
    ("load", false, None),
    (
      "apply_when_empty",
      false,
      Some(Arc::new(|ctx: ContextData<TallyContext>| ctx.read().total_cents > 0)),
    ),
    ("save", false, None),
  ]);
  pipeline.on_step("load", add_line_handler("load", 40));
  pipeline.on_step("apply_when_empty", add_line_handler("apply_when_empty", 999));
  pipeline.on_step("save", add_line_handler("save", 0));

  let ctx = ContextData::new(TallyContext::default());
  assert_eq!(pipeline.run(ctx.clone()).await.unwrap(), PipelineResult::Completed);
  assert_eq!(ctx.read().trail, vec!["load", "save"]);
  assert_eq!(ctx.read().total_cents, 40);
}

#[tokio::test]
#[serial]
async fn test_set_skip_condition_replaces_predicate() {
  setup_tracing();
  let mut pipeline = Pipeline::<TallyContext, TestError>::new(&[("only", false, None)]);
  pipeline.on_step("only", add_line_handler("only", 1));
  pipeline
    .set_skip_condition("only", Some(Arc::new(|_ctx: ContextData<TallyContext>| true)))
    .unwrap();

  let ctx = ContextData::new(TallyContext::default());
  pipeline.run(ctx.clone()).await.unwrap();
  assert!(ctx.read().trail.is_empty());

  let missing = pipeline.set_skip_condition("nope", None).unwrap_err();
  assert!(matches!(missing, FlowError::StepNotFound { step_name } if step_name == "nope"));
}

#[tokio::test]
#[serial]
async fn test_optional_step_without_handlers_is_passed_over() {
  setup_tracing();
  let mut pipeline = Pipeline::<TallyContext, TestError>::new(&[
    ("load", false, None),
    ("notify", true, None),
    ("save", false, None),
  ]);
  pipeline.on_step("load", add_line_handler("load", 1));
  pipeline.on_step("save", add_line_handler("save", 1));

  let ctx = ContextData::new(TallyContext::default());
  assert_eq!(pipeline.run(ctx.clone()).await.unwrap(), PipelineResult::Completed);
  assert_eq!(ctx.read().trail, vec!["load", "save"]);
}

#[tokio::test]
#[serial]
async fn test_before_on_after_phases_run_in_that_order() {
  setup_tracing();
  let mut pipeline = Pipeline::<TallyContext, TestError>::new(&[("step", false, None)]);
  pipeline.after_step("step", |ctx: ContextData<TallyContext>| {
    Box::pin(async move {
      ctx.write().trail.push("after".to_string());
      Ok::<_, TestError>(PipelineControl::Continue)
    })
  });
  pipeline.on_step("step", |ctx: ContextData<TallyContext>| {
    Box::pin(async move {
      ctx.write().trail.push("on".to_string());
      Ok::<_, TestError>(PipelineControl::Continue)
    })
  });
  pipeline.before_step("step", |ctx: ContextData<TallyContext>| {
    Box::pin(async move {
      ctx.write().trail.push("before".to_string());
      Ok::<_, TestError>(PipelineControl::Continue)
    })
  });

  let ctx = ContextData::new(TallyContext::default());
  pipeline.run(ctx.clone()).await.unwrap();
  assert_eq!(ctx.read().trail, vec!["before", "on", "after"]);
}

#[tokio::test]
#[serial]
async fn test_stop_in_before_phase_skips_on_handlers() {
  setup_tracing();
  let mut pipeline = Pipeline::<TallyContext, TestError>::new(&[("guarded", false, None)]);
  pipeline.before_step("guarded", |_ctx: ContextData<TallyContext>| {
    Box::pin(async move { Ok::<_, TestError>(PipelineControl::Stop) })
  });
  pipeline.on_step("guarded", add_line_handler("guarded", 10));

  let ctx = ContextData::new(TallyContext::default());
  assert_eq!(pipeline.run(ctx.clone()).await.unwrap(), PipelineResult::Stopped);
  assert_eq!(ctx.read().total_cents, 0);
}

#[tokio::test]
#[serial]
async fn test_handlers_can_await_between_lock_scopes() {
  setup_tracing();
  let mut pipeline = Pipeline::<TallyContext, TestError>::new(&[("slow", false, None)]);
  pipeline.on_step("slow", |ctx: ContextData<TallyContext>| {
    Box::pin(async move {
      let before = { ctx.read().total_cents };
      tokio::time::sleep(std::time::Duration::from_millis(5)).await;
      ctx.write().total_cents = before + 7;
      Ok::<_, TestError>(PipelineControl::Continue)
    })
  });

  let ctx = ContextData::new(TallyContext::default());
  pipeline.run(ctx.clone()).await.unwrap();
  assert_eq!(ctx.read().total_cents, 7);
}

#[test]
#[should_panic(expected = "not part of this pipeline")]
fn test_registering_handler_for_unknown_step_panics() {
  let mut pipeline = Pipeline::<TallyContext, TestError>::new(&[("known", false, None)]);
  pipeline.on_step("unknown", add_line_handler("unknown", 0));
}
