// tests/context_management_tests.rs
mod common;

use common::*;
use serial_test::serial;
use shopflow::{ContextData, Pipeline, PipelineControl};

#[tokio::test]
#[serial]
async fn test_later_steps_see_earlier_writes() {
  setup_tracing();
  let mut pipeline = Pipeline::<TallyContext, TestError>::new(&[("snapshot", false, None), ("total", false, None)]);

  pipeline.on_step("snapshot", |ctx: ContextData<TallyContext>| {
    Box::pin(async move {
      let mut guard = ctx.write();
      guard.lines = vec!["2x1200".to_string(), "1x899".to_string()];
      Ok::<_, TestError>(PipelineControl::Continue)
    })
  });
  pipeline.on_step("total", |ctx: ContextData<TallyContext>| {
    Box::pin(async move {
      let mut guard = ctx.write();
      let sum: i64 = guard
        .lines
        .iter()
        .map(|l| {
          let (qty, price) = l.split_once('x').unwrap();
          qty.parse::<i64>().unwrap() * price.parse::<i64>().unwrap()
        })
        .sum();
      guard.total_cents = sum;
      Ok::<_, TestError>(PipelineControl::Continue)
    })
  });

  let ctx = ContextData::new(TallyContext::default());
  pipeline.run(ctx.clone()).await.unwrap();
  assert_eq!(ctx.read().total_cents, 3299);
}

#[test]
fn test_clones_share_the_same_data() {
  let original = ContextData::new(TallyContext::default());
  let clone = original.clone();
  clone.write().total_cents = 42;
  assert_eq!(original.read().total_cents, 42);
  assert_eq!(*original.map_read(|c| &c.total_cents), 42);
}

#[test]
fn test_try_unwrap_returns_data_only_for_last_handle() {
  let ctx = ContextData::new(TallyContext {
    total_cents: 9,
    ..Default::default()
  });
  let extra = ctx.clone();
  let ctx = ctx.try_unwrap().unwrap_err();
  drop(extra);
  let data = ctx.try_unwrap().unwrap();
  assert_eq!(data.total_cents, 9);
}
