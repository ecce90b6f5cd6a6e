// shopflow/src/core/context.rs

//! The boxed handler type stored by a pipeline.

use crate::core::context_data::ContextData;
use crate::core::control::PipelineControl;
use std::future::Future;
use std::pin::Pin;

/// A step handler: takes a clone of the shared context handle and resolves
/// to a control signal or the pipeline's error type.
///
/// Handlers lock the context with `.read()` / `.write()` and must release
/// the guard before awaiting anything.
pub type Handler<TData, Err> = Box<
  dyn Fn(ContextData<TData>) -> Pin<Box<dyn Future<Output = Result<PipelineControl, Err>> + Send>>
    + Send
    + Sync,
>;
