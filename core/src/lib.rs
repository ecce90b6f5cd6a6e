// shopflow/src/lib.rs

//! Shopflow: a small asynchronous step-pipeline engine.
//!
//! A [`Pipeline`] is an ordered list of named steps. Each step can carry
//! `before`, `on` and `after` handlers that run against a shared
//! [`ContextData`] and decide whether the flow goes on
//! ([`PipelineControl::Continue`]) or halts early ([`PipelineControl::Stop`]).
//! Steps may be optional or skipped by a predicate over the context.
//!
//! A [`FlowRegistry`] stores one pipeline per context type, so request
//! handlers only need to build a context value and call
//! [`FlowRegistry::run`].

pub mod core;
pub mod error;
pub mod pipeline;
pub mod registry;

pub use crate::core::context::Handler;
pub use crate::core::context_data::ContextData;
pub use crate::core::control::{PipelineControl, PipelineResult};
pub use crate::core::step::{SkipCondition, StepDef};

pub use crate::pipeline::definition::Pipeline;

pub use crate::error::{FlowError, FlowResult};

pub use crate::registry::FlowRegistry;
