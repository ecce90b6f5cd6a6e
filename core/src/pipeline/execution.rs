// shopflow/src/pipeline/execution.rs

//! `Pipeline::run`.

use crate::core::context::Handler;
use crate::core::context_data::ContextData;
use crate::core::control::{PipelineControl, PipelineResult};
use crate::core::step::StepDef;
use crate::error::FlowError;
use crate::pipeline::definition::Pipeline;
use tracing::{event, instrument, span, Instrument, Level};

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  /// Runs every step in order against `ctx_data`.
  ///
  /// A step is skipped when its `skip_if` predicate holds. A step with no
  /// handlers at all is passed over when optional and is a
  /// `FlowError::HandlerMissing` otherwise. Within a step the phases run as
  /// before, on, after; the first `Stop` ends the run with
  /// `PipelineResult::Stopped` and the first error is returned unchanged.
  #[instrument(
    name = "Pipeline::run",
    skip_all,
    fields(
      context_type = %std::any::type_name::<TData>(),
      num_steps = self.steps.len(),
    ),
    err(Display)
  )]
  pub async fn run(&self, ctx_data: ContextData<TData>) -> Result<PipelineResult, Err> {
    event!(Level::DEBUG, "Pipeline run starting.");

    for (step_idx, step_def) in self.steps.iter().enumerate() {
      let step_span = span!(
        Level::INFO,
        "pipeline_step",
        step_name = step_def.name.as_str(),
        step_index = step_idx,
        optional = step_def.optional
      );
      match self.run_step(step_def, &ctx_data).instrument(step_span).await? {
        PipelineControl::Continue => {}
        PipelineControl::Stop => return Ok(PipelineResult::Stopped),
      }
    }

    event!(Level::DEBUG, "Pipeline run completed.");
    Ok(PipelineResult::Completed)
  }

  async fn run_step(&self, step_def: &StepDef<TData>, ctx_data: &ContextData<TData>) -> Result<PipelineControl, Err> {
    let step_name = step_def.name.as_str();

    if let Some(skip_if) = &step_def.skip_if {
      if skip_if(ctx_data.clone()) {
        event!(Level::INFO, "Step skipped by its condition.");
        return Ok(PipelineControl::Continue);
      }
    }

    let phases = [("before", &self.before), ("on", &self.on), ("after", &self.after)];
    let has_handlers = phases
      .iter()
      .any(|(_, table)| table.get(step_name).map_or(false, |v| !v.is_empty()));

    if !has_handlers {
      if step_def.optional {
        event!(Level::DEBUG, "Optional step has no handlers, passing over it.");
        return Ok(PipelineControl::Continue);
      }
      event!(Level::ERROR, "Mandatory step has no handlers.");
      return Err(Err::from(FlowError::HandlerMissing {
        step_name: step_def.name.clone(),
      }));
    }

    for (phase_name, table) in phases {
      let Some(handlers) = table.get(step_name) else {
        continue;
      };
      if Self::run_phase(phase_name, handlers, ctx_data).await? == PipelineControl::Stop {
        event!(Level::INFO, phase = phase_name, "Pipeline stopped by a handler.");
        return Ok(PipelineControl::Stop);
      }
    }
    event!(Level::DEBUG, "Step finished.");
    Ok(PipelineControl::Continue)
  }

  async fn run_phase(
    phase_name: &'static str,
    handlers: &[Handler<TData, Err>],
    ctx_data: &ContextData<TData>,
  ) -> Result<PipelineControl, Err> {
    for (handler_idx, handler_fn) in handlers.iter().enumerate() {
      event!(Level::TRACE, phase = phase_name, handler_index = handler_idx, "Running handler.");
      match handler_fn(ctx_data.clone()).await {
        Ok(PipelineControl::Continue) => {}
        Ok(PipelineControl::Stop) => return Ok(PipelineControl::Stop),
        Err(e) => {
          event!(Level::ERROR, phase = phase_name, handler_index = handler_idx, error = %e, "Handler failed.");
          return Err(e);
        }
      }
    }
    Ok(PipelineControl::Continue)
  }
}
