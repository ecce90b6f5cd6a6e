// bookstore/src/pipelines/signup_pipeline.rs

use crate::errors::AppError;
use crate::pipelines::common_steps::{self, MIN_PASSWORD_LEN};
use crate::pipelines::contexts::SignupCtxData;
use crate::services::auth_service;
use shopflow::{ContextData, FlowRegistry, Pipeline, PipelineControl, SkipCondition};
use std::sync::Arc;
use tracing::{event, info, warn, Level};

/// Registers the account registration pipeline.
pub fn register_signup_pipeline(flows: &FlowRegistry<AppError>) {
  let no_anonymous_cart: SkipCondition<SignupCtxData> =
    Arc::new(|ctx_data: ContextData<SignupCtxData>| ctx_data.read().anonymous_customer_id.is_none());

  let mut signup_p = Pipeline::<SignupCtxData, AppError>::new(&[
    ("validate_signup_input", false, None),
    ("check_existing_user", false, None),
    ("create_user", false, None),
    ("adopt_anonymous_cart", false, Some(no_anonymous_cart)),
  ]);

  signup_p.on_step("validate_signup_input", |ctx_data: ContextData<SignupCtxData>| {
    Box::pin(async move {
      let guard = ctx_data.read();
      common_steps::validate_credentials(&guard.email, &guard.password, MIN_PASSWORD_LEN)?;
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  signup_p.on_step("check_existing_user", |ctx_data: ContextData<SignupCtxData>| {
    Box::pin(async move {
      let (email, store) = {
        let guard = ctx_data.read();
        (guard.email.clone(), guard.app_state.store.clone())
      };

      if store.find_user_by_email(&email).await?.is_some() {
        warn!(%email, "Attempt to register an existing email.");
        return Err(AppError::Validation("An account with this email already exists.".to_string()));
      }
      event!(Level::DEBUG, %email, "Email is available.");
      Ok(PipelineControl::Continue)
    })
  });

  signup_p.on_step("create_user", |ctx_data: ContextData<SignupCtxData>| {
    Box::pin(async move {
      let (email, password, store) = {
        let guard = ctx_data.read();
        (guard.email.clone(), guard.password.clone(), guard.app_state.store.clone())
      };

      let password_hash = auth_service::hash_password(&password)?;
      let user = store.create_user(&email, &password_hash).await?;
      info!(user_id = user.id, email = %user.email, "User created.");
      ctx_data.write().created_user = Some(user);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  signup_p.on_step("adopt_anonymous_cart", |ctx_data: ContextData<SignupCtxData>| {
    Box::pin(async move {
      let (app_state, anonymous, email) = {
        let guard = ctx_data.read();
        (guard.app_state.clone(), guard.anonymous_customer_id.clone(), guard.email.clone())
      };
      if let Some(anonymous) = anonymous {
        let moved = common_steps::adopt_anonymous_cart(&app_state, &anonymous, &email).await?;
        ctx_data.write().adopted_lines = moved;
      }
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  flows.register_pipeline(signup_p);
  info!("Sign-up pipeline registered.");
}
