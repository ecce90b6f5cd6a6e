// bookstore/src/pipelines/signin_pipeline.rs

use crate::errors::AppError;
use crate::pipelines::common_steps;
use crate::pipelines::contexts::SigninCtxData;
use crate::services::auth_service;
use shopflow::{ContextData, FlowRegistry, Pipeline, PipelineControl, SkipCondition};
use std::sync::Arc;
use tracing::{event, info, warn, Level};

/// Registers the sign-in pipeline.
pub fn register_signin_pipeline(flows: &FlowRegistry<AppError>) {
  let no_anonymous_cart: SkipCondition<SigninCtxData> =
    Arc::new(|ctx_data: ContextData<SigninCtxData>| ctx_data.read().anonymous_customer_id.is_none());

  let mut signin_p = Pipeline::<SigninCtxData, AppError>::new(&[
    ("validate_signin_input", false, None),
    ("fetch_user_by_email", false, None),
    ("verify_user_password", false, None),
    ("adopt_anonymous_cart", false, Some(no_anonymous_cart)),
  ]);

  signin_p.on_step("validate_signin_input", |ctx_data: ContextData<SigninCtxData>| {
    Box::pin(async move {
      let guard = ctx_data.read();
      common_steps::validate_credentials(&guard.email, &guard.password, 1)?;
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  signin_p.on_step("fetch_user_by_email", |ctx_data: ContextData<SigninCtxData>| {
    Box::pin(async move {
      let (email, store) = {
        let guard = ctx_data.read();
        (guard.email.clone(), guard.app_state.store.clone())
      };

      event!(Level::DEBUG, %email, "Fetching user by email for sign-in.");
      match store.find_user_by_email(&email).await? {
        Some(user) => {
          event!(Level::INFO, user_id = user.id, "User found for sign-in.");
          ctx_data.write().user = Some(user);
          Ok(PipelineControl::Continue)
        }
        None => {
          warn!(%email, "No user for sign-in email.");
          Err(AppError::Auth("Invalid email or password.".to_string()))
        }
      }
    })
  });

  signin_p.on_step("verify_user_password", |ctx_data: ContextData<SigninCtxData>| {
    Box::pin(async move {
      let guard = ctx_data.read();
      let user = guard
        .user
        .as_ref()
        .ok_or_else(|| AppError::Internal("User missing after fetch_user_by_email step.".to_string()))?;

      if auth_service::verify_password(&user.password_hash, &guard.password)? {
        event!(Level::INFO, user_id = user.id, "Password verified for sign-in.");
        Ok(PipelineControl::Continue)
      } else {
        warn!(user_id = user.id, "Password mismatch on sign-in.");
        Err(AppError::Auth("Invalid email or password.".to_string()))
      }
    })
  });

  signin_p.on_step("adopt_anonymous_cart", |ctx_data: ContextData<SigninCtxData>| {
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

  flows.register_pipeline(signin_p);
  info!("Sign-in pipeline registered.");
}
