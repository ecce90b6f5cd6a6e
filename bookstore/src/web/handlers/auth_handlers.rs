// bookstore/src/web/handlers/auth_handlers.rs

use actix_session::Session;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use shopflow::{ContextData, PipelineResult};
use tracing::{info, instrument, warn};

use super::redirect_see_other;
use crate::errors::AppError;
use crate::pipelines::contexts::{SigninCtxData, SignupCtxData};
use crate::state::AppState;
use crate::web::session;

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CredentialsForm {
  pub email: String,
  pub password: String,
}

#[instrument(name = "handler::register", skip(app_state, session, form), fields(req_email = %form.email))]
pub async fn register_handler(
  app_state: web::Data<AppState>,
  session: Session,
  form: web::Form<CredentialsForm>,
) -> Result<HttpResponse, AppError> {
  let CredentialsForm { email, password } = form.into_inner();
  let email = email.trim().to_lowercase();

  let ctx_data = ContextData::new(SignupCtxData {
    app_state: app_state.get_ref().clone(),
    anonymous_customer_id: session::anonymous_customer_id(&session, &email)?,
    email,
    password,
    created_user: None,
    adopted_lines: 0,
  });

  if app_state.flows.run(ctx_data.clone()).await? == PipelineResult::Stopped {
    warn!("Sign-up pipeline was stopped by a handler.");
    return Err(AppError::PipelineHalted);
  }

  let (user, adopted_lines) = {
    let guard = ctx_data.read();
    (guard.created_user.clone(), guard.adopted_lines)
  };
  let user = user.ok_or_else(|| AppError::Internal("Sign-up completed without creating a user.".to_string()))?;
  session::sign_in(&session, &user.email)?;
  info!(user_id = user.id, adopted_lines, "Account registered and signed in.");

  Ok(HttpResponse::Created().json(json!({
      "message": "Account created successfully.",
      "userId": user.id,
      "email": user.email,
      "adoptedLines": adopted_lines,
  })))
}

#[instrument(name = "handler::login", skip(app_state, session, form), fields(req_email = %form.email))]
pub async fn login_handler(
  app_state: web::Data<AppState>,
  session: Session,
  form: web::Form<CredentialsForm>,
) -> Result<HttpResponse, AppError> {
  let CredentialsForm { email, password } = form.into_inner();
  let email = email.trim().to_lowercase();

  let ctx_data = ContextData::new(SigninCtxData {
    app_state: app_state.get_ref().clone(),
    anonymous_customer_id: session::anonymous_customer_id(&session, &email)?,
    email,
    password,
    user: None,
    adopted_lines: 0,
  });

  if app_state.flows.run(ctx_data.clone()).await? == PipelineResult::Stopped {
    warn!("Sign-in pipeline was stopped by a handler.");
    return Err(AppError::Auth("Authentication process was unexpectedly halted.".to_string()));
  }

  let (user, adopted_lines) = {
    let guard = ctx_data.read();
    (guard.user.clone(), guard.adopted_lines)
  };
  let user = user.ok_or_else(|| AppError::Auth("Sign-in completed without user identification.".to_string()))?;
  session::sign_in(&session, &user.email)?;
  info!(user_id = user.id, adopted_lines, "Signed in.");

  Ok(HttpResponse::Ok().json(json!({
      "message": "Signin successful.",
      "userId": user.id,
      "email": user.email,
      "adoptedLines": adopted_lines,
  })))
}

#[instrument(name = "handler::logout", skip(session))]
pub async fn logout_handler(session: Session) -> HttpResponse {
  session.purge();
  info!("Session purged.");
  redirect_see_other("/Shop")
}
