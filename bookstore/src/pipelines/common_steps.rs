// bookstore/src/pipelines/common_steps.rs

//! Step bodies shared by the sign-up and sign-in pipelines.

use crate::errors::{AppError, Result as AppResult};
use crate::state::AppState;
use tracing::{event, info, instrument, warn, Level};

pub const MIN_PASSWORD_LEN: usize = 8;

/// Email must look like an address; a non-empty password of at least
/// `min_password_len` characters is required.
pub fn validate_credentials(email: &str, password: &str, min_password_len: usize) -> AppResult<()> {
  event!(Level::DEBUG, email = %email, "Validating credentials input.");
  if email.is_empty() || !email.contains('@') {
    warn!("Invalid email format provided.");
    return Err(AppError::Validation("Valid email is required.".to_string()));
  }
  if password.is_empty() {
    warn!("Empty password provided.");
    return Err(AppError::Validation("Password is required.".to_string()));
  }
  if password.chars().count() < min_password_len {
    warn!(min_password_len, "Password too short.");
    return Err(AppError::Validation(format!(
      "Password must be at least {} characters long.",
      min_password_len
    )));
  }
  Ok(())
}

/// Moves the visitor's anonymous cart under the principal that just signed
/// in, so the customer key and the principal stay the same thing.
#[instrument(name = "common_step::adopt_anonymous_cart", skip(app_state), err(Display))]
pub async fn adopt_anonymous_cart(app_state: &AppState, anonymous_customer_id: &str, principal: &str) -> AppResult<u64> {
  let moved = app_state.store.adopt_cart(anonymous_customer_id, principal).await?;
  info!(moved, "Anonymous cart adopted.");
  Ok(moved)
}
