// bookstore/src/web/extractors.rs

use crate::errors::AppError;
use crate::web::session::{resolve_customer_id, signed_in_user};
use actix_session::SessionExt;
use actix_web::{dev::Payload, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};
use tracing::warn;

/// The visitor's customer key, resolved (and bound to the session if new)
/// before the handler runs.
#[derive(Debug, Clone)]
pub struct CustomerKey(pub String);

impl FromRequest for CustomerKey {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    ready(resolve_customer_id(&req.get_session()).map(CustomerKey))
  }
}

/// A signed-in principal; rejects the request with 401 otherwise.
#[derive(Debug, Clone)]
pub struct SignedInUser {
  pub email: String,
}

impl FromRequest for SignedInUser {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    let result = match signed_in_user(&req.get_session()) {
      Ok(Some(email)) => Ok(SignedInUser { email }),
      Ok(None) => {
        warn!(path = %req.path(), "Sign-in required.");
        Err(AppError::Auth("You must be signed in to continue.".to_string()))
      }
      Err(e) => Err(e),
    };
    ready(result)
  }
}
