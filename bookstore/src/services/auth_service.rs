// bookstore/src/services/auth_service.rs

//! Password hashing for accounts.

use crate::errors::AppError;
use argon2::{
  password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
  Argon2,
};
use tracing::{debug, error, instrument};

/// Hashes `password` with Argon2 and a fresh random salt, returning the PHC
/// string stored in `users.password_hash`.
#[instrument(name = "auth_service::hash_password", skip(password), err(Display))]
pub fn hash_password(password: &str) -> Result<String, AppError> {
  if password.is_empty() {
    return Err(AppError::Validation("Password cannot be empty.".to_string()));
  }

  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|e| {
      error!(error = %e, "Argon2 password hashing failed.");
      AppError::Internal(format!("Password hashing failed: {}", e))
    })
}

/// `Ok(false)` on a plain mismatch; errors only when the stored hash itself
/// is unusable.
#[instrument(name = "auth_service::verify_password", skip_all, err(Display))]
pub fn verify_password(stored_hash: &str, provided_password: &str) -> Result<bool, AppError> {
  if provided_password.is_empty() {
    return Ok(false);
  }
  let parsed = PasswordHash::new(stored_hash).map_err(|e| {
    error!(error = %e, "Stored password hash is malformed.");
    AppError::Internal(format!("Invalid stored password hash: {}", e))
  })?;

  match Argon2::default().verify_password(provided_password.as_bytes(), &parsed) {
    Ok(()) => Ok(true),
    Err(argon2::password_hash::Error::Password) => {
      debug!("Password does not match.");
      Ok(false)
    }
    Err(e) => {
      error!(error = %e, "Argon2 password verification failed.");
      Err(AppError::Internal(format!("Password verification failed: {}", e)))
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn hash_then_verify() {
    let hash = hash_password("correct horse").unwrap();
    assert!(hash.starts_with("$argon2"));
    assert!(verify_password(&hash, "correct horse").unwrap());
    assert!(!verify_password(&hash, "wrong horse").unwrap());
  }

  #[test]
  fn same_password_gets_distinct_salts() {
    assert_ne!(hash_password("pw123456").unwrap(), hash_password("pw123456").unwrap());
  }

  #[test]
  fn malformed_stored_hash_is_an_internal_error() {
    let err = verify_password("not-a-phc-string", "whatever").unwrap_err();
    assert!(matches!(err, AppError::Internal(_)));
  }
}
