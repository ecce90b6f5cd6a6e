// bookstore/src/errors.rs

use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use shopflow::FlowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Authentication Failed: {0}")]
  Auth(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Payment Processing Error: {0}")]
  Payment(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Database Migration Error: {0}")]
  Migrate(#[from] sqlx::migrate::MigrateError),

  #[error("Payment Gateway Error: {0}")]
  Gateway(String),

  #[error("Session Error: {0}")]
  Session(String),

  #[error("Workflow Error: {source}")]
  Workflow {
    #[from]
    source: FlowError,
  },

  #[error("Internal Server Error: {0}")]
  Internal(String),

  // A pipeline stopped where the calling handler needed it to complete.
  #[error("Pipeline execution was halted by a handler.")]
  PipelineHalted,
}

impl From<reqwest::Error> for AppError {
  fn from(err: reqwest::Error) -> Self {
    AppError::Gateway(err.to_string())
  }
}

impl From<validator::ValidationErrors> for AppError {
  fn from(errs: validator::ValidationErrors) -> Self {
    AppError::Validation(errs.to_string())
  }
}

impl From<actix_session::SessionGetError> for AppError {
  fn from(err: actix_session::SessionGetError) -> Self {
    AppError::Session(err.to_string())
  }
}

impl From<actix_session::SessionInsertError> for AppError {
  fn from(err: actix_session::SessionInsertError) -> Self {
    AppError::Session(err.to_string())
  }
}

impl ResponseError for AppError {
  fn error_response(&self) -> HttpResponse {
    tracing::error!(application_error = %self, "Responding with error");
    match self {
      AppError::Validation(m) => HttpResponse::BadRequest().json(json!({"error": m})),
      AppError::Auth(m) => HttpResponse::Unauthorized().json(json!({"error": m})),
      AppError::NotFound(m) => HttpResponse::NotFound().json(json!({"error": m})),
      AppError::Payment(m) => HttpResponse::PaymentRequired().json(json!({"error": m})),
      AppError::Config(m) => {
        HttpResponse::InternalServerError().json(json!({"error": "Configuration issue", "detail": m}))
      }
      AppError::Sqlx(_) | AppError::Migrate(_) => {
        HttpResponse::InternalServerError().json(json!({"error": "Database operation failed"}))
      }
      AppError::Gateway(m) => {
        HttpResponse::BadGateway().json(json!({"error": "Payment provider error", "detail": m}))
      }
      AppError::Session(m) => {
        HttpResponse::InternalServerError().json(json!({"error": "Session storage error", "detail": m}))
      }
      AppError::Workflow { source } => {
        tracing::error!(flow_error_source = ?source, "Workflow error details");
        HttpResponse::InternalServerError()
          .json(json!({"error": "Workflow processing error", "detail": source.to_string()}))
      }
      AppError::Internal(m) => {
        HttpResponse::InternalServerError().json(json!({"error": "An internal error occurred", "detail": m}))
      }
      AppError::PipelineHalted => {
        HttpResponse::Conflict().json(json!({"error": "Process halted by business logic."}))
      }
    }
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
