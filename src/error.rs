//! Error type shared by the store and the request handlers.
//!
//! Validation problems are not errors here: they are rendered back into the
//! form by the handlers. Everything that reaches [`AppError`] ends the request
//! with either the not-found page or a generic server error page.

use actix_web::{
  error::BlockingError,
  http::{header::ContentType, StatusCode},
  HttpResponse, ResponseError,
};
use askama::Template;
use thiserror::Error;

use crate::templates::ErrorPage;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("todo {0} not found")]
  NotFound(i64),

  #[error("no page at {0}")]
  NoRoute(String),

  #[error("database error: {0}")]
  Database(#[from] rusqlite::Error),

  #[error("connection pool error: {0}")]
  Pool(#[from] r2d2::Error),

  #[error("template error: {0}")]
  Template(#[from] askama::Error),

  #[error("blocking task was cancelled")]
  Blocking(#[from] BlockingError),
}

impl AppError {
  /// Text shown to the browser. Server-side details stay in the logs.
  fn public_message(&self) -> String {
    match self {
      AppError::NotFound(id) => format!("No todo matches id {}.", id),
      AppError::NoRoute(path) => format!("Nothing lives at {}.", path),
      _ => "Something went wrong while handling the request.".to_string(),
    }
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::NotFound(_) | AppError::NoRoute(_) => StatusCode::NOT_FOUND,
      _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    if status.is_server_error() {
      tracing::error!(status = %status, error = %self, "request failed");
    } else {
      tracing::debug!(status = %status, error = %self, "request rejected");
    }

    let page = ErrorPage {
      status: status.as_u16(),
      reason: status.canonical_reason().unwrap_or("Error"),
      message: self.public_message(),
    };
    match page.render() {
      Ok(body) => HttpResponse::build(status)
        .content_type(ContentType::html())
        .body(body),
      Err(e) => {
        tracing::error!(error = %e, "failed to render error page");
        HttpResponse::build(status)
          .content_type(ContentType::plaintext())
          .body(page.message)
      }
    }
  }
}
