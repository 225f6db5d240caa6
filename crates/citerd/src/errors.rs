//! Error types for the citerd service and CLI.
//!
//! Two types live here:
//! - [`CiterdErrors`] for process-level failures surfaced from `main`
//! - [`ApiError`] for request-level failures, rendered as JSON responses
//!
//! Both are transparent over [`CiterError`] so the library's messages reach
//! the user unchanged.

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use citer::errors::CiterError;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, error};

/// Errors that can occur while running the CLI or the HTTP service.
#[derive(Error, Debug)]
pub enum CiterdErrors {
  /// Errors from the underlying citer library
  #[error(transparent)]
  Citer(#[from] CiterError),

  /// File system, socket, and other IO errors
  #[error(transparent)]
  IO(#[from] std::io::Error),

  /// The rolling log file couldn't be created
  #[error(transparent)]
  LogInit(#[from] tracing_appender::rolling::InitError),
}

/// A failed API request.
#[derive(Error, Debug)]
pub enum ApiError {
  /// A lookup failed; the status depends on the kind of failure.
  #[error(transparent)]
  Citer(#[from] CiterError),

  /// The request body couldn't be read (bad JSON, bad multipart, non-UTF-8
  /// upload).
  #[error("{0}")]
  BadRequest(String),
}

impl ApiError {
  /// Status code for this error.
  ///
  /// - Invalid requests → `400`
  /// - Upstream API failures → `502`
  /// - No acceptable record → `404`
  /// - Anything else → `500`
  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::Citer(e) if e.is_bad_request() => StatusCode::BAD_REQUEST,
      ApiError::Citer(e) if e.is_upstream() => StatusCode::BAD_GATEWAY,
      ApiError::Citer(CiterError::NotFound) => StatusCode::NOT_FOUND,
      ApiError::Citer(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      error!("Request failed with {status}: {self}");
    } else {
      debug!("Request rejected with {status}: {self}");
    }

    (status, Json(json!({ "message": self.to_string() }))).into_response()
  }
}

#[cfg(test)]
mod tests {
  use citer::paper::Provider;

  use super::*;

  #[test]
  fn test_status_mapping() {
    assert_eq!(ApiError::from(CiterError::MissingField("query")).status(), StatusCode::BAD_REQUEST);
    assert_eq!(
      ApiError::from(CiterError::UnknownArea("alchemy".into())).status(),
      StatusCode::BAD_REQUEST
    );
    assert_eq!(ApiError::BadRequest("bad json".into()).status(), StatusCode::BAD_REQUEST);
    assert_eq!(
      ApiError::from(CiterError::Upstream { provider: Provider::Crossref, status: 500 }).status(),
      StatusCode::BAD_GATEWAY
    );
    assert_eq!(ApiError::from(CiterError::NotFound).status(), StatusCode::NOT_FOUND);
    assert_eq!(
      ApiError::from(CiterError::InvalidConfig("nope".into())).status(),
      StatusCode::INTERNAL_SERVER_ERROR
    );
  }
}
