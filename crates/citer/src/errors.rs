//! Error types for the citer library.
//!
//! This module provides a single error type covering every failure mode of a
//! citation lookup:
//! - Request validation (missing query, unknown subject area)
//! - Network and upstream API failures
//! - Response parsing
//! - Configuration loading
//!
//! # Examples
//!
//! ```no_run
//! use citer::{config::Config, errors::CiterError, resolver::Resolver};
//!
//! # async fn example() -> Result<(), CiterError> {
//! let resolver = Resolver::new(&Config::default())?;
//! match resolver.first_citation("graph neural networks").await {
//!   Ok(citation) => println!("{}", citation.text),
//!   Err(CiterError::NotFound) => println!("No open-access source found"),
//!   Err(e) => println!("Other error: {}", e),
//! }
//! # Ok(())
//! # }
//! ```

use thiserror::Error;

use crate::paper::Provider;

/// Errors that can occur while looking up citations.
///
/// Variants are grouped by who is at fault: the caller (`MissingField`,
/// `UnknownArea`, `InvalidProvider`), the upstream API (`Network`, `Upstream`,
/// `ApiError`), the search itself (`NotFound`), or the local environment
/// (`Path`, `Config`, `InvalidConfig`).
#[derive(Error, Debug)]
pub enum CiterError {
  /// A required request field was absent or blank.
  ///
  /// The string names the field, e.g. `"query"` or `"area"`.
  #[error("Missing required field: {0}")]
  MissingField(&'static str),

  /// The subject-area label is not in the area table and the table rejects
  /// unknown labels.
  #[error("Unknown subject area: {0}")]
  UnknownArea(String),

  /// The provider name couldn't be parsed, see [`Provider`].
  #[error("Invalid provider, see `citer::paper::Provider`: {0}")]
  InvalidProvider(String),

  /// A network request failed.
  ///
  /// This can occur when:
  /// - The server is unreachable
  /// - The request times out
  /// - TLS errors occur
  #[error(transparent)]
  Network(#[from] reqwest::Error),

  /// An upstream API answered with a non-success status code.
  #[error("{provider} responded with HTTP {status}")]
  Upstream {
    /// The provider that failed.
    provider: Provider,
    /// The HTTP status code it returned.
    status:   u16,
  },

  /// An upstream response couldn't be parsed.
  ///
  /// The string carries the parser message for debugging.
  #[error("API error: {0}")]
  ApiError(String),

  /// No record passed the domain filters.
  #[error("No open-access source found for the query")]
  NotFound,

  /// Failed to build a request URL.
  #[error(transparent)]
  InvalidUrl(#[from] url::ParseError),

  /// A file system operation failed, typically reading the config file.
  #[error(transparent)]
  Path(#[from] std::io::Error),

  /// The config file isn't valid TOML or has fields of the wrong type.
  #[error(transparent)]
  Config(#[from] toml::de::Error),

  /// The config file parsed but describes an unusable setup.
  #[error("Invalid configuration: {0}")]
  InvalidConfig(String),
}

impl CiterError {
  /// Whether the error was caused by the upstream API rather than by the
  /// request or the local setup.
  ///
  /// The HTTP layer answers these with `502 Bad Gateway`.
  pub fn is_upstream(&self) -> bool {
    matches!(self, CiterError::Network(_) | CiterError::Upstream { .. } | CiterError::ApiError(_))
  }

  /// Whether the error was caused by an invalid request.
  pub fn is_bad_request(&self) -> bool {
    matches!(
      self,
      CiterError::MissingField(_) | CiterError::UnknownArea(_) | CiterError::InvalidProvider(_)
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_error_classes() {
    assert!(CiterError::MissingField("query").is_bad_request());
    assert!(CiterError::UnknownArea("alchemy".into()).is_bad_request());
    assert!(CiterError::InvalidProvider("scopus".into()).is_bad_request());
    assert!(CiterError::Upstream { provider: Provider::Crossref, status: 503 }.is_upstream());
    assert!(CiterError::ApiError("bad json".into()).is_upstream());
    assert!(!CiterError::NotFound.is_upstream());
    assert!(!CiterError::NotFound.is_bad_request());
  }

  #[test]
  fn test_upstream_message() {
    let err = CiterError::Upstream { provider: Provider::SemanticScholar, status: 429 };
    assert_eq!(err.to_string(), "Semantic Scholar responded with HTTP 429");
  }
}
