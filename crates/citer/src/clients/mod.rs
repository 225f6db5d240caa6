//! Client implementations for searching scholarly metadata providers.
//!
//! Each submodule talks to one provider and reduces its response to the common
//! [`Paper`] record:
//! - Building the search request
//! - Rejecting non-success responses as [`CiterError::Upstream`]
//! - Extracting author, year, title, venue, and links
//!
//! # Supported Providers
//!
//! - [`crossref`] - The CrossRef works API
//! - [`semantic_scholar`] - The Semantic Scholar graph API
//! - [`doaj`] - The Directory of Open Access Journals
//! - [`arxiv`] - The arXiv preprint server
//!
//! # Examples
//!
//! ```no_run
//! use citer::{clients::CrossrefClient, config::Config};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = CrossrefClient::new(&Config::default())?;
//! let papers = client.search("open access mandates", 3).await?;
//! for paper in papers {
//!   println!("{:?}", paper.title);
//! }
//! # Ok(())
//! # }
//! ```

use quick_xml::de::from_str;
use url::Url;

pub mod arxiv;
pub mod crossref;
pub mod doaj;
pub mod semantic_scholar;

pub use arxiv::ArxivClient;
pub use crossref::CrossrefClient;
pub use doaj::DoajClient;
pub use semantic_scholar::SemanticScholarClient;

use super::*;
use crate::paper::{doi_url, non_blank};

/// Builds the HTTP client shared by one provider client.
///
/// Every upstream request carries the configured user agent and is bounded by
/// the single configured timeout.
fn http_client(config: &Config) -> Result<reqwest::Client, CiterError> {
  Ok(reqwest::Client::builder().user_agent(&config.user_agent).timeout(config.timeout()).build()?)
}

/// Joins an endpoint path onto a provider base URL.
fn endpoint(base_url: &str, path: &str) -> Result<Url, CiterError> {
  Ok(Url::parse(&format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/')))?)
}

/// Sends a request and returns the body of a successful response.
async fn fetch_text(
  provider: Provider,
  request: reqwest::RequestBuilder,
) -> Result<String, CiterError> {
  let response = request.send().await?;
  let status = response.status();
  debug!("{provider} response status: {status}");

  if !status.is_success() {
    return Err(CiterError::Upstream { provider, status: status.as_u16() });
  }

  let text = response.text().await?;
  tracing::trace!("{provider} response: {text}");
  Ok(text)
}

/// Parses a JSON body, reporting failures as [`CiterError::ApiError`].
fn parse_json<T: serde::de::DeserializeOwned>(
  provider: Provider,
  text: &str,
) -> Result<T, CiterError> {
  serde_json::from_str(text)
    .map_err(|e| CiterError::ApiError(format!("Failed to parse {provider} JSON: {e}")))
}
