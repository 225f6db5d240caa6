//! Client implementation for searching works through the CrossRef REST API.
//!
//! This module queries CrossRef's bibliographic search
//! (`https://api.crossref.org/works?query=...`) and converts the returned work
//! items into [`Paper`] records. CrossRef is both the first provider in the
//! fallback order and the only provider used for subject-area searches, since
//! its items report the publisher's landing page.
//!
//! # Examples
//!
//! ```no_run
//! use citer::{clients::CrossrefClient, config::Config};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = CrossrefClient::new(&Config::default())?;
//! let papers = client.search("mapreduce", 1).await?;
//!
//! println!("DOI: {:?}", papers.first().and_then(|p| p.doi.as_ref()));
//! # Ok(())
//! # }
//! ```

use super::*;

/// Response envelope from the CrossRef works search.
#[derive(Debug, Deserialize)]
struct CrossrefResponse {
  /// The search result container
  message: CrossrefMessage,
}

/// Search result container.
#[derive(Debug, Deserialize)]
struct CrossrefMessage {
  /// Matching works, best match first
  #[serde(default)]
  items: Vec<CrossrefWork>,
}

/// Metadata about a single work.
#[derive(Debug, Deserialize)]
struct CrossrefWork {
  /// Titles (usually a single item)
  #[serde(default)]
  title:            Vec<String>,
  /// Authors in publication order
  #[serde(default)]
  author:           Vec<CrossrefAuthor>,
  /// Journal or proceedings names
  #[serde(rename = "container-title", default)]
  container_title:  Vec<String>,
  /// Earliest known publication date
  issued:           Option<CrossrefDate>,
  /// Print publication date
  #[serde(rename = "published-print")]
  published_print:  Option<CrossrefDate>,
  /// Online publication date
  #[serde(rename = "published-online")]
  published_online: Option<CrossrefDate>,
  /// Registration date in CrossRef (last resort for the year)
  created:          Option<CrossrefDate>,
  /// The work's DOI
  #[serde(rename = "DOI")]
  doi:              Option<String>,
  /// Where the DOI resolves to
  resource:         Option<CrossrefResource>,
  /// Full-text links deposited by the publisher
  #[serde(default)]
  link:             Vec<CrossrefLink>,
}

/// Author information. Organizations only carry `name`.
#[derive(Debug, Deserialize)]
struct CrossrefAuthor {
  /// Family (last) name
  family: Option<String>,
  /// Given (first) name
  given:  Option<String>,
  /// Literal name for organizational authors
  name:   Option<String>,
}

/// Date in CrossRef's `[[year, month, day]]` form; any part may be null.
#[derive(Debug, Deserialize)]
struct CrossrefDate {
  /// Date parts, outer list usually holds one date
  #[serde(rename = "date-parts", default)]
  date_parts: Vec<Vec<Option<i32>>>,
}

/// DOI resolution targets.
#[derive(Debug, Deserialize)]
struct CrossrefResource {
  /// The primary landing page
  primary: Option<CrossrefLink>,
}

/// A single link.
#[derive(Debug, Deserialize)]
struct CrossrefLink {
  /// The link target
  #[serde(rename = "URL")]
  url: Option<String>,
}

impl CrossrefDate {
  /// The year of the first date, if present.
  fn year(&self) -> Option<i32> { self.date_parts.first()?.first().copied().flatten() }
}

impl CrossrefAuthor {
  /// Family name, falling back to the literal or given name.
  fn surname(self) -> Option<String> {
    non_blank(self.family).or_else(|| non_blank(self.name)).or_else(|| non_blank(self.given))
  }
}

impl From<CrossrefWork> for Paper {
  fn from(work: CrossrefWork) -> Self {
    let year = [&work.issued, &work.published_print, &work.published_online, &work.created]
      .into_iter()
      .flatten()
      .find_map(CrossrefDate::year);

    let landing_url = work
      .resource
      .and_then(|r| r.primary)
      .and_then(|l| non_blank(l.url))
      .or_else(|| work.link.into_iter().find_map(|l| non_blank(l.url)));

    let doi = non_blank(work.doi);
    let url = doi.as_deref().map(doi_url).or_else(|| landing_url.clone());

    Paper {
      authors: work.author.into_iter().filter_map(CrossrefAuthor::surname).collect(),
      year,
      title: non_blank(work.title.into_iter().next()),
      venue: non_blank(work.container_title.into_iter().next()),
      url,
      landing_url,
      doi,
      provider: Provider::Crossref,
    }
  }
}

/// Client for the CrossRef works search.
pub struct CrossrefClient {
  /// Internal web client used to connect to the API.
  client:   reqwest::Client,
  /// The base URL to use for the client.
  base_url: String,
  /// Contact address sent along for CrossRef's polite pool
  mailto:   Option<String>,
}

impl CrossrefClient {
  /// Creates a new CrossRef client from the configured base URL, timeout,
  /// user agent, and contact address.
  pub fn new(config: &Config) -> Result<Self, CiterError> {
    Ok(Self {
      client:   http_client(config)?,
      base_url: config.providers.crossref.clone(),
      mailto:   config.mailto.clone(),
    })
  }

  /// Searches CrossRef for works matching a free-text query.
  ///
  /// # Errors
  ///
  /// This function will return an error if:
  /// - The network request fails or times out
  /// - CrossRef answers with a non-success status
  /// - The response cannot be parsed
  pub async fn search(&self, query: &str, rows: u32) -> Result<Vec<Paper>, CiterError> {
    let mut url = endpoint(&self.base_url, "works")?;
    url.query_pairs_mut().append_pair("query", query).append_pair("rows", &rows.to_string());
    if let Some(mailto) = &self.mailto {
      url.query_pairs_mut().append_pair("mailto", mailto);
    }

    debug!("Fetching from CrossRef via: {url}");
    let text = fetch_text(Provider::Crossref, self.client.get(url)).await?;
    let response: CrossrefResponse = parse_json(Provider::Crossref, &text)?;

    Ok(response.message.items.into_iter().map(Paper::from).collect())
  }
}

#[cfg(test)]
mod tests {
  use httpmock::prelude::*;
  use serde_json::json;

  use super::*;

  fn config_for(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.providers.crossref = server.base_url();
    config
  }

  #[traced_test]
  #[tokio::test]
  async fn test_crossref_search_parse() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    let mock = server
      .mock_async(|when, then| {
        when.method(GET).path("/works").query_param("query", "mapreduce").query_param("rows", "1");
        then.status(200).json_body(json!({
          "status": "ok",
          "message": {
            "items": [{
              "title": ["MapReduce: simplified data processing on large clusters"],
              "author": [
                {"given": "Jeffrey", "family": "Dean", "sequence": "first"},
                {"given": "Sanjay", "family": "Ghemawat"}
              ],
              "container-title": ["Communications of the ACM"],
              "issued": {"date-parts": [[2008, 1]]},
              "DOI": "10.1145/1327452.1327492",
              "URL": "http://dx.doi.org/10.1145/1327452.1327492",
              "resource": {"primary": {"URL": "https://dl.acm.org/doi/10.1145/1327452.1327492"}}
            }]
          }
        }));
      })
      .await;

    let client = CrossrefClient::new(&config_for(&server))?;
    let papers = client.search("mapreduce", 1).await?;
    mock.assert_async().await;

    let paper = &papers[0];
    assert_eq!(paper.authors, vec!["Dean", "Ghemawat"]);
    assert_eq!(paper.year, Some(2008));
    assert_eq!(paper.venue.as_deref(), Some("Communications of the ACM"));
    assert_eq!(paper.url.as_deref(), Some("https://doi.org/10.1145/1327452.1327492"));
    assert_eq!(
      paper.landing_url.as_deref(),
      Some("https://dl.acm.org/doi/10.1145/1327452.1327492")
    );
    assert_eq!(paper.provider, Provider::Crossref);
    Ok(())
  }

  #[tokio::test]
  async fn test_crossref_sparse_item() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    server
      .mock_async(|when, then| {
        when.method(GET).path("/works");
        then.status(200).json_body(json!({
          "message": {
            "items": [{
              "author": [{"name": "WHO Consortium"}],
              "issued": {"date-parts": [[null]]},
              "created": {"date-parts": [[2021, 3, 4]]},
              "link": [{"URL": "https://www.mdpi.com/2071-1050/1/1/1/pdf"}]
            }]
          }
        }));
      })
      .await;

    let papers = CrossrefClient::new(&config_for(&server))?.search("who", 1).await?;
    let paper = &papers[0];
    assert_eq!(paper.authors, vec!["WHO Consortium"]);
    assert_eq!(paper.year, Some(2021));
    assert_eq!(paper.title, None);
    assert_eq!(paper.doi, None);
    assert_eq!(paper.url.as_deref(), Some("https://www.mdpi.com/2071-1050/1/1/1/pdf"));
    Ok(())
  }

  #[tokio::test]
  async fn test_crossref_sends_mailto() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    let mock = server
      .mock_async(|when, then| {
        when.method(GET).path("/works").query_param("mailto", "ops@example.org");
        then.status(200).json_body(json!({"message": {"items": []}}));
      })
      .await;

    let mut config = config_for(&server);
    config.mailto = Some("ops@example.org".into());
    let papers = CrossrefClient::new(&config)?.search("anything", 1).await?;
    mock.assert_async().await;
    assert!(papers.is_empty());
    Ok(())
  }

  #[tokio::test]
  async fn test_crossref_upstream_error() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    server
      .mock_async(|when, then| {
        when.method(GET).path("/works");
        then.status(503).body("busy");
      })
      .await;

    let result = CrossrefClient::new(&config_for(&server))?.search("x", 1).await;
    assert!(matches!(
      result,
      Err(CiterError::Upstream { provider: Provider::Crossref, status: 503 })
    ));
    Ok(())
  }

  #[tokio::test]
  async fn test_crossref_malformed_body() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    server
      .mock_async(|when, then| {
        when.method(GET).path("/works");
        then.status(200).body("<html>not json</html>");
      })
      .await;

    let result = CrossrefClient::new(&config_for(&server))?.search("x", 1).await;
    assert!(matches!(result, Err(CiterError::ApiError(_))));
    Ok(())
  }
}
