//! Client implementation for searching arXiv.org.
//!
//! This module uses arXiv's Atom feed API (http://export.arxiv.org/api/query)
//! with a `search_query=all:...` query, and converts feed entries to the
//! common [`Paper`] format. arXiv is the last provider in the fallback order.
//!
//! # Examples
//!
//! ```no_run
//! use citer::{clients::ArxivClient, config::Config};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ArxivClient::new(&Config::default())?;
//! let papers = client.search("homomorphic encryption", 1).await?;
//!
//! println!("Title: {:?}", papers[0].title);
//! # Ok(())
//! # }
//! ```

use super::*;

/// Venue used for entries without a journal reference.
const REPOSITORY: &str = "arXiv";

/// Internal representation of the arXiv API's Atom feed response.
#[derive(Debug, Deserialize)]
struct Feed {
  /// A `Feed` from arXiv may contain zero or more `Entry`s
  #[serde(rename = "entry", default)]
  entries: Vec<Entry>,
}

/// Internal representation of a paper entry from arXiv's API response.
#[derive(Debug, Deserialize)]
struct Entry {
  /// Paper title (may contain LaTeX markup and line breaks)
  title:       Option<String>,
  /// List of paper authors
  #[serde(rename = "author", default)]
  authors:     Vec<Author>,
  /// First version's submission date
  published:   Option<DateTime<Utc>>,
  /// arXiv URL (e.g., "http://arxiv.org/abs/2301.07041v1")
  #[serde(rename = "id")]
  arxiv_url:   Option<String>,
  /// Journal reference supplied by the authors
  #[serde(rename = "arxiv:journal_ref", alias = "journal_ref")]
  journal_ref: Option<String>,
  /// DOI of the published version
  #[serde(rename = "arxiv:doi", alias = "doi")]
  doi:         Option<String>,
}

/// Internal representation of an author from arXiv's API response.
#[derive(Debug, Deserialize)]
struct Author {
  /// Author's full name
  name: Option<String>,
}

impl From<Entry> for Paper {
  fn from(entry: Entry) -> Self {
    Paper {
      authors:     entry.authors.into_iter().filter_map(|a| non_blank(a.name)).collect(),
      year:        entry.published.map(|d| d.year()),
      title:       non_blank(entry.title),
      venue:       non_blank(entry.journal_ref).or_else(|| Some(REPOSITORY.to_string())),
      url:         non_blank(entry.arxiv_url),
      landing_url: None,
      doi:         non_blank(entry.doi),
      provider:    Provider::Arxiv,
    }
  }
}

/// Client for interacting with the arXiv API.
pub struct ArxivClient {
  /// Internal web client used to connect to the API.
  client:   reqwest::Client,
  /// The base URL to use for the client.
  base_url: String,
}

impl ArxivClient {
  /// Creates a new arXiv client instance.
  pub fn new(config: &Config) -> Result<Self, CiterError> {
    Ok(Self { client: http_client(config)?, base_url: config.providers.arxiv.clone() })
  }

  /// Searches all arXiv metadata fields for a free-text query.
  ///
  /// # Errors
  ///
  /// This function will return an error if:
  /// - The network request fails
  /// - arXiv answers with a non-success status
  /// - The Atom feed cannot be parsed
  pub async fn search(&self, query: &str, max_results: u32) -> Result<Vec<Paper>, CiterError> {
    let mut url = endpoint(&self.base_url, "api/query")?;
    url
      .query_pairs_mut()
      .append_pair("search_query", &format!("all:{query}"))
      .append_pair("start", "0")
      .append_pair("max_results", &max_results.to_string());

    debug!("Fetching from arXiv via: {url}");
    let response = fetch_text(Provider::Arxiv, self.client.get(url)).await?;

    let feed: Feed = from_str(&response)
      .map_err(|e| CiterError::ApiError(format!("Failed to parse XML: {}", e)))?;

    Ok(feed.entries.into_iter().map(Paper::from).collect())
  }
}
