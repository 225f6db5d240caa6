//! Client implementation for the Semantic Scholar paper search.
//!
//! Uses the public graph API
//! (`https://api.semanticscholar.org/graph/v1/paper/search`). Records point at
//! the Semantic Scholar paper page; when the work has no reported venue the
//! repository itself is used as the venue.

use super::*;

/// Fields requested from the graph API.
const FIELDS: &str = "title,authors,year,url,venue,externalIds";

/// Venue used when Semantic Scholar reports none.
const REPOSITORY: &str = "Semantic Scholar";

/// Response envelope from the paper search.
#[derive(Debug, Deserialize)]
struct SearchResponse {
  /// Matching papers; absent when nothing matched
  #[serde(default)]
  data: Vec<S2Paper>,
}

/// A single paper from the graph API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct S2Paper {
  /// Paper title
  title:        Option<String>,
  /// Authors in publication order
  #[serde(default)]
  authors:      Vec<S2Author>,
  /// Publication year
  year:         Option<i32>,
  /// Semantic Scholar paper page
  url:          Option<String>,
  /// Journal or conference name, often empty
  venue:        Option<String>,
  /// Identifiers in other systems (DOI, ArXiv, ...)
  external_ids: Option<S2ExternalIds>,
}

/// Author entry.
#[derive(Debug, Deserialize)]
struct S2Author {
  /// Full name
  name: Option<String>,
}

/// External identifiers; only the DOI is used.
#[derive(Debug, Deserialize)]
struct S2ExternalIds {
  /// The DOI, if Semantic Scholar knows one
  #[serde(rename = "DOI")]
  doi: Option<String>,
}

impl From<S2Paper> for Paper {
  fn from(paper: S2Paper) -> Self {
    Paper {
      authors:     paper.authors.into_iter().filter_map(|a| non_blank(a.name)).collect(),
      year:        paper.year,
      title:       non_blank(paper.title),
      venue:       non_blank(paper.venue).or_else(|| Some(REPOSITORY.to_string())),
      url:         non_blank(paper.url),
      landing_url: None,
      doi:         paper.external_ids.and_then(|ids| non_blank(ids.doi)),
      provider:    Provider::SemanticScholar,
    }
  }
}

/// Client for the Semantic Scholar graph API.
pub struct SemanticScholarClient {
  /// Internal web client used to connect to the API.
  client:   reqwest::Client,
  /// The base URL to use for the client.
  base_url: String,
}

impl SemanticScholarClient {
  /// Creates a new Semantic Scholar client.
  pub fn new(config: &Config) -> Result<Self, CiterError> {
    Ok(Self { client: http_client(config)?, base_url: config.providers.semantic_scholar.clone() })
  }

  /// Searches Semantic Scholar for papers matching a free-text query.
  ///
  /// # Errors
  ///
  /// Fails on network errors, non-success statuses (including `429` rate
  /// limiting), and unparseable responses.
  pub async fn search(&self, query: &str, limit: u32) -> Result<Vec<Paper>, CiterError> {
    let mut url = endpoint(&self.base_url, "graph/v1/paper/search")?;
    url
      .query_pairs_mut()
      .append_pair("query", query)
      .append_pair("limit", &limit.to_string())
      .append_pair("fields", FIELDS);

    debug!("Fetching from Semantic Scholar via: {url}");
    let text = fetch_text(Provider::SemanticScholar, self.client.get(url)).await?;
    let response: SearchResponse = parse_json(Provider::SemanticScholar, &text)?;

    Ok(response.data.into_iter().map(Paper::from).collect())
  }
}
