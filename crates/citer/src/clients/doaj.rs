//! Client implementation for the Directory of Open Access Journals (DOAJ).
//!
//! DOAJ's article search takes the query as a path segment
//! (`https://doaj.org/api/v2/search/articles/{query}`) and wraps each article's
//! metadata in a `bibjson` object. Everything indexed by DOAJ is open access,
//! but the publisher link still goes through the domain filters.

use super::*;

/// Response envelope from the article search.
#[derive(Debug, Deserialize)]
struct DoajResponse {
  /// Matching articles
  #[serde(default)]
  results: Vec<DoajResult>,
}

/// A single search hit.
#[derive(Debug, Deserialize)]
struct DoajResult {
  /// The article metadata
  bibjson: DoajBibJson,
}

/// Article metadata in DOAJ's bibjson format.
#[derive(Debug, Deserialize)]
struct DoajBibJson {
  /// Article title
  title:      Option<String>,
  /// Authors in publication order
  #[serde(default)]
  author:     Vec<DoajAuthor>,
  /// Publication year, as a string
  year:       Option<String>,
  /// The journal the article appeared in
  journal:    Option<DoajJournal>,
  /// Full-text and landing links
  #[serde(default)]
  link:       Vec<DoajLink>,
  /// Identifiers such as DOI and ISSN
  #[serde(default)]
  identifier: Vec<DoajIdentifier>,
}

/// Author entry.
#[derive(Debug, Deserialize)]
struct DoajAuthor {
  /// Full name
  name: Option<String>,
}

/// Journal entry.
#[derive(Debug, Deserialize)]
struct DoajJournal {
  /// Journal title
  title: Option<String>,
}

/// Link entry.
#[derive(Debug, Deserialize)]
struct DoajLink {
  /// Link target
  url: Option<String>,
}

/// Identifier entry.
#[derive(Debug, Deserialize)]
struct DoajIdentifier {
  /// Identifier scheme, e.g. `"doi"` or `"eissn"`
  #[serde(rename = "type")]
  id_type: Option<String>,
  /// The identifier value
  id:      Option<String>,
}

impl From<DoajBibJson> for Paper {
  fn from(bib: DoajBibJson) -> Self {
    let doi = bib
      .identifier
      .into_iter()
      .find(|i| i.id_type.as_deref().is_some_and(|t| t.eq_ignore_ascii_case("doi")))
      .and_then(|i| non_blank(i.id));
    let url = bib.link.into_iter().find_map(|l| non_blank(l.url));

    Paper {
      authors: bib.author.into_iter().filter_map(|a| non_blank(a.name)).collect(),
      year: bib.year.and_then(|y| y.trim().parse().ok()),
      title: non_blank(bib.title),
      venue: bib.journal.and_then(|j| non_blank(j.title)),
      url,
      landing_url: None,
      doi,
      provider: Provider::Doaj,
    }
  }
}

/// Client for the DOAJ article search.
pub struct DoajClient {
  /// Internal web client used to connect to the API.
  client:   reqwest::Client,
  /// The base URL to use for the client.
  base_url: String,
}

impl DoajClient {
  /// Creates a new DOAJ client.
  pub fn new(config: &Config) -> Result<Self, CiterError> {
    Ok(Self { client: http_client(config)?, base_url: config.providers.doaj.clone() })
  }

  /// Builds the search URL, percent-encoding the query as one path segment.
  fn articles_url(&self, query: &str, page_size: u32) -> Result<Url, CiterError> {
    let mut url = endpoint(&self.base_url, "api/v2/search/articles")?;
    url
      .path_segments_mut()
      .map_err(|_| CiterError::InvalidConfig(format!("bad DOAJ base URL: {}", self.base_url)))?
      .push(query);
    url.query_pairs_mut().append_pair("page", "1").append_pair("pageSize", &page_size.to_string());
    Ok(url)
  }

  /// Searches DOAJ for articles matching a free-text query.
  ///
  /// # Errors
  ///
  /// Fails on network errors, non-success statuses, and unparseable responses.
  pub async fn search(&self, query: &str, page_size: u32) -> Result<Vec<Paper>, CiterError> {
    let url = self.articles_url(query, page_size)?;

    debug!("Fetching from DOAJ via: {url}");
    let request = self.client.get(url).header(reqwest::header::ACCEPT, "application/json");
    let text = fetch_text(Provider::Doaj, request).await?;
    let response: DoajResponse = parse_json(Provider::Doaj, &text)?;

    Ok(response.results.into_iter().map(|r| Paper::from(r.bibjson)).collect())
  }
}
