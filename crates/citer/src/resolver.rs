//! Sequential citation lookup across providers.
//!
//! The [`Resolver`] owns one client per provider plus the immutable filter
//! tables. Providers are queried strictly one after another in
//! [`Provider::ALL`] order; there is no fan-out, retry, or caching. A provider
//! that fails is logged and skipped, except in [`Resolver::area_citations`],
//! which talks to CrossRef alone and surfaces its failures.
//!
//! # Examples
//!
//! ```no_run
//! use citer::{config::Config, resolver::Resolver};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let resolver = Resolver::new(&Config::default())?;
//!
//! // One citation, first provider that has an acceptable record wins
//! let citation = resolver.first_citation("coral reef bleaching").await?;
//! println!("{citation}");
//!
//! // Several CrossRef citations restricted to an area's open-access domains
//! let found = resolver.area_citations("coral reef bleaching", "biology", Some(3)).await?;
//! for citation in found.citations {
//!   println!("{citation}");
//! }
//! # Ok(())
//! # }
//! ```

use lazy_static::lazy_static;
use regex::Regex;

use super::*;

/// Upper bound on topics taken from an uploaded document.
pub const MAX_TOPICS: usize = 5;

/// Citations found for a subject area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaCitations {
  /// The area whose allowlist was applied (the default area after fallback)
  pub area:      String,
  /// Matching citations in CrossRef's relevance order
  pub citations: Vec<Citation>,
}

/// Outcome of resolving one topic from an uploaded document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicResult {
  /// The topic line as searched
  pub topic:    String,
  /// The citation found, if any
  #[serde(skip_serializing_if = "Option::is_none")]
  pub citation: Option<Citation>,
  /// Why no citation was found
  #[serde(skip_serializing_if = "Option::is_none")]
  pub message:  Option<String>,
}

/// Looks up citations across all providers.
pub struct Resolver {
  /// CrossRef client
  crossref:         CrossrefClient,
  /// Semantic Scholar client
  semantic_scholar: SemanticScholarClient,
  /// DOAJ client
  doaj:             DoajClient,
  /// arXiv client
  arxiv:            ArxivClient,
  /// Paywalled publisher domains
  denylist:         Arc<Denylist>,
  /// Per-area open-access domains
  areas:            Arc<AreaTable>,
  /// Row defaults and limits
  config:           Arc<Config>,
}

/// Rejects blank queries and trims the rest.
fn validate_query(query: &str) -> Result<&str, CiterError> {
  let query = query.trim();
  if query.is_empty() {
    return Err(CiterError::MissingField("query"));
  }
  Ok(query)
}

/// Splits a document into at most [`MAX_TOPICS`] search topics.
///
/// Each non-blank line is one topic; list markers such as `-`, `*`, `•`,
/// `1.` or `2)` are stripped first.
///
/// ```
/// use citer::resolver::extract_topics;
///
/// let topics = extract_topics("1. Soil erosion\n\n- Crop rotation\n");
/// assert_eq!(topics, vec!["Soil erosion", "Crop rotation"]);
/// ```
pub fn extract_topics(text: &str) -> Vec<String> {
  lazy_static! {
    static ref LIST_MARKER: Regex = Regex::new(r"^(?:[-*•]+\s*|\d+[.)]\s+)").unwrap();
  }

  text
    .lines()
    .map(|line| LIST_MARKER.replace(line.trim(), "").trim().to_string())
    .filter(|topic| !topic.is_empty())
    .take(MAX_TOPICS)
    .collect()
}

impl Resolver {
  /// Creates clients and filter tables from a configuration.
  ///
  /// # Errors
  ///
  /// Fails when the configuration doesn't validate or an HTTP client can't be
  /// built.
  pub fn new(config: &Config) -> Result<Self, CiterError> {
    config.validate()?;
    info!("Creating resolver with {} areas", config.areas.len());
    Ok(Self {
      crossref:         CrossrefClient::new(config)?,
      semantic_scholar: SemanticScholarClient::new(config)?,
      doaj:             DoajClient::new(config)?,
      arxiv:            ArxivClient::new(config)?,
      denylist:         Arc::new(config.denylist()),
      areas:            Arc::new(config.area_table()?),
      config:           Arc::new(config.clone()),
    })
  }

  /// The denylist applied to every lookup.
  pub fn denylist(&self) -> &Denylist { &self.denylist }

  /// The subject-area allowlists.
  pub fn areas(&self) -> &AreaTable { &self.areas }

  /// Runs a search against a single provider.
  pub async fn search(
    &self,
    provider: Provider,
    query: &str,
    rows: u32,
  ) -> Result<Vec<Paper>, CiterError> {
    match provider {
      Provider::Crossref => self.crossref.search(query, rows).await,
      Provider::SemanticScholar => self.semantic_scholar.search(query, rows).await,
      Provider::Doaj => self.doaj.search(query, rows).await,
      Provider::Arxiv => self.arxiv.search(query, rows).await,
    }
  }

  /// Fetches a provider's first result and keeps it if the denylist admits it.
  async fn first_admitted(
    &self,
    provider: Provider,
    query: &str,
  ) -> Result<Option<Citation>, CiterError> {
    let papers = self.search(provider, query, 1).await?;
    let Some(paper) = papers.first() else {
      debug!("{provider} returned no results for `{query}`");
      return Ok(None);
    };

    if !self.denylist.admits(paper) {
      debug!("{provider} result rejected by denylist: {:?}", paper.url);
      return Ok(None);
    }

    Ok(Some(Citation::from(paper)))
  }

  /// Walks the providers in order and returns the first acceptable citation.
  ///
  /// Provider failures are logged and skipped.
  ///
  /// # Errors
  ///
  /// - [`CiterError::MissingField`] for a blank query
  /// - [`CiterError::NotFound`] when no provider yields an acceptable record
  pub async fn first_citation(&self, query: &str) -> Result<Citation, CiterError> {
    let query = validate_query(query)?;

    for provider in Provider::ALL {
      match self.first_admitted(provider, query).await {
        Ok(Some(citation)) => {
          debug!("Found citation via {provider}");
          return Ok(citation);
        },
        Ok(None) => {},
        Err(e) => warn!("Skipping {provider}: {e}"),
      }
    }

    Err(CiterError::NotFound)
  }

  /// Asks a single provider for its first acceptable citation.
  ///
  /// Unlike [`Resolver::first_citation`], a failing provider is not skipped.
  ///
  /// # Errors
  ///
  /// - [`CiterError::MissingField`] for a blank query
  /// - [`CiterError::NotFound`] when the provider's first record is missing or
  ///   denylisted
  /// - Upstream errors from the provider, unchanged
  pub async fn provider_citation(
    &self,
    provider: Provider,
    query: &str,
  ) -> Result<Citation, CiterError> {
    let query = validate_query(query)?;
    self.first_admitted(provider, query).await?.ok_or(CiterError::NotFound)
  }

  /// Walks every provider and collects one acceptable citation from each.
  ///
  /// # Errors
  ///
  /// - [`CiterError::MissingField`] for a blank query
  /// - [`CiterError::NotFound`] when no provider yields an acceptable record
  pub async fn citations_per_provider(&self, query: &str) -> Result<Vec<Citation>, CiterError> {
    let query = validate_query(query)?;
    let mut citations = Vec::new();

    for provider in Provider::ALL {
      match self.first_admitted(provider, query).await {
        Ok(Some(citation)) => citations.push(citation),
        Ok(None) => {},
        Err(e) => warn!("Skipping {provider}: {e}"),
      }
    }

    if citations.is_empty() {
      return Err(CiterError::NotFound);
    }
    Ok(citations)
  }

  /// Searches CrossRef and keeps records hosted on the area's open-access
  /// domains and not on a denylisted one.
  ///
  /// `limit` is the number of CrossRef rows inspected, clamped to the
  /// configured maximum.
  ///
  /// # Errors
  ///
  /// - [`CiterError::MissingField`] for a blank query or area
  /// - [`CiterError::UnknownArea`] when the table rejects unknown labels
  /// - Upstream errors from CrossRef, unchanged
  /// - [`CiterError::NotFound`] when nothing passes both filters
  pub async fn area_citations(
    &self,
    query: &str,
    area: &str,
    limit: Option<u32>,
  ) -> Result<AreaCitations, CiterError> {
    let query = validate_query(query)?;
    let (area, allowed) = self.areas.resolve(area)?;
    let rows = self.config.rows(limit);

    let papers = self.search(Provider::Crossref, query, rows).await?;
    debug!("CrossRef returned {} records for area `{area}`", papers.len());

    let citations: Vec<Citation> = papers
      .iter()
      .filter(|paper| self.denylist.admits(paper) && AreaTable::allows(allowed, paper))
      .map(Citation::from)
      .collect();

    if citations.is_empty() {
      return Err(CiterError::NotFound);
    }
    Ok(AreaCitations { area: area.to_string(), citations })
  }

  /// Resolves each topic of a document independently.
  ///
  /// Topics without a citation carry the reason in `message`.
  ///
  /// # Errors
  ///
  /// Returns [`CiterError::MissingField`] when the document has no topics.
  pub async fn resolve_topics(&self, text: &str) -> Result<Vec<TopicResult>, CiterError> {
    let topics = extract_topics(text);
    if topics.is_empty() {
      return Err(CiterError::MissingField("topics"));
    }

    let mut results = Vec::with_capacity(topics.len());
    for topic in topics {
      let result = match self.first_citation(&topic).await {
        Ok(citation) => TopicResult { topic, citation: Some(citation), message: None },
        Err(e) => TopicResult { topic, citation: None, message: Some(e.to_string()) },
      };
      results.push(result);
    }
    Ok(results)
  }
}
