//! Bibliographic record types shared by every provider client.
//!
//! Each client reduces its provider's response to a [`Paper`]: the handful of
//! fields needed to print a citation plus the URLs the domain filters look at.
//!
//! # Examples
//!
//! ```
//! use citer::paper::{Paper, Provider};
//!
//! let paper = Paper {
//!   authors:     vec!["Lovelace".into()],
//!   year:        Some(1843),
//!   title:       Some("Notes on the Analytical Engine".into()),
//!   venue:       Some("Scientific Memoirs".into()),
//!   url:         Some("https://doi.org/10.1000/xyz".into()),
//!   landing_url: None,
//!   doi:         Some("10.1000/xyz".into()),
//!   provider:    Provider::Crossref,
//! };
//! assert_eq!(paper.lead_author(), Some("Lovelace"));
//! ```

use super::*;

/// The scholarly search API a record came from.
///
/// The order of [`Provider::ALL`] is the order in which the resolver falls
/// back from one provider to the next.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Provider {
  /// The CrossRef works API (api.crossref.org)
  Crossref,
  /// The Semantic Scholar graph API (api.semanticscholar.org)
  SemanticScholar,
  /// The Directory of Open Access Journals article search (doaj.org)
  Doaj,
  /// The arXiv Atom query API (export.arxiv.org)
  Arxiv,
}

impl Provider {
  /// Every provider, in fallback order.
  pub const ALL: [Provider; 4] =
    [Provider::Crossref, Provider::SemanticScholar, Provider::Doaj, Provider::Arxiv];
}

impl std::fmt::Display for Provider {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Provider::Crossref => write!(f, "CrossRef"),
      Provider::SemanticScholar => write!(f, "Semantic Scholar"),
      Provider::Doaj => write!(f, "DOAJ"),
      Provider::Arxiv => write!(f, "arXiv"),
    }
  }
}

impl FromStr for Provider {
  type Err = CiterError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match &s.trim().to_lowercase() as &str {
      "crossref" => Ok(Provider::Crossref),
      "semanticscholar" | "semantic-scholar" | "semantic scholar" | "s2" =>
        Ok(Provider::SemanticScholar),
      "doaj" => Ok(Provider::Doaj),
      "arxiv" => Ok(Provider::Arxiv),
      s => Err(CiterError::InvalidProvider(s.to_owned())),
    }
  }
}

/// The first-result record extracted from a provider response.
///
/// Every field is optional because providers routinely omit them; the
/// formatter substitutes placeholders for whatever is missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paper {
  /// Author names in publication order. CrossRef records hold family names,
  /// the other providers hold full names.
  pub authors:     Vec<String>,
  /// Publication year
  pub year:        Option<i32>,
  /// The work's title
  pub title:       Option<String>,
  /// Journal, proceedings, or repository name
  pub venue:       Option<String>,
  /// The link printed in the citation (a DOI link when available)
  pub url:         Option<String>,
  /// The publisher's landing page, when the provider reports one
  pub landing_url: Option<String>,
  /// The work's DOI, if known
  pub doi:         Option<String>,
  /// Which provider produced this record
  pub provider:    Provider,
}

impl Paper {
  /// The first listed author, if any.
  pub fn lead_author(&self) -> Option<&str> { self.authors.first().map(String::as_str) }

  /// Every URL known for this record.
  ///
  /// Domain filters inspect all of them: a DOI link says nothing about the
  /// publisher, while the landing page does.
  pub fn candidate_urls(&self) -> impl Iterator<Item = &str> {
    self.url.iter().chain(self.landing_url.iter()).map(String::as_str)
  }
}

/// Builds the canonical resolver link for a DOI.
pub(crate) fn doi_url(doi: &str) -> String { format!("https://doi.org/{}", doi.trim()) }

/// Returns `None` for strings that are empty after trimming.
pub(crate) fn non_blank(s: Option<String>) -> Option<String> {
  s.map(|s| s.split_whitespace().collect::<Vec<_>>().join(" ")).filter(|s| !s.is_empty())
}
