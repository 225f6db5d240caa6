//! Citation string formatting.
//!
//! Every provider's record is rendered with the same pattern:
//!
//! ```text
//! {author} ({year}). *{title}*. *{venue}*. {url}
//! ```
//!
//! Title and venue are wrapped in Markdown emphasis. Missing fields are
//! replaced by fixed placeholders so the pattern always holds.
//!
//! # Examples
//!
//! ```
//! use citer::{
//!   format,
//!   paper::{Paper, Provider},
//! };
//!
//! let paper = Paper {
//!   authors:     vec!["Vaswani".into()],
//!   year:        Some(2017),
//!   title:       Some("Attention Is All You Need".into()),
//!   venue:       Some("arXiv".into()),
//!   url:         Some("http://arxiv.org/abs/1706.03762v7".into()),
//!   landing_url: None,
//!   doi:         None,
//!   provider:    Provider::Arxiv,
//! };
//!
//! assert_eq!(
//!   format::format_citation(&paper),
//!   "Vaswani (2017). *Attention Is All You Need*. *arXiv*. http://arxiv.org/abs/1706.03762v7"
//! );
//! ```

use super::*;

/// Placeholder for a record without authors.
pub const UNKNOWN_AUTHOR: &str = "Unknown author";
/// Placeholder for a record without a publication year.
pub const NO_DATE: &str = "n.d.";
/// Placeholder for a record without a title.
pub const UNTITLED: &str = "Untitled";
/// Placeholder for a record without a journal or repository name.
pub const UNSPECIFIED_VENUE: &str = "Unspecified venue";
/// Placeholder for a record without any link.
pub const NO_URL: &str = "URL not available";

/// A formatted citation together with where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
  /// The formatted citation string
  #[serde(rename = "citation")]
  pub text:     String,
  /// The provider the record was found in
  pub provider: Provider,
  /// The link printed in the citation, if the record had one
  pub url:      Option<String>,
}

impl From<&Paper> for Citation {
  fn from(paper: &Paper) -> Self {
    Self { text: format_citation(paper), provider: paper.provider, url: paper.url.clone() }
  }
}

impl std::fmt::Display for Citation {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(&self.text) }
}

/// Formats a record as `"{author} ({year}). *{title}*. *{venue}*. {url}"`.
///
/// # Examples
///
/// ```
/// use citer::{
///   format::format_citation,
///   paper::{Paper, Provider},
/// };
///
/// let paper = Paper {
///   authors:     vec![],
///   year:        None,
///   title:       None,
///   venue:       None,
///   url:         None,
///   landing_url: None,
///   doi:         None,
///   provider:    Provider::Doaj,
/// };
/// assert_eq!(
///   format_citation(&paper),
///   "Unknown author (n.d.). *Untitled*. *Unspecified venue*. URL not available"
/// );
/// ```
pub fn format_citation(paper: &Paper) -> String {
  let author = paper.lead_author().unwrap_or(UNKNOWN_AUTHOR);
  let year = paper.year.map(|y| y.to_string()).unwrap_or_else(|| NO_DATE.to_string());
  let title = paper.title.as_deref().unwrap_or(UNTITLED);
  let venue = paper.venue.as_deref().unwrap_or(UNSPECIFIED_VENUE);
  let url = paper.url.as_deref().unwrap_or(NO_URL);

  format!("{author} ({year}). *{title}*. *{venue}*. {url}")
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_format_citation_full_record() {
    let paper = Paper {
      authors:     vec!["Smith".into(), "Jones".into()],
      year:        Some(2019),
      title:       Some("Open Science".into()),
      venue:       Some("PLOS ONE".into()),
      url:         Some("https://doi.org/10.1371/journal.pone.0000001".into()),
      landing_url: Some("https://journals.plos.org/plosone/article?id=1".into()),
      doi:         Some("10.1371/journal.pone.0000001".into()),
      provider:    Provider::Crossref,
    };

    assert_eq!(
      format_citation(&paper),
      "Smith (2019). *Open Science*. *PLOS ONE*. https://doi.org/10.1371/journal.pone.0000001"
    );
  }

  #[test]
  fn test_format_citation_partial_record() {
    let paper = Paper {
      authors:     vec!["Ada Lovelace".into()],
      year:        None,
      title:       Some("Notes".into()),
      venue:       None,
      url:         None,
      landing_url: None,
      doi:         None,
      provider:    Provider::Doaj,
    };

    assert_eq!(
      format_citation(&paper),
      "Ada Lovelace (n.d.). *Notes*. *Unspecified venue*. URL not available"
    );
  }

  #[test]
  fn test_citation_from_paper() {
    let paper = Paper {
      authors:     vec!["Turing".into()],
      year:        Some(1950),
      title:       Some("Computing Machinery and Intelligence".into()),
      venue:       Some("Semantic Scholar".into()),
      url:         Some("https://www.semanticscholar.org/paper/abc".into()),
      landing_url: None,
      doi:         None,
      provider:    Provider::SemanticScholar,
    };

    let citation = Citation::from(&paper);
    assert_eq!(citation.provider, Provider::SemanticScholar);
    assert_eq!(citation.url.as_deref(), Some("https://www.semanticscholar.org/paper/abc"));
    assert_eq!(citation.to_string(), citation.text);
    assert!(citation.text.starts_with("Turing (1950). *Computing Machinery"));

    let json = serde_json::to_value(&citation).unwrap();
    assert_eq!(json["provider"], "semantic-scholar");
    assert!(json["citation"].as_str().unwrap().ends_with("paper/abc"));
  }
}
