//! Publisher-domain filters.
//!
//! Two static tables decide whether a record may be cited:
//! - [`Denylist`]: paywalled publisher domains. A record is dropped when any of
//!   its URLs contains a denylisted substring.
//! - [`AreaTable`]: per-subject-area allowlists of open-access domains. A record
//!   is kept for an area only when one of its URLs contains an allowed substring.
//!
//! Matching is a case-insensitive substring test anywhere in the URL. Both
//! tables are built once from [`Config`] and never mutated.
//!
//! # Examples
//!
//! ```
//! use citer::policy::Denylist;
//!
//! let denylist = Denylist::default();
//! assert!(denylist.is_denied("https://www.ScienceDirect.com/science/article/pii/S0"));
//! assert!(!denylist.is_denied("https://arxiv.org/abs/2301.07041"));
//! ```

use super::*;

/// Paywalled publisher domains rejected out of the box.
pub const DEFAULT_DENYLIST: [&str; 6] = [
  "jstor.org",
  "sciencedirect.com",
  "springer.com",
  "tandfonline.com",
  "wiley.com",
  "cambridge.org",
];

/// The area used when a label is unknown and the table falls back.
pub const DEFAULT_AREA: &str = "general";

/// What to do with a subject-area label missing from the table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownArea {
  /// Use the table's default area.
  #[default]
  Fallback,
  /// Fail with [`CiterError::UnknownArea`].
  Reject,
}

/// Case-insensitive substring test of `url` against every pattern.
fn contains_any<'a>(url: &str, patterns: impl IntoIterator<Item = &'a String>) -> bool {
  let url = url.to_lowercase();
  patterns.into_iter().any(|p| !p.is_empty() && url.contains(p.as_str()))
}

/// Lowercases and trims a list of domain substrings, dropping empty entries.
fn normalize_domains(domains: impl IntoIterator<Item = String>) -> Vec<String> {
  domains.into_iter().map(|d| d.trim().to_lowercase()).filter(|d| !d.is_empty()).collect()
}

/// Normalizes a subject-area label: trimmed, lowercased, with spaces and
/// underscores turned into dashes.
///
/// ```
/// assert_eq!(citer::policy::normalize_area(" Computer_Science "), "computer-science");
/// ```
pub fn normalize_area(label: &str) -> String {
  label
    .trim()
    .to_lowercase()
    .split(|c: char| c.is_whitespace() || c == '_' || c == '-')
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join("-")
}

/// Substrings identifying publishers whose content is not freely accessible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Denylist {
  /// Lowercased domain substrings
  domains: Vec<String>,
}

impl Denylist {
  /// Builds a denylist from domain substrings.
  pub fn new(domains: impl IntoIterator<Item = String>) -> Self {
    Self { domains: normalize_domains(domains) }
  }

  /// Whether `url` contains any denylisted substring.
  pub fn is_denied(&self, url: &str) -> bool { contains_any(url, &self.domains) }

  /// Whether none of the record's URLs is denylisted.
  pub fn admits(&self, paper: &Paper) -> bool {
    !paper.candidate_urls().any(|url| self.is_denied(url))
  }

  /// The normalized domain substrings.
  pub fn domains(&self) -> &[String] { &self.domains }
}

impl Default for Denylist {
  fn default() -> Self { Self::new(DEFAULT_DENYLIST.iter().map(|d| d.to_string())) }
}

/// Built-in open-access allowlists per subject area.
pub fn default_areas() -> BTreeMap<String, Vec<String>> {
  let table: [(&str, &[&str]); 9] = [
    (DEFAULT_AREA, &[
      "doaj.org",
      "arxiv.org",
      "plos.org",
      "mdpi.com",
      "frontiersin.org",
      "scielo",
      "redalyc.org",
      "zenodo.org",
      "hindawi.com",
      "biomedcentral.com",
      "peerj.com",
      "elifesciences.org",
    ]),
    ("computer-science", &[
      "arxiv.org",
      "aclanthology.org",
      "jmlr.org",
      "lipics.dagstuhl.de",
      "peerj.com",
      "mdpi.com",
    ]),
    ("medicine", &[
      "ncbi.nlm.nih.gov",
      "europepmc.org",
      "biomedcentral.com",
      "bmj.com",
      "plos.org",
      "medrxiv.org",
      "frontiersin.org",
    ]),
    ("biology", &[
      "biorxiv.org",
      "elifesciences.org",
      "plos.org",
      "peerj.com",
      "biomedcentral.com",
      "frontiersin.org",
    ]),
    ("physics", &["arxiv.org", "iopscience.iop.org", "scipost.org", "journals.aps.org/prx"]),
    ("mathematics", &["arxiv.org", "emis.de", "msp.org", "combinatorics.org"]),
    ("social-sciences", &[
      "scielo",
      "redalyc.org",
      "ssrn.com",
      "osf.io",
      "mdpi.com",
      "frontiersin.org",
    ]),
    ("education", &[
      "eric.ed.gov",
      "scielo",
      "redalyc.org",
      "dialnet.unirioja.es",
      "frontiersin.org",
    ]),
    ("humanities", &["openedition.org", "scielo", "redalyc.org", "doaj.org", "zenodo.org"]),
  ];

  table
    .into_iter()
    .map(|(area, domains)| (area.to_string(), domains.iter().map(|d| d.to_string()).collect()))
    .collect()
}

/// Maps subject-area labels to allowed open-access domain substrings.
///
/// # Examples
///
/// ```
/// use citer::policy::{AreaTable, UnknownArea};
///
/// let table = AreaTable::default();
/// let (area, _) = table.resolve("Medicine").unwrap();
/// assert_eq!(area, "medicine");
///
/// // Unknown labels fall back to the default area
/// let (area, _) = table.resolve("alchemy").unwrap();
/// assert_eq!(area, "general");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaTable {
  /// Normalized area label to lowercased domain substrings
  areas:        BTreeMap<String, Vec<String>>,
  /// Label used for fallback
  default_area: String,
  /// Policy for labels missing from `areas`
  unknown:      UnknownArea,
}

impl AreaTable {
  /// Builds a table, normalizing labels and domains.
  ///
  /// # Errors
  ///
  /// Returns [`CiterError::InvalidConfig`] when `default_area` isn't one of the
  /// table's areas.
  pub fn new(
    areas: BTreeMap<String, Vec<String>>,
    default_area: &str,
    unknown: UnknownArea,
  ) -> Result<Self, CiterError> {
    let areas: BTreeMap<_, _> = areas
      .into_iter()
      .map(|(label, domains)| (normalize_area(&label), normalize_domains(domains)))
      .collect();
    let default_area = normalize_area(default_area);

    if !areas.contains_key(&default_area) {
      return Err(CiterError::InvalidConfig(format!(
        "default area `{default_area}` is not defined in the area table"
      )));
    }

    Ok(Self { areas, default_area, unknown })
  }

  /// Looks up the allowlist for a label.
  ///
  /// Returns the normalized label actually used, which is the default area
  /// when the label is unknown and the policy is [`UnknownArea::Fallback`].
  ///
  /// # Errors
  ///
  /// - [`CiterError::MissingField`] for a blank label
  /// - [`CiterError::UnknownArea`] for an unknown label under
  ///   [`UnknownArea::Reject`]
  pub fn resolve(&self, label: &str) -> Result<(&str, &[String]), CiterError> {
    let label = normalize_area(label);
    if label.is_empty() {
      return Err(CiterError::MissingField("area"));
    }

    if let Some((area, domains)) = self.areas.get_key_value(&label) {
      return Ok((area.as_str(), domains.as_slice()));
    }

    match self.unknown {
      UnknownArea::Fallback => {
        debug!("Unknown area `{label}`, falling back to `{}`", self.default_area);
        let domains = self.areas.get(&self.default_area).map(Vec::as_slice).unwrap_or_default();
        Ok((self.default_area.as_str(), domains))
      },
      UnknownArea::Reject => Err(CiterError::UnknownArea(label)),
    }
  }

  /// Whether any of the record's URLs contains one of the allowed substrings.
  pub fn allows(allowed: &[String], paper: &Paper) -> bool {
    paper.candidate_urls().any(|url| contains_any(url, allowed))
  }

  /// The default area label.
  pub fn default_area(&self) -> &str { &self.default_area }

  /// Every area with its allowed domains.
  pub fn areas(&self) -> &BTreeMap<String, Vec<String>> { &self.areas }
}

impl Default for AreaTable {
  fn default() -> Self {
    Self {
      areas:        default_areas(),
      default_area: DEFAULT_AREA.to_string(),
      unknown:      UnknownArea::Fallback,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn paper_at(url: &str, landing: Option<&str>) -> Paper {
    Paper {
      authors:     vec![],
      year:        None,
      title:       None,
      venue:       None,
      url:         Some(url.to_string()),
      landing_url: landing.map(str::to_string),
      doi:         None,
      provider:    Provider::Crossref,
    }
  }

  #[test]
  fn test_denylist_matches_anywhere_any_case() {
    let denylist = Denylist::default();
    assert!(denylist.is_denied("https://www.jstor.org/stable/123"));
    assert!(denylist.is_denied("HTTPS://LINK.SPRINGER.COM/article/1"));
    assert!(denylist.is_denied("https://proxy.example/?target=onlinelibrary.wiley.com"));
    assert!(denylist.is_denied("https://www.Cambridge.org/core"));
    assert!(!denylist.is_denied("https://doi.org/10.1371/journal.pone.0000001"));
    assert!(!denylist.is_denied(""));
  }

  #[test]
  fn test_denylist_checks_landing_page() {
    let denylist = Denylist::default();
    let paper = paper_at("https://doi.org/10.1016/j.x", Some("https://www.sciencedirect.com/pii/1"));
    assert!(!denylist.admits(&paper));
    assert!(denylist.admits(&paper_at("https://doi.org/10.3390/x", Some("https://www.mdpi.com/1"))));
  }

  #[test]
  fn test_denylist_normalizes_entries() {
    let denylist = Denylist::new(vec![" Elsevier.COM ".to_string(), "".to_string()]);
    assert_eq!(denylist.domains(), ["elsevier.com"]);
    assert!(denylist.is_denied("https://www.elsevier.com/x"));
    assert!(!denylist.is_denied("https://arxiv.org/abs/1"));
  }

  #[test]
  fn test_normalize_area() {
    assert_eq!(normalize_area("Computer Science"), "computer-science");
    assert_eq!(normalize_area("social_sciences"), "social-sciences");
    assert_eq!(normalize_area("  MEDICINE  "), "medicine");
    assert_eq!(normalize_area("   "), "");
  }

  #[test]
  fn test_resolve_known_and_fallback() {
    let table = AreaTable::default();
    let (area, domains) = table.resolve("Physics").unwrap();
    assert_eq!(area, "physics");
    assert!(domains.contains(&"arxiv.org".to_string()));

    let (area, domains) = table.resolve("underwater basket weaving").unwrap();
    assert_eq!(area, DEFAULT_AREA);
    assert!(domains.contains(&"doaj.org".to_string()));
  }

  #[test]
  fn test_resolve_reject_policy() {
    let table = AreaTable::new(default_areas(), "general", UnknownArea::Reject).unwrap();
    assert!(table.resolve("medicine").is_ok());
    assert!(matches!(table.resolve("alchemy"), Err(CiterError::UnknownArea(a)) if a == "alchemy"));
  }

  #[test]
  fn test_resolve_blank_label() {
    let table = AreaTable::default();
    assert!(matches!(table.resolve("  "), Err(CiterError::MissingField("area"))));
  }

  #[test]
  fn test_new_rejects_missing_default() {
    let mut areas = BTreeMap::new();
    areas.insert("physics".to_string(), vec!["arxiv.org".to_string()]);
    assert!(matches!(
      AreaTable::new(areas, "general", UnknownArea::Fallback),
      Err(CiterError::InvalidConfig(_))
    ));
  }

  #[test]
  fn test_allows_any_candidate_url() {
    let table = AreaTable::default();
    let (_, medicine) = table.resolve("medicine").unwrap();
    let paper = paper_at("https://doi.org/10.1186/x", Some("https://BMCMedicine.BioMedCentral.com/x"));
    assert!(AreaTable::allows(medicine, &paper));
    assert!(!AreaTable::allows(medicine, &paper_at("https://arxiv.org/abs/1", None)));
  }
}
