//! Process-wide configuration.
//!
//! Configuration is read once at startup from an optional TOML file; every
//! field has a default, so an empty file (or no file at all) yields a working
//! setup. The filter tables built from it are immutable for the lifetime of
//! the process.
//!
//! # Examples
//!
//! ```
//! use citer::config::Config;
//!
//! let config: Config = toml::from_str(
//!   r#"
//!   bind = "0.0.0.0:8080"
//!   timeout_secs = 5
//!   denylist = ["jstor.org", "elsevier.com"]
//!   "#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.timeout_secs, 5);
//! assert_eq!(config.default_area, "general");
//! ```

use std::path::Path;

use super::*;
use crate::policy::{default_areas, UnknownArea, DEFAULT_AREA, DEFAULT_DENYLIST};

/// Base URLs of the upstream APIs.
///
/// Overridable so tests (or mirrors) can point clients elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Providers {
  /// CrossRef REST API root
  pub crossref:         String,
  /// Semantic Scholar API root
  pub semantic_scholar: String,
  /// DOAJ API root
  pub doaj:             String,
  /// arXiv API root
  pub arxiv:            String,
}

impl Default for Providers {
  fn default() -> Self {
    Self {
      crossref:         "https://api.crossref.org".to_string(),
      semantic_scholar: "https://api.semanticscholar.org".to_string(),
      doaj:             "https://doaj.org".to_string(),
      arxiv:            "http://export.arxiv.org".to_string(),
    }
  }
}

/// Configuration for the resolver and the HTTP service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Address the HTTP service listens on
  pub bind:         String,
  /// Timeout applied to every upstream request, in seconds
  pub timeout_secs: u64,
  /// User agent sent to every provider
  pub user_agent:   String,
  /// Contact address for CrossRef's polite pool
  pub mailto:       Option<String>,
  /// Rows requested from CrossRef when a request doesn't ask for a number
  pub default_rows: u32,
  /// Upper bound on rows requested from CrossRef
  pub max_rows:     u32,
  /// Upstream API base URLs
  pub providers:    Providers,
  /// Paywalled publisher domain substrings
  pub denylist:     Vec<String>,
  /// Allowed open-access domain substrings per subject area
  pub areas:        BTreeMap<String, Vec<String>>,
  /// Area used for unknown labels
  pub default_area: String,
  /// Policy for area labels missing from `areas`
  pub unknown_area: UnknownArea,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      bind:         "127.0.0.1:5000".to_string(),
      timeout_secs: 10,
      user_agent:   concat!("citer/", env!("CARGO_PKG_VERSION")).to_string(),
      mailto:       None,
      default_rows: 5,
      max_rows:     20,
      providers:    Providers::default(),
      denylist:     DEFAULT_DENYLIST.iter().map(|d| d.to_string()).collect(),
      areas:        default_areas(),
      default_area: DEFAULT_AREA.to_string(),
      unknown_area: UnknownArea::Fallback,
    }
  }
}

impl Config {
  /// Default config file location in the user's config directory.
  pub fn default_path() -> PathBuf {
    dirs::config_dir().unwrap_or_else(|| PathBuf::from(".")).join("citer").join("config.toml")
  }

  /// Reads and validates a TOML config file.
  ///
  /// # Errors
  ///
  /// Fails when the file can't be read, isn't valid TOML, or doesn't pass
  /// [`Config::validate`].
  pub fn load(path: impl AsRef<Path>) -> Result<Self, CiterError> {
    let path = path.as_ref();
    debug!("Loading config from: {}", path.display());
    let text = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&text)?;
    config.validate()?;
    Ok(config)
  }

  /// Loads `path` if given, otherwise [`Config::default_path`] if that file
  /// exists, otherwise the built-in defaults.
  pub fn load_or_default(path: Option<&Path>) -> Result<Self, CiterError> {
    match path {
      Some(path) => Self::load(path),
      None => {
        let path = Self::default_path();
        if path.exists() {
          Self::load(path)
        } else {
          debug!("No config file at {}, using defaults", path.display());
          Ok(Self::default())
        }
      },
    }
  }

  /// Checks invariants that serde can't express.
  pub fn validate(&self) -> Result<(), CiterError> {
    if self.max_rows == 0 {
      return Err(CiterError::InvalidConfig("max_rows must be at least 1".into()));
    }
    if self.timeout_secs == 0 {
      return Err(CiterError::InvalidConfig("timeout_secs must be at least 1".into()));
    }
    self.area_table().map(|_| ())
  }

  /// The upstream request timeout.
  pub fn timeout(&self) -> Duration { Duration::from_secs(self.timeout_secs) }

  /// Builds the denylist from this configuration.
  pub fn denylist(&self) -> Denylist { Denylist::new(self.denylist.iter().cloned()) }

  /// Builds the area table from this configuration.
  pub fn area_table(&self) -> Result<AreaTable, CiterError> {
    AreaTable::new(self.areas.clone(), &self.default_area, self.unknown_area)
  }

  /// Clamps a requested row count to `1..=max_rows`, using `default_rows`
  /// when nothing was requested.
  pub fn rows(&self, requested: Option<u32>) -> u32 {
    requested.unwrap_or(self.default_rows).clamp(1, self.max_rows.max(1))
  }
}
