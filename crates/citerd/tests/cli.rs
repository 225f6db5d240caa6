//! Integration tests for the citerd CLI commands.
//!
//! Lookups run against an `httpmock` server wired in through a temporary
//! config file, so no test touches the real provider APIs.

use std::{fs, path::PathBuf};

use assert_cmd::Command;
use httpmock::prelude::*;
use predicates::prelude::*;
use serde_json::json;
use tempfile::tempdir;

// Helper function to create a clean command instance
fn citerd() -> Command { Command::cargo_bin("citerd").unwrap() }

// Helper to write a config file pointing every provider at `base`
fn temp_config(base: &str, extra: &str) -> (tempfile::TempDir, PathBuf) {
  let dir = tempdir().unwrap();
  let path = dir.path().join("config.toml");
  let config = format!(
    r#"
timeout_secs = 2
{extra}

[providers]
crossref = "{base}"
semantic_scholar = "{base}"
doaj = "{base}"
arxiv = "{base}"
"#
  );
  fs::write(&path, config).unwrap();
  (dir, path)
}

#[test]
fn test_help_lists_commands() {
  citerd()
    .arg("--help")
    .assert()
    .success()
    .stdout(predicate::str::contains("serve"))
    .stdout(predicate::str::contains("search"))
    .stdout(predicate::str::contains("areas"));
}

#[test]
fn test_areas() {
  let (dir, config) = temp_config("http://127.0.0.1:9", "");

  citerd()
    .arg("areas")
    .arg("--config")
    .arg(&config)
    .assert()
    .success()
    .stdout(predicate::str::contains("general"))
    .stdout(predicate::str::contains("(default)"))
    .stdout(predicate::str::contains("jstor.org"));

  dir.close().unwrap();
}

#[test]
fn test_search_and_cite() {
  let server = MockServer::start();
  server.mock(|when, then| {
    when.method(GET).path("/works");
    then.status(200).json_body(json!({"message": {"items": [{
      "title": ["Citizen Science at Scale"],
      "author": [{"family": "Nakamura", "given": "Yui"}],
      "container-title": ["PLOS ONE"],
      "issued": {"date-parts": [[2016, 2]]},
      "DOI": "10.1371/journal.pone.0147152",
      "resource": {"primary": {"URL": "https://journals.plos.org/plosone/article?id=10.1371/journal.pone.0147152"}}
    }]}}));
  });
  let (dir, config) = temp_config(&server.base_url(), "");

  citerd()
    .arg("search")
    .arg("citizen science")
    .arg("--config")
    .arg(&config)
    .assert()
    .success()
    .stdout(predicate::str::contains("Found citation"))
    .stdout(predicate::str::contains(
      "Nakamura (2016). *Citizen Science at Scale*. *PLOS ONE*. \
       https://doi.org/10.1371/journal.pone.0147152",
    ));

  citerd()
    .arg("cite")
    .arg("citizen science")
    .arg("--area")
    .arg("biology")
    .arg("--config")
    .arg(&config)
    .assert()
    .success()
    .stdout(predicate::str::contains("Found 1 citations in area biology"));

  dir.close().unwrap();
}

#[test]
fn test_search_blank_query_fails() {
  let (dir, config) = temp_config("http://127.0.0.1:9", "");

  citerd()
    .arg("search")
    .arg("   ")
    .arg("--config")
    .arg(&config)
    .assert()
    .failure()
    .stderr(predicate::str::contains("MissingField"));

  dir.close().unwrap();
}

#[test]
fn test_cite_unknown_area_rejected() {
  let (dir, config) = temp_config("http://127.0.0.1:9", r#"unknown_area = "reject""#);

  citerd()
    .arg("cite")
    .arg("anything")
    .arg("--area")
    .arg("alchemy")
    .arg("--config")
    .arg(&config)
    .assert()
    .failure()
    .stderr(predicate::str::contains("UnknownArea"));

  dir.close().unwrap();
}

#[test]
fn test_search_single_provider() {
  let server = MockServer::start();
  server.mock(|when, then| {
    when.method(GET).path_contains("/api/v2/search/articles/");
    then.status(200).json_body(json!({"results": [{"bibjson": {
      "title": "Tidal Commons",
      "author": [{"name": "Noor Haddad"}],
      "year": "2020",
      "journal": {"title": "Ocean Open"},
      "link": [{"url": "https://www.frontiersin.org/articles/tidal"}]
    }}]}));
  });
  let (dir, config) = temp_config(&server.base_url(), "");

  citerd()
    .arg("search")
    .arg("tides")
    .arg("--provider")
    .arg("doaj")
    .arg("--config")
    .arg(&config)
    .assert()
    .success()
    .stdout(predicate::str::contains(
      "Noor Haddad (2020). *Tidal Commons*. *Ocean Open*. \
       https://www.frontiersin.org/articles/tidal",
    ));

  citerd()
    .arg("search")
    .arg("tides")
    .arg("--provider")
    .arg("scopus")
    .arg("--config")
    .arg(&config)
    .assert()
    .failure()
    .stderr(predicate::str::contains("scopus"));

  dir.close().unwrap();
}
