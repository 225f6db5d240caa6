//! A library for finding open-access citations for free-text queries across
//! CrossRef, Semantic Scholar, DOAJ, and arXiv.
//!
//! Providers are queried one after another; the first record that survives the
//! publisher-domain filter is formatted as a citation string.
//!
//! # Example
//! ```rust,no_run
//! use citer::{config::Config, resolver::Resolver};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!   let resolver = Resolver::new(&Config::default())?;
//!   let citation = resolver.first_citation("open access publishing").await?;
//!   println!("{}", citation.text);
//!
//!   Ok(())
//! }
//! ```

#![warn(missing_docs, clippy::missing_docs_in_private_items)]
use std::{collections::BTreeMap, path::PathBuf, str::FromStr, sync::Arc, time::Duration};

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
#[cfg(test)] use tracing_test::traced_test;

pub mod clients;
pub mod config;
pub mod errors;
pub mod format;
pub mod paper;
pub mod policy;
pub mod resolver;

use clients::{ArxivClient, CrossrefClient, DoajClient, SemanticScholarClient};
use config::Config;
use errors::CiterError;
use format::Citation;
use paper::{Paper, Provider};
use policy::{AreaTable, Denylist};
