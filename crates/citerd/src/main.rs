use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use citer::{config::Config, format::Citation, paper::Provider, resolver::Resolver};
use clap::{builder::ArgAction, Parser, Subcommand};
use console::{style, Emoji};
use errors::CiterdErrors;
use tracing::{debug, info, trace};
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub mod errors;
pub mod server;

static LOOKING_GLASS: Emoji<'_, '_> = Emoji("🔍 ", "");
static BOOKS: Emoji<'_, '_> = Emoji("📚 ", "");
static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "");
static SUCCESS: Emoji<'_, '_> = Emoji("✨ ", "");

#[derive(Parser)]
#[command(author, version, about = "HTTP service and CLI for open-access citation lookup")]
struct Cli {
  /// Verbose mode (-v, -vv, -vvv)
  #[arg(
        short,
        long,
        action = ArgAction::Count,
        global = true,
        help = "Increase logging verbosity"
    )]
  verbose: u8,

  /// Path to a TOML config file
  #[arg(long, short, global = true)]
  config: Option<PathBuf>,

  /// Also write logs to daily rotating files in this directory
  #[arg(long, global = true)]
  log_dir: Option<PathBuf>,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Run the HTTP API
  Serve {
    /// Address to listen on, overrides the config file
    #[arg(long, short)]
    bind: Option<String>,
  },
  /// Find a citation for a free-text query
  Search {
    /// Search query
    query:    String,
    /// Show one citation per provider instead of the first match
    #[arg(long)]
    all:      bool,
    /// Ask only this provider (crossref, semantic-scholar, doaj, arxiv)
    #[arg(long, short, conflicts_with = "all")]
    provider: Option<Provider>,
  },
  /// Find CrossRef citations hosted on a subject area's open-access domains
  Cite {
    /// Search query
    query: String,
    /// Subject area (see `citerd areas`)
    #[arg(long, short)]
    area:  String,
    /// Number of CrossRef records to inspect
    #[arg(long, short)]
    limit: Option<u32>,
  },
  /// List subject areas and the domain filters
  Areas,
}

/// Setup logging with the specified verbosity level.
///
/// Logs go to stderr; with `log_dir` they are also written to a daily rotating
/// file. The returned guard must live as long as the process.
fn setup_logging(
  verbosity: u8,
  log_dir: Option<&Path>,
) -> Result<Option<WorkerGuard>, CiterdErrors> {
  let filter = match verbosity {
    0 => "warn",
    1 => "info",
    2 => "debug",
    _ => "trace",
  };

  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

  let stderr_layer = tracing_subscriber::fmt::layer()
    .with_writer(std::io::stderr)
    .with_file(true)
    .with_line_number(true)
    .with_thread_ids(true)
    .with_target(true);

  let (file_layer, guard) = match log_dir {
    Some(dir) => {
      std::fs::create_dir_all(dir)?;
      let file_appender = rolling::RollingFileAppender::builder()
        .rotation(rolling::Rotation::DAILY)
        .filename_prefix("citerd")
        .filename_suffix("log")
        .build(dir)?;
      let (writer, guard) = tracing_appender::non_blocking(file_appender);

      let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_thread_ids(true)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);
      (Some(layer), Some(guard))
    },
    None => (None, None),
  };

  tracing_subscriber::registry().with(filter).with(stderr_layer).with(file_layer).init();
  Ok(guard)
}

/// Prints a numbered list of citations.
fn print_citations(citations: &[Citation]) {
  for (i, citation) in citations.iter().enumerate() {
    println!("\n{}. {}", style(i + 1).yellow(), style(&citation.text).white());
    println!("   {} {}", style("Provider:").green(), style(citation.provider).cyan());
  }
}

#[tokio::main]
async fn main() -> Result<(), CiterdErrors> {
  let cli = Cli::parse();
  let _guard = setup_logging(cli.verbose, cli.log_dir.as_deref())?;

  let config = Config::load_or_default(cli.config.as_deref())?;
  trace!("Using config: {:?}", config);

  match cli.command {
    Commands::Serve { bind } => {
      let bind = bind.unwrap_or_else(|| config.bind.clone());
      let resolver = Arc::new(Resolver::new(&config)?);

      println!("{} Serving citations on: {}", style(ROCKET).cyan(), style(&bind).yellow());
      info!("Starting citerd on {bind}");
      server::serve(&bind, resolver).await
    },

    Commands::Search { query, all, provider } => {
      let resolver = Resolver::new(&config)?;
      println!("{} Searching for: {}", style(LOOKING_GLASS).cyan(), style(&query).yellow());

      if all {
        let citations = resolver.citations_per_provider(&query).await?;
        println!(
          "\n{} Found {} citations:",
          style(SUCCESS).green(),
          style(citations.len()).yellow()
        );
        print_citations(&citations);
      } else {
        let citation = match provider {
          Some(provider) => resolver.provider_citation(provider, &query).await?,
          None => resolver.first_citation(&query).await?,
        };
        debug!("Citation details: {:?}", citation);
        println!("\n{} Found citation:", style(SUCCESS).green());
        println!("   {}", style(&citation.text).white());
        println!("   {} {}", style("Provider:").green().bold(), style(citation.provider).cyan());
      }
      Ok(())
    },

    Commands::Cite { query, area, limit } => {
      let resolver = Resolver::new(&config)?;
      println!(
        "{} Searching {} for: {}",
        style(LOOKING_GLASS).cyan(),
        style(&area).cyan(),
        style(&query).yellow()
      );

      let found = resolver.area_citations(&query, &area, limit).await?;
      println!(
        "\n{} Found {} citations in area {}:",
        style(SUCCESS).green(),
        style(found.citations.len()).yellow(),
        style(&found.area).cyan()
      );
      print_citations(&found.citations);
      Ok(())
    },

    Commands::Areas => {
      let table = config.area_table()?;
      println!("{} Subject areas:", style(BOOKS).cyan());
      for (area, domains) in table.areas() {
        let marker = if area == table.default_area() { " (default)" } else { "" };
        println!(
          "   {}{} {}",
          style(area).green().bold(),
          style(marker).yellow(),
          style(domains.join(", ")).white()
        );
      }
      println!(
        "\n{} {}",
        style("Denylisted domains:").red().bold(),
        style(config.denylist().domains().join(", ")).white()
      );
      Ok(())
    },
  }
}
