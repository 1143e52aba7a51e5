//! Command-line driver for the roster core.
//!
//! Runs the orchestrator against a JSON fixture instead of a live API and
//! prints the resulting snapshot:
//!
//! ```text
//! roster --fixture influencers.json --platform youtube --limit 10 --pages 2
//! roster --fixture influencers.json --fetch 42
//! ```
//!
//! Filter flags are applied as one update after the initial search, so the
//! output also shows how the page was reset.

#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use futures::executor::block_on;
use roster::{
    initialize, Config, ContextSnapshot, EntityId, FilterPatch, FixtureGateway, Influencer, Orchestrator,
    RosterError,
};
use serde::Serialize;
use std::num::NonZeroU32;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "roster", version, about = "Search and paginate an influencer directory")]
struct Cli {
    /// JSON array of records served by the fixture gateway
    #[arg(long)]
    fixture: PathBuf,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Name/username search text
    #[arg(long)]
    search: Option<String>,

    #[arg(long)]
    category: Option<String>,

    #[arg(long)]
    platform: Option<String>,

    /// Page size
    #[arg(long)]
    limit: Option<NonZeroU32>,

    /// Number of pages to load
    #[arg(long, default_value_t = NonZeroU32::MIN)]
    pages: NonZeroU32,

    /// Also fetch a single record by id
    #[arg(long)]
    fetch: Option<EntityId>,
}

#[derive(Serialize)]
struct Output {
    snapshot: ContextSnapshot,
    fetched: Option<Influencer>,
}

impl Cli {
    fn patch(&self) -> FilterPatch {
        let mut patch = FilterPatch::default();
        patch.search.clone_from(&self.search);
        patch.category.clone_from(&self.category);
        patch.platform.clone_from(&self.platform);
        patch.limit = self.limit;
        patch
    }
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), RosterError> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    roster::observability::init_tracing(&config);

    let gateway = FixtureGateway::from_file(roster::infrastructure::expand_tilde(&cli.fixture))?;
    let orchestrator = initialize(&config, gateway);

    let fetched = block_on(drive(&orchestrator, &cli))?;

    let output = Output {
        snapshot: orchestrator.snapshot(),
        fetched,
    };
    let rendered = serde_json::to_string_pretty(&output)
        .map_err(|e| RosterError::Fixture(format!("failed to render output: {e}")))?;
    println!("{rendered}");
    Ok(())
}

async fn drive(
    orchestrator: &Orchestrator<FixtureGateway>,
    cli: &Cli,
) -> Result<Option<Influencer>, RosterError> {
    orchestrator.start().await?;

    let patch = cli.patch();
    if !patch.is_empty() {
        orchestrator.update_filters(patch).await?;
    }

    for _ in 1..cli.pages.get() {
        if !orchestrator.snapshot().has_more {
            break;
        }
        orchestrator.load_more_results().await?;
    }

    match &cli.fetch {
        Some(id) => match orchestrator.fetch_influencer_by_id(id.clone()).await {
            Ok(record) => Ok(Some(record)),
            Err(RosterError::Api(e)) => {
                tracing::debug!(error = %e, "fetch failed");
                eprintln!("fetch {id}: {e}");
                Ok(None)
            }
            Err(e) => Err(e),
        },
        None => Ok(None),
    }
}
