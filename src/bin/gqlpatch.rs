//! gqlpatch: preview cache patches offline.
//!
//! Primes an in-memory cache with a cached query result read from disk,
//! applies an operation payload to it, and prints the patched result.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::warn;

use gqlpatch::{
    CachePatcher, ConfigOverrides, InMemoryCache, Intent, PatchConfig, PatchOutcome, QueryCache,
    QueryDocument, QueryTarget, UpdateRecipe, Variables, classify,
};

/// gqlpatch CLI
#[derive(Parser)]
#[command(name = "gqlpatch")]
#[command(version = gqlpatch::PKG_VERSION)]
#[command(about = "Preview GraphQL cache patches produced by mutation results")]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long, env = "GQLPATCH_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Apply an operation payload to a cached query result
    Apply {
        /// File containing the cached query's GraphQL document
        #[arg(long, conflicts_with = "query")]
        query_file: Option<PathBuf>,
        /// GraphQL document text of the cached query
        #[arg(short, long)]
        query: Option<String>,
        /// JSON file holding the cached query result
        #[arg(long)]
        cached: PathBuf,
        /// JSON file holding the operation result payload
        #[arg(long)]
        payload: PathBuf,
        /// Query variables as a JSON object
        #[arg(long)]
        variables: Option<String>,
        /// Explicit intent (ADD, REMOVE, UPDATE); classified from the name if omitted
        #[arg(long)]
        intent: Option<Intent>,
        /// Identity field override
        #[arg(long)]
        identity_field: Option<String>,
    },

    /// Classify operation names
    Classify {
        /// Operation names (e.g. createPost onDeleteComment)
        #[arg(required = true)]
        names: Vec<String>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialise tracing (default: warn for CLI; override with RUST_LOG).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    match args.command {
        Command::Classify { names } => {
            for name in names {
                println!("{name}\t{}", classify(&name, &config));
            }
        }
        Command::Apply {
            query_file,
            query,
            cached,
            payload,
            variables,
            intent,
            identity_field,
        } => {
            let source = match (query_file, query) {
                (Some(path), _) => fs::read_to_string(path)?,
                (None, Some(text)) => text,
                (None, None) => return Err("one of --query or --query-file is required".into()),
            };
            let variables: Variables = match variables {
                Some(json) => serde_json::from_str(&json)?,
                None => Variables::new(),
            };
            let target = QueryTarget::new(QueryDocument::parse(source)?).variables(variables);

            let mut recipe = UpdateRecipe::new(target);
            recipe.intent = intent;
            recipe.identity_field = identity_field;

            let cache = InMemoryCache::new();
            cache.write_query(&recipe.target, read_json(&cached)?)?;

            let outcome = CachePatcher::new(config).apply(&cache, &read_json(&payload)?, &recipe)?;
            match outcome {
                PatchOutcome::Applied { intent, field } => {
                    eprintln!("applied {intent} from '{field}'");
                }
                PatchOutcome::Skipped(reason) => {
                    eprintln!("skipped: {}", reason.as_str());
                }
            }
            let result = cache.read_query(&recipe.target)?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}

/// Defaults merged with the config file, if one is found.
fn load_config(explicit: Option<&Path>) -> gqlpatch::Result<PatchConfig> {
    let overrides = match ConfigOverrides::load(explicit) {
        Ok(overrides) => overrides,
        Err(e) if explicit.is_none() => {
            warn!(error = %e, "ignoring unreadable default config file");
            ConfigOverrides::default()
        }
        Err(e) => return Err(e),
    };
    Ok(PatchConfig::default().with_overrides(overrides))
}

fn read_json(path: &Path) -> gqlpatch::Result<Value> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
