//! CLI command definitions and handlers.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lexi_core::{LexicalStore, MemoryStore};
use lexi_graph::GraphClient;

use crate::config::AppConfig;

pub mod graph;
pub mod serve;

/// Lexigraph - explore a lexical graph of Japanese words
#[derive(Parser)]
#[command(name = "lexi")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file (defaults to ./lexigraph.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Serve a JSON fixture instead of connecting to Neo4j
    #[arg(long, global = true)]
    pub fixture: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web viewer and API
    Serve(serve::ServeArgs),

    /// Lexical graph commands
    #[command(subcommand)]
    Graph(graph::GraphCommands),
}

/// Where graph data comes from for this invocation.
pub struct Session {
    pub config: AppConfig,
    pub fixture: Option<PathBuf>,
}

impl Session {
    /// Open the store: the fixture when one was given, Neo4j otherwise.
    pub async fn open_store(&self) -> Result<Arc<dyn LexicalStore>> {
        match &self.fixture {
            Some(path) => {
                let store = MemoryStore::load(path)
                    .with_context(|| format!("Failed to load fixture {}", path.display()))?;
                Ok(Arc::new(store))
            }
            None => Ok(Arc::new(self.connect().await?)),
        }
    }

    /// Connect to Neo4j directly, for commands that need the real database.
    pub async fn connect(&self) -> Result<GraphClient> {
        GraphClient::connect(&self.config.graph)
            .await
            .with_context(|| format!("Cannot reach Neo4j at {}", self.config.graph.uri))
    }
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let config = AppConfig::load(self.config.as_deref())?;
        let session = Session {
            config,
            fixture: self.fixture,
        };

        match self.command {
            Commands::Serve(args) => serve::execute(args, &session).await,
            Commands::Graph(cmd) => graph::execute(cmd, &session).await,
        }
    }
}
