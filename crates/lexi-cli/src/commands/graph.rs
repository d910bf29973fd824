//! Lexical graph CLI commands.

use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use clap::Subcommand;
use colored::Colorize;
use dialoguer::{Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use lexi_core::view::{EmptyReason, ViewEvent, ViewState, Viewer};
use lexi_core::{
    expand_neighbors, node_detail, Depth, ExpansionRequest, GraphResponse, LexiError,
    LexicalStore, SearchField, ServiceConfig,
};

use super::Session;
use crate::output;

#[derive(Subcommand)]
pub enum GraphCommands {
    /// Explore the neighborhood of a word
    Explore {
        /// Word to center on
        term: String,
        /// Traversal depth (1 or 2)
        #[arg(long, default_value = "1")]
        depth: i64,
        /// Field the term is matched against (kanji, hiragana, translation)
        #[arg(long, default_value = "kanji")]
        field: String,
        /// Keep exploring by picking neighbors
        #[arg(short, long)]
        interactive: bool,
    },

    /// Show a node and its neighbors, strongest first
    Node {
        /// Node identifier
        id: String,
    },

    /// Show graph status
    Status,

    /// Create the indexes lookups rely on
    Schema,
}

pub async fn execute(cmd: GraphCommands, session: &Session) -> Result<()> {
    let config = &session.config.service;

    match cmd {
        GraphCommands::Explore {
            term,
            depth,
            field,
            interactive,
        } => {
            let request = ExpansionRequest::new(term, Depth::try_from(depth)?, field.parse::<SearchField>()?);
            let store = session.open_store().await?;
            if interactive {
                cmd_interactive(store.as_ref(), config, request).await
            } else {
                cmd_explore(store.as_ref(), config, &request).await
            }
        }
        GraphCommands::Node { id } => {
            let store = session.open_store().await?;
            cmd_node(store.as_ref(), config, &id).await
        }
        GraphCommands::Status => cmd_status(session).await,
        GraphCommands::Schema => cmd_schema(session).await,
    }
}

fn spinner(message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(message);
    spinner
}

/// Attach the recovery hint, if any, to a service error.
fn explain(err: LexiError) -> anyhow::Error {
    match err.hint() {
        Some(hint) => anyhow!("{} ({})", err, hint),
        None => err.into(),
    }
}

async fn load(
    store: &dyn LexicalStore,
    config: &ServiceConfig,
    request: &ExpansionRequest,
) -> Result<GraphResponse, LexiError> {
    let progress = spinner(format!("Expanding {} (depth {})...", request.center, request.depth));
    let result = expand_neighbors(store, request, config).await;
    progress.finish_and_clear();
    result
}

/// Explore the neighborhood of a word once.
async fn cmd_explore(
    store: &dyn LexicalStore,
    config: &ServiceConfig,
    request: &ExpansionRequest,
) -> Result<()> {
    println!(
        "{} {} (field={}, depth={})",
        "Exploring".bold(),
        request.center.yellow(),
        request.field,
        request.depth
    );
    println!("{}", "─".repeat(50));

    let graph = load(store, config, request).await.map_err(explain)?;
    output::print_graph(&request.center, &graph);
    Ok(())
}

/// Show node detail.
async fn cmd_node(store: &dyn LexicalStore, config: &ServiceConfig, id: &str) -> Result<()> {
    let detail = node_detail(store, id, config).await.map_err(explain)?;
    output::print_detail(&detail);
    Ok(())
}

/// Show node/relationship totals.
async fn cmd_status(session: &Session) -> Result<()> {
    let store = session.open_store().await?;
    let counts = store.counts().await.map_err(explain)?;
    let source = match &session.fixture {
        Some(path) => format!("fixture {}", path.display()),
        None => session.config.graph.uri.clone(),
    };
    output::print_counts(&source, &counts);
    Ok(())
}

/// Create indexes on the Neo4j database.
async fn cmd_schema(session: &Session) -> Result<()> {
    if session.fixture.is_some() {
        bail!("Schema setup needs a Neo4j connection; drop --fixture");
    }
    let client = session.connect().await?;
    println!("{}", "Initializing lexical graph schema...".bold());
    let applied = lexi_graph::schema::initialize_schema(&client)
        .await
        .map_err(explain)?;
    println!("{} {} statement(s) applied", "✓".green(), applied);
    Ok(())
}

/// Next step picked by the user in the interactive explorer.
enum Action {
    Submit(ExpansionRequest),
    Open(String),
    Detail(String),
    Quit,
}

/// Interactive exploration driven by the viewer state machine.
async fn cmd_interactive(
    store: &dyn LexicalStore,
    config: &ServiceConfig,
    first: ExpansionRequest,
) -> Result<()> {
    let mut viewer = Viewer::new();
    let mut current: Option<GraphResponse> = None;
    viewer.apply(ViewEvent::Submit(first))?;

    loop {
        if let Some((seq, request)) = viewer.pending() {
            let request = request.clone();
            let event = match load(store, config, &request).await {
                Ok(graph) => {
                    output::print_graph(&request.center, &graph);
                    let outcome = graph.outcome();
                    current = Some(graph);
                    ViewEvent::Loaded { seq, outcome }
                }
                Err(e) => {
                    println!("{} {}", "Error:".red().bold(), e);
                    if let Some(hint) = e.hint() {
                        println!("  {}", hint.dimmed());
                    }
                    ViewEvent::Failed {
                        seq,
                        message: e.to_string(),
                        retryable: e.is_retryable(),
                    }
                }
            };
            viewer.apply(event)?;
        }

        let action = match viewer.state() {
            ViewState::Rendered { center, .. } => pick_neighbor(center, current.as_ref())?,
            ViewState::Empty { request, reason } => {
                if *reason == EmptyReason::NoMatch {
                    println!("{}", "No data found. Try another word or search field.".yellow());
                }
                Action::Submit(ask_request(Some(request))?)
            }
            ViewState::Error { request, retryable, .. } => {
                let request = request.clone();
                pick_after_error(request, *retryable)?
            }
            ViewState::Idle => Action::Submit(ask_request(None)?),
            ViewState::Loading { .. } => continue,
        };

        match action {
            Action::Submit(request) if request.center.trim().is_empty() => break,
            Action::Submit(request) => {
                viewer.apply(ViewEvent::Submit(request))?;
            }
            Action::Open(id) => {
                viewer.apply(ViewEvent::NodeClicked(id))?;
            }
            Action::Detail(id) => {
                println!();
                match node_detail(store, &id, config).await {
                    Ok(detail) => output::print_detail(&detail),
                    Err(e) => println!("{} {}", "Error:".red().bold(), explain(e)),
                }
                println!();
            }
            Action::Quit => break,
        }
    }

    Ok(())
}

fn pick_neighbor(center: &str, graph: Option<&GraphResponse>) -> Result<Action> {
    let neighbors: Vec<(String, String)> = graph
        .map(|g| {
            g.nodes
                .iter()
                .filter(|n| !n.is_center)
                .map(|n| (n.id.clone(), format_choice(&n.name, n.reading.as_deref())))
                .collect()
        })
        .unwrap_or_default();

    let mut items: Vec<String> = neighbors.iter().map(|(_, label)| format!("→ {}", label)).collect();
    items.push(format!("Detail of {}", center));
    items.push("New search".to_string());
    items.push("Quit".to_string());

    println!();
    let choice = Select::new()
        .with_prompt("Next")
        .items(&items)
        .default(0)
        .interact()
        .context("Failed to read selection")?;

    let extra = choice.saturating_sub(neighbors.len());
    Ok(match neighbors.get(choice) {
        Some((id, _)) => Action::Open(id.clone()),
        None if extra == 0 => Action::Detail(center.to_string()),
        None if extra == 1 => Action::Submit(ask_request(None)?),
        None => Action::Quit,
    })
}

fn pick_after_error(request: ExpansionRequest, retryable: bool) -> Result<Action> {
    let mut items = Vec::new();
    if retryable {
        items.push("Retry");
    }
    items.push("New search");
    items.push("Quit");

    let choice = Select::new()
        .with_prompt("Next")
        .items(&items)
        .default(0)
        .interact()
        .context("Failed to read selection")?;

    Ok(match items[choice] {
        "Retry" => Action::Submit(request),
        "New search" => Action::Submit(ask_request(Some(&request))?),
        _ => Action::Quit,
    })
}

/// Prompt for a new request, defaulting to the fields of `previous`.
/// An empty word ends the session.
fn ask_request(previous: Option<&ExpansionRequest>) -> Result<ExpansionRequest> {
    let center: String = Input::new()
        .with_prompt("Word (empty to quit)")
        .allow_empty(true)
        .interact_text()
        .context("Failed to read word")?;
    if center.trim().is_empty() {
        return Ok(ExpansionRequest::new("", Depth::default(), SearchField::default()));
    }

    let fields = SearchField::all();
    let field_default = previous
        .and_then(|p| fields.iter().position(|f| *f == p.field))
        .unwrap_or(0);
    let field_labels: Vec<&str> = fields.iter().map(|f| f.as_str()).collect();
    let field = Select::new()
        .with_prompt("Search field")
        .items(&field_labels)
        .default(field_default)
        .interact()
        .context("Failed to read search field")?;

    let depth_default = match previous.map(|p| p.depth) {
        Some(Depth::Two) => 1,
        _ => 0,
    };
    let depth = Select::new()
        .with_prompt("Depth")
        .items(&["1", "2"])
        .default(depth_default)
        .interact()
        .context("Failed to read depth")?;

    Ok(ExpansionRequest::new(
        center,
        Depth::try_from(depth as i64 + 1)?,
        fields[field],
    ))
}

fn format_choice(name: &str, reading: Option<&str>) -> String {
    match reading {
        Some(reading) if reading != name => format!("{} ({})", name, reading),
        _ => name.to_string(),
    }
}
