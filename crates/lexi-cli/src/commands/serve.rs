//! Web server command.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use lexi_web::AppState;

use super::Session;

#[derive(Args)]
pub struct ServeArgs {
    /// Port to listen on (overrides [server].port)
    #[arg(long)]
    pub port: Option<u16>,

    /// Host to bind to (overrides [server].host)
    #[arg(long)]
    pub host: Option<String>,

    /// Also write logs to a file
    #[arg(long)]
    pub log: bool,

    /// Log file path (defaults to .lexigraph/serve.log)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

pub async fn execute(args: ServeArgs, session: &Session) -> Result<()> {
    let server = &session.config.server;
    let host = args.host.unwrap_or_else(|| server.host.clone());
    let port = args.port.unwrap_or(server.port);
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", host, port))?;

    let store = session.open_store().await?;
    let source = match &session.fixture {
        Some(path) => format!("fixture {}", path.display()),
        None => session.config.graph.uri.clone(),
    };

    println!();
    println!("  {} {}", "Lexigraph".cyan().bold(), "Web Server".bold());
    println!();
    println!("  {}  http://{}", "Viewer".green(), addr);
    println!("  {}     http://{}/api/v1", "API".green(), addr);
    println!("  {}  {}", "Source".green(), source);
    println!();
    println!("  {}", "Ctrl+C to stop".dimmed());
    println!();

    let state = AppState::new(store, session.config.service.clone());
    lexi_web::run_server(state, addr).await?;

    Ok(())
}
