//! Candidate MCP Server - Rust Implementation
//!
//! A Model Context Protocol (MCP) server exposing a job candidate's resume
//! and profile links, with optional email contact through Mailgun.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};

use candidate_mcp_server::capability::compute_active_set;
use candidate_mcp_server::config::Config;
use candidate_mcp_server::contact::MailgunRelay;
use candidate_mcp_server::mcp::create_server;

/// Candidate MCP Server
#[derive(Parser)]
#[command(name = "candidate-mcp-server")]
#[command(author, version, about = "Candidate MCP Server - expose a candidate's profile to AI agents")]
struct Cli {
    /// Path to a JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the capabilities the current configuration exposes
    Capabilities,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;

    match cli.command {
        Some(Commands::Capabilities) => {
            let active = compute_active_set(&config.candidate, &config.contact);
            for name in active.iter() {
                println!("{}", name);
            }
        }
        None => {
            run_server(config).await?;
        }
    }

    Ok(())
}

async fn run_server(config: Config) -> anyhow::Result<()> {
    let relay = Arc::new(MailgunRelay::new(&config.relay).context("failed to build relay client")?);

    let mut server = create_server(&config, relay).context("failed to register capabilities")?;
    server.run_stdio().await?;

    Ok(())
}
