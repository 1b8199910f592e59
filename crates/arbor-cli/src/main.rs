//! Arbor CLI Application
//!
//! Command-line interface and MCP server for the Arbor WBS engine.

mod args;
mod cli;
mod mcp;
mod renderer;

use anyhow::{Context, Result};
use arbor_core::EngineBuilder;
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use log::info;
use mcp::{run_stdio_server, ArborMcpServer};
use renderer::TerminalRenderer;
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        no_color,
        command,
    } = Args::parse();

    let engine = EngineBuilder::new()
        .with_database_path(database_file)
        .build()
        .await
        .context("Failed to initialize engine")?;

    let renderer = TerminalRenderer::new(!no_color);

    info!("Arbor started");

    match command {
        Some(Project { command }) => {
            Cli::new(engine, renderer)
                .handle_project_command(command)
                .await
        }
        Some(Node { command }) => Cli::new(engine, renderer).handle_node_command(command).await,
        Some(Tree(args)) => Cli::new(engine, renderer).tree(args).await,
        Some(Assign { command }) => {
            Cli::new(engine, renderer)
                .handle_assign_command(command)
                .await
        }
        Some(Delayed(args)) => Cli::new(engine, renderer).delayed(args).await,
        Some(Serve) => {
            info!("Starting Arbor MCP server");
            run_stdio_server(ArborMcpServer::new(engine))
                .await
                .context("MCP server failed")
        }
        None => Cli::new(engine, renderer).list_projects().await,
    }
}
