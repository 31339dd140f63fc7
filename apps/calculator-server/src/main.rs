use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use calc_bootstrap::{AppConfig, CliOverrides, init_logging, wait_for_shutdown};
use calculator::CalculatorServer;
use calculator::api::grpc;
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;

/// Calculator Server - gRPC arithmetic service
#[derive(Parser)]
#[command(name = "calculator-server")]
#[command(about = "Calculator Server - gRPC arithmetic service")]
#[command(version)]
struct Cli {
    /// Path to configuration file (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address override (overrides config)
    #[arg(short, long)]
    bind: Option<String>,

    /// Print effective configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Validate configuration and exit
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Layered config:
    // 1) defaults -> 2) YAML (if provided) -> 3) env (CALC__*) -> 4) CLI overrides
    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_cli_overrides(&CliOverrides {
        bind_addr: cli.bind.clone(),
        verbose: cli.verbose,
        ..CliOverrides::default()
    })?;

    init_logging(&config.logging).context("failed to initialize logging")?;

    if cli.print_config {
        println!("Effective configuration:\n{}", config.to_pretty_json()?);
        return Ok(());
    }

    // Dispatch subcommands (default: run)
    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(&config).await,
        Commands::Check => check_config(&config),
    }
}

fn check_config(config: &AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");
    // Loading already validated every layer.
    println!("Configuration is valid");
    println!("{}", config.to_pretty_json()?);
    Ok(())
}

async fn run_server(config: &AppConfig) -> Result<()> {
    let addr = config.server.socket_addr()?;
    tracing::info!(
        %addr,
        queue_capacity = config.server.queue_capacity,
        "Calculator server starting"
    );

    let server = Arc::new(CalculatorServer::new(config.server.queue_capacity));
    server.start();

    let listener = grpc::bind(addr).await?;

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = wait_for_shutdown().await {
            tracing::error!(error = %e, "signal handling failed, shutting down");
        }
        signal_cancel.cancel();
    });

    let result = grpc::serve(listener, Arc::clone(&server), cancel).await;

    server.stop().await;
    tracing::info!("Calculator server stopped");
    result
}
