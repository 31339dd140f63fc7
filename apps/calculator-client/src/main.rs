use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use calc_bootstrap::{AppConfig, CliOverrides, ClientConfig, ClientMode, init_logging};
use calc_transport_grpc::GrpcClientConfig;
use calculator::{CalculatorServer, LocalCalculatorClient};
use calculator_sdk::{
    CalculatorClient, CalculatorError, CalculatorGrpcClient, Operation, SERVICE_NAME,
};
use clap::{Parser, Subcommand};

/// Calculator Client - runs calculations remotely or in-process
#[derive(Parser)]
#[command(name = "calculator-client")]
#[command(about = "Calculator Client - runs calculations remotely or in-process")]
#[command(version)]
struct Cli {
    /// Path to configuration file (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Server endpoint (overrides config); implies remote mode
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Evaluate in-process even if an endpoint is configured
    #[arg(long, conflicts_with = "endpoint")]
    local: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the demo calculations (10.5 + 20.7 and 10.0 / 0.0)
    Demo,
    /// Evaluate a single expression, e.g. `calc 6 mul 7`
    Calc {
        #[arg(allow_negative_numbers = true)]
        a: f64,
        /// add, sub, mul, div or + - * /
        op: Operation,
        #[arg(allow_negative_numbers = true)]
        b: f64,
    },
}

/// Where calculations are evaluated.
enum Backend {
    Remote(CalculatorGrpcClient),
    InProcess {
        server: Arc<CalculatorServer>,
        client: LocalCalculatorClient,
    },
}

impl Backend {
    async fn open(config: &AppConfig) -> Result<Self> {
        if config.client.is_remote() {
            let endpoint = config.client.endpoint.clone();
            tracing::info!(%endpoint, "connecting to calculator service");
            let client = CalculatorGrpcClient::connect_with_config(
                endpoint.clone(),
                &grpc_config(&config.client),
            )
            .await
            .with_context(|| format!("failed to connect to {endpoint}"))?;
            return Ok(Self::Remote(client));
        }

        tracing::info!("running calculations in-process");
        let server = Arc::new(CalculatorServer::new(config.server.queue_capacity));
        server.start();
        let client = LocalCalculatorClient::new(Arc::clone(&server));
        Ok(Self::InProcess { server, client })
    }

    fn client(&self) -> &dyn CalculatorClient {
        match self {
            Self::Remote(client) => client,
            Self::InProcess { client, .. } => client,
        }
    }

    async fn close(self) {
        if let Self::InProcess { server, .. } = self {
            server.stop().await;
        }
    }
}

fn grpc_config(cfg: &ClientConfig) -> GrpcClientConfig {
    GrpcClientConfig::new(SERVICE_NAME)
        .with_connect_timeout(cfg.connect_timeout())
        .with_rpc_timeout(cfg.rpc_timeout())
        .with_max_retries(cfg.max_retries)
}

/// Print `label = Result: x` or `label = Error: msg`.
///
/// Transport failures are not calculation results and abort the run.
fn report(label: &str, outcome: Result<f64, CalculatorError>) -> Result<()> {
    match outcome {
        Ok(value) => println!("{label} = Result: {value}"),
        Err(CalculatorError::Rejected(message)) => println!("{label} = Error: {message}"),
        Err(e) => return Err(e).with_context(|| format!("calculation '{label}' failed")),
    }
    Ok(())
}

async fn run_demo(client: &dyn CalculatorClient) -> Result<()> {
    report("10.5 + 20.7", client.add(10.5, 20.7).await)?;
    report("10.0 / 0.0", client.divide(10.0, 0.0).await)?;
    Ok(())
}

async fn run_calc(client: &dyn CalculatorClient, a: f64, op: Operation, b: f64) -> Result<()> {
    let label = format!("{a} {} {b}", op.symbol());
    report(&label, client.calculate(a, b, op).await)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Unless configured otherwise only warnings reach stderr, keeping the
    // demo output clean.
    let mut defaults = AppConfig::default();
    "warn".clone_into(&mut defaults.logging.level);

    let mut config = AppConfig::load_with_defaults(cli.config.as_deref(), defaults)?;
    config.apply_cli_overrides(&CliOverrides {
        endpoint: cli.endpoint.clone(),
        client_mode: cli.local.then_some(ClientMode::Local),
        verbose: cli.verbose,
        ..CliOverrides::default()
    })?;

    init_logging(&config.logging).context("failed to initialize logging")?;

    let backend = Backend::open(&config).await?;

    let result = match cli.command.unwrap_or(Commands::Demo) {
        Commands::Demo => run_demo(backend.client()).await,
        Commands::Calc { a, op, b } => run_calc(backend.client(), a, op, b).await,
    };

    backend.close().await;
    result
}
