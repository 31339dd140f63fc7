use anyhow::Context;
use calc_bootstrap::LoggingConfig;
use calc_bootstrap::config::level_for_verbosity;
use clap::{Parser, Subcommand};

mod build;
mod check;
mod common;
mod recipe;
mod settings;
mod test;

#[derive(Parser)]
#[command(version, about = "Build recipe driver for the calculator workspace", long_about = None)]
#[command(propagate_version = true)]
#[command(name = "calc")]
struct Cli {
    #[command(flatten)]
    common: common::CommonArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the recipe's settings axes
    Settings(settings::SettingsArgs),
    /// Check declared requirements against the workspace manifest
    Check(check::CheckArgs),
    /// Configure and build the workspace
    Build(build::BuildArgs),
    /// Configure, build and test the workspace
    Test(test::TestArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let logging = LoggingConfig {
        level: level_for_verbosity(cli.common.verbose)
            .unwrap_or("warn")
            .to_owned(),
        ..LoggingConfig::default()
    };
    calc_bootstrap::init_logging(&logging).context("failed to initialize logging")?;

    match cli.command {
        Commands::Settings(settings) => {
            settings.run();
            Ok(())
        }
        Commands::Check(check) => check.run(&cli.common),
        Commands::Test(test) => test.run(&cli.common),
        Commands::Build(build) => build.run(&cli.common),
    }
}
