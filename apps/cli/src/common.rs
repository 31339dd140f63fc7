use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct CommonArgs {
    /// Workspace manifest the recipe operates on
    #[arg(long, global = true, default_value = "Cargo.toml")]
    pub manifest_path: PathBuf,

    /// Print the steps without running them
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
