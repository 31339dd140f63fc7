use crate::common::CommonArgs;
use crate::recipe::{BuildType, PlanOptions, build_plan, run_plan};
use clap::Args;

#[derive(Args)]
pub struct BuildArgs {
    #[arg(short = 'r', long)]
    release: bool,
}

impl BuildArgs {
    pub fn run(&self, common: &CommonArgs) -> anyhow::Result<()> {
        let mut opts = PlanOptions::new(&common.manifest_path);
        opts.build_type = BuildType::from_release(self.release);

        tracing::info!(build_type = %opts.build_type, "building workspace");
        run_plan(&build_plan(&opts), common.dry_run)?;
        Ok(())
    }
}
