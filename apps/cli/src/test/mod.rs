use std::num::NonZeroUsize;

use crate::common::CommonArgs;
use crate::recipe::{BuildType, OutputMode, PlanOptions, run_plan, test_plan};
use clap::Args;

#[derive(Args)]
pub struct TestArgs {
    #[arg(short = 'r', long)]
    release: bool,
    /// Test threads (defaults to the processor count)
    #[arg(short = 'j', long)]
    jobs: Option<NonZeroUsize>,
    /// Show output of passing tests too
    #[arg(long)]
    show_output: bool,
}

impl TestArgs {
    pub fn run(&self, common: &CommonArgs) -> anyhow::Result<()> {
        let mut opts = PlanOptions::new(&common.manifest_path);
        opts.build_type = BuildType::from_release(self.release);
        if let Some(jobs) = self.jobs {
            opts.jobs = jobs;
        }
        if self.show_output {
            opts.output = OutputMode::Always;
        }

        tracing::info!(build_type = %opts.build_type, jobs = opts.jobs.get(), "testing workspace");
        run_plan(&test_plan(&opts), common.dry_run)?;
        Ok(())
    }
}
