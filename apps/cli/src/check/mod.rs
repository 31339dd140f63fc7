use crate::common::CommonArgs;
use crate::recipe::Recipe;
use clap::Args;

#[derive(Args)]
pub struct CheckArgs {}

impl CheckArgs {
    pub fn run(&self, common: &CommonArgs) -> anyhow::Result<()> {
        let recipe = Recipe::calculator();
        let report = recipe.check(&common.manifest_path)?;

        for requirement in &report.satisfied {
            println!(
                "ok      {} {} ({})",
                requirement.name, requirement.version_req, requirement.kind
            );
        }
        for failure in &report.failures {
            println!("failed  {failure}");
        }

        if !report.is_ok() {
            anyhow::bail!(
                "{} of {} requirements not satisfied",
                report.failures.len(),
                recipe.requirements.len()
            );
        }
        Ok(())
    }
}
