use crate::recipe::{BuildType, Recipe};
use clap::Args;

#[derive(Args)]
pub struct SettingsArgs {
    /// Show settings for a release build
    #[arg(short = 'r', long)]
    release: bool,
}

impl SettingsArgs {
    pub fn run(&self) {
        let recipe = Recipe::calculator().with_build_type(BuildType::from_release(self.release));

        println!("{}", recipe.name);
        for (axis, value) in recipe.settings.axes() {
            println!("  {axis}: {value}");
        }
        println!("requires:");
        for package in &recipe.requirements {
            println!("  {} ({})", package.name, package.purpose);
        }
    }
}
