//! The calculator build recipe: settings, requirements and build/test plans.

mod error;
pub mod plan;
pub mod requirements;
pub mod settings;

use std::path::Path;

pub use error::RecipeError;
pub use plan::{OutputMode, PlanOptions, build_plan, run_plan, test_plan};
pub use requirements::{CheckReport, RequiredPackage};
pub use settings::{BuildType, Settings};

/// Packages every calculator build needs.
pub const DEFAULT_REQUIREMENTS: [RequiredPackage; 4] = [
    RequiredPackage::new("tokio", "test framework"),
    RequiredPackage::new("tracing", "formatting"),
    RequiredPackage::new("prost", "serialization"),
    RequiredPackage::new("tonic", "rpc"),
];

#[derive(Debug, Clone)]
pub struct Recipe {
    pub name: &'static str,
    pub settings: Settings,
    pub requirements: Vec<RequiredPackage>,
}

impl Recipe {
    pub const CALCULATOR: &'static str = "CalculatorAppRecipe";

    /// The calculator recipe for the host, debug build.
    #[must_use]
    pub fn calculator() -> Self {
        Self {
            name: Self::CALCULATOR,
            settings: Settings::detect(BuildType::Debug),
            requirements: DEFAULT_REQUIREMENTS.to_vec(),
        }
    }

    #[must_use]
    pub fn with_build_type(mut self, build_type: BuildType) -> Self {
        self.settings.build_type = build_type;
        self
    }

    /// # Errors
    /// See [`requirements::check`].
    pub fn check(&self, manifest: &Path) -> Result<CheckReport, RecipeError> {
        requirements::check(manifest, &self.requirements)
    }
}
