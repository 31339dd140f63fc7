use std::path::PathBuf;
use std::process::ExitStatus;

use super::plan::Phase;

#[derive(thiserror::Error, Debug)]
pub enum RecipeError {
    #[error("failed to read manifest {}: {source}", path.display())]
    ManifestRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse manifest {}: {source}", path.display())]
    ManifestParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("requirement '{name}' is not declared in [workspace.dependencies]")]
    MissingRequirement { name: String },

    #[error("requirement '{name}' has no version")]
    MissingVersion { name: String },

    #[error("requirement '{name}' has invalid version '{version}': {source}")]
    InvalidVersion {
        name: String,
        version: String,
        source: semver::Error,
    },

    #[error("recipe declares no requirements")]
    EmptyRequirements,

    #[error("failed to launch {phase} step: {source}")]
    StepSpawn {
        phase: Phase,
        source: std::io::Error,
    },

    #[error("{phase} step failed ({status})")]
    StepFailed { phase: Phase, status: ExitStatus },
}
