//! Build and test plans: ordered `cargo` invocations.

use std::fmt;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::process::Command;

use super::error::RecipeError;
use super::settings::BuildType;

const CARGO: &str = "cargo";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    Configure,
    Build,
    Test,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Configure => "configure",
            Self::Build => "build",
            Self::Test => "test",
        })
    }
}

/// When captured test output is shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputMode {
    /// libtest default: only failing tests print their output.
    #[default]
    OnFailure,
    Always,
}

#[derive(Debug, Clone)]
pub struct PlanOptions {
    pub manifest_path: PathBuf,
    pub build_type: BuildType,
    pub jobs: NonZeroUsize,
    pub output: OutputMode,
}

impl PlanOptions {
    #[must_use]
    pub fn new(manifest_path: impl Into<PathBuf>) -> Self {
        Self {
            manifest_path: manifest_path.into(),
            build_type: BuildType::Debug,
            jobs: default_jobs(),
            output: OutputMode::OnFailure,
        }
    }

    fn manifest_arg(&self) -> String {
        self.manifest_path.to_string_lossy().into_owned()
    }
}

/// Processor count, falling back to one.
#[must_use]
pub fn default_jobs() -> NonZeroUsize {
    std::thread::available_parallelism().unwrap_or(NonZeroUsize::MIN)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub phase: Phase,
    pub args: Vec<String>,
}

impl Step {
    /// Uses the `cargo` that launched us (`$CARGO`) when there is one.
    fn command(&self) -> Command {
        let program = std::env::var_os("CARGO").unwrap_or_else(|| CARGO.into());
        let mut cmd = Command::new(program);
        cmd.args(&self.args);
        cmd
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{CARGO} {}", self.args.join(" "))
    }
}

fn configure_step(opts: &PlanOptions) -> Step {
    Step {
        phase: Phase::Configure,
        args: vec!["fetch".into(), "--manifest-path".into(), opts.manifest_arg()],
    }
}

fn build_step(opts: &PlanOptions) -> Step {
    let mut args: Vec<String> = ["build", "--workspace", "--all-targets", "--manifest-path"]
        .into_iter()
        .map(String::from)
        .collect();
    args.push(opts.manifest_arg());
    if opts.build_type.is_release() {
        args.push("--release".into());
    }
    Step {
        phase: Phase::Build,
        args,
    }
}

fn test_step(opts: &PlanOptions) -> Step {
    let mut args: Vec<String> = ["test", "--workspace", "--manifest-path"]
        .into_iter()
        .map(String::from)
        .collect();
    args.push(opts.manifest_arg());
    if opts.build_type.is_release() {
        args.push("--release".into());
    }
    args.push("--quiet".into());

    // libtest arguments
    args.push("--".into());
    args.push(format!("--test-threads={}", opts.jobs));
    if opts.output == OutputMode::Always {
        args.push("--nocapture".into());
    }

    Step {
        phase: Phase::Test,
        args,
    }
}

#[must_use]
pub fn build_plan(opts: &PlanOptions) -> Vec<Step> {
    vec![configure_step(opts), build_step(opts)]
}

#[must_use]
pub fn test_plan(opts: &PlanOptions) -> Vec<Step> {
    vec![configure_step(opts), build_step(opts), test_step(opts)]
}

/// Run `steps` in order, stopping at the first failure.
///
/// With `dry_run` the steps are only printed.
///
/// # Errors
/// `StepSpawn` if `cargo` cannot be launched, `StepFailed` on a non-zero exit.
pub fn run_plan(steps: &[Step], dry_run: bool) -> Result<(), RecipeError> {
    for step in steps {
        println!("[{}] {step}", step.phase);
        if dry_run {
            continue;
        }

        tracing::info!(phase = %step.phase, command = %step, "running step");
        let status = step
            .command()
            .status()
            .map_err(|source| RecipeError::StepSpawn {
                phase: step.phase,
                source,
            })?;

        if !status.success() {
            return Err(RecipeError::StepFailed {
                phase: step.phase,
                status,
            });
        }
    }
    Ok(())
}
