//! Requirement checks against the workspace manifest.
//!
//! Every package the recipe needs must be declared in
//! `[workspace.dependencies]`, either under its own key or through a
//! `package = "..."` rename, with a version that parses as a semver
//! requirement.

use std::fmt;
use std::path::Path;

use semver::{Op, VersionReq};

use super::error::RecipeError;

/// A package the recipe depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredPackage {
    pub name: &'static str,
    /// What the package is used for, e.g. "rpc".
    pub purpose: &'static str,
}

impl RequiredPackage {
    #[must_use]
    pub const fn new(name: &'static str, purpose: &'static str) -> Self {
        Self { name, purpose }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionKind {
    /// `=x.y.z`
    Exact,
    Range,
}

impl fmt::Display for VersionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact => f.write_str("exact"),
            Self::Range => f.write_str("range"),
        }
    }
}

/// A requirement resolved from the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    pub name: String,
    pub version_req: VersionReq,
    pub kind: VersionKind,
}

#[derive(Debug, Default)]
pub struct CheckReport {
    pub satisfied: Vec<Requirement>,
    pub failures: Vec<RecipeError>,
}

impl CheckReport {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Check `required` against the manifest at `manifest`.
///
/// Per-package problems are collected into the report; only an unusable
/// manifest or an empty requirement list is a hard error.
///
/// # Errors
/// `EmptyRequirements`, `ManifestRead` or `ManifestParse`.
pub fn check(manifest: &Path, required: &[RequiredPackage]) -> Result<CheckReport, RecipeError> {
    if required.is_empty() {
        return Err(RecipeError::EmptyRequirements);
    }

    let text = std::fs::read_to_string(manifest).map_err(|source| RecipeError::ManifestRead {
        path: manifest.to_path_buf(),
        source,
    })?;
    let doc: toml::Table = toml::from_str(&text).map_err(|source| RecipeError::ManifestParse {
        path: manifest.to_path_buf(),
        source,
    })?;

    let deps = doc
        .get("workspace")
        .and_then(|w| w.get("dependencies"))
        .and_then(toml::Value::as_table);

    let mut report = CheckReport::default();
    for package in required {
        match resolve(deps, package.name) {
            Ok(requirement) => {
                tracing::debug!(
                    name = %requirement.name,
                    version = %requirement.version_req,
                    kind = %requirement.kind,
                    "requirement satisfied"
                );
                report.satisfied.push(requirement);
            }
            Err(e) => {
                tracing::debug!(name = package.name, error = %e, "requirement failed");
                report.failures.push(e);
            }
        }
    }

    Ok(report)
}

fn resolve(deps: Option<&toml::Table>, name: &str) -> Result<Requirement, RecipeError> {
    let entry = deps
        .and_then(|deps| find_entry(deps, name))
        .ok_or_else(|| RecipeError::MissingRequirement {
            name: name.to_owned(),
        })?;

    let version = match entry {
        toml::Value::String(version) => Some(version.as_str()),
        toml::Value::Table(table) => table.get("version").and_then(toml::Value::as_str),
        _ => None,
    }
    .ok_or_else(|| RecipeError::MissingVersion {
        name: name.to_owned(),
    })?;

    let version_req = VersionReq::parse(version).map_err(|source| RecipeError::InvalidVersion {
        name: name.to_owned(),
        version: version.to_owned(),
        source,
    })?;
    let kind = version_kind(&version_req);

    Ok(Requirement {
        name: name.to_owned(),
        version_req,
        kind,
    })
}

fn find_entry<'a>(deps: &'a toml::Table, name: &str) -> Option<&'a toml::Value> {
    deps.get(name).or_else(|| {
        deps.values().find(|value| {
            value
                .get("package")
                .and_then(toml::Value::as_str)
                .is_some_and(|package| package == name)
        })
    })
}

/// A single `=` comparator naming major, minor and patch is a pin.
fn version_kind(req: &VersionReq) -> VersionKind {
    match req.comparators.as_slice() {
        [c] if c.op == Op::Exact && c.minor.is_some() && c.patch.is_some() => VersionKind::Exact,
        _ => VersionKind::Range,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const NEEDED: [RequiredPackage; 3] = [
        RequiredPackage::new("tokio", "test framework"),
        RequiredPackage::new("prost", "serialization"),
        RequiredPackage::new("tonic", "rpc"),
    ];

    fn manifest(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn accepts_string_and_table_entries() {
        let file = manifest(
            r#"
[workspace.dependencies]
tokio = { version = "1.47", features = ["full"] }
prost = "=0.14.1"
tonic = "0.14"
"#,
        );

        let report = check(file.path(), &NEEDED).unwrap();
        assert!(report.is_ok(), "failures: {:?}", report.failures);
        assert_eq!(report.satisfied.len(), 3);

        let prost = report.satisfied.iter().find(|r| r.name == "prost").unwrap();
        assert_eq!(prost.kind, VersionKind::Exact);
        let tokio = report.satisfied.iter().find(|r| r.name == "tokio").unwrap();
        assert_eq!(tokio.kind, VersionKind::Range);
    }

    #[test]
    fn renamed_package_counts() {
        let file = manifest(
            r#"
[workspace.dependencies]
rpc = { package = "tonic", version = "0.14" }
tokio = "1"
prost = "0.14"
"#,
        );

        let report = check(file.path(), &NEEDED).unwrap();
        assert!(report.is_ok(), "failures: {:?}", report.failures);
    }

    #[test]
    fn collects_every_failure() {
        let file = manifest(
            r#"
[workspace.dependencies]
tokio = { path = "../tokio" }
prost = "not-a-version"
"#,
        );

        let report = check(file.path(), &NEEDED).unwrap();
        assert!(!report.is_ok());
        assert!(report.satisfied.is_empty());
        assert_eq!(report.failures.len(), 3);

        assert!(matches!(
            &report.failures[0],
            RecipeError::MissingVersion { name } if name == "tokio"
        ));
        assert!(matches!(
            &report.failures[1],
            RecipeError::InvalidVersion { name, version, .. }
                if name == "prost" && version == "not-a-version"
        ));
        assert!(matches!(
            &report.failures[2],
            RecipeError::MissingRequirement { name } if name == "tonic"
        ));
    }

    #[test]
    fn manifest_without_workspace_table_misses_everything() {
        let file = manifest("[package]\nname = \"x\"\n");

        let report = check(file.path(), &NEEDED).unwrap();
        assert_eq!(report.failures.len(), NEEDED.len());
    }

    #[test]
    fn hard_errors() {
        let err = check(Path::new("/nonexistent/Cargo.toml"), &NEEDED).unwrap_err();
        assert!(matches!(err, RecipeError::ManifestRead { .. }));

        let file = manifest("[workspace\n");
        let err = check(file.path(), &NEEDED).unwrap_err();
        assert!(matches!(err, RecipeError::ManifestParse { .. }));

        let err = check(file.path(), &[]).unwrap_err();
        assert!(matches!(err, RecipeError::EmptyRequirements));
    }

    #[test]
    fn version_kinds() {
        let kind = |s: &str| version_kind(&VersionReq::parse(s).unwrap());
        assert_eq!(kind("=1.2.3"), VersionKind::Exact);
        assert_eq!(kind("=1.2"), VersionKind::Range);
        assert_eq!(kind("1.2.3"), VersionKind::Range);
        assert_eq!(kind(">=1.0, <2.0"), VersionKind::Range);
    }
}
