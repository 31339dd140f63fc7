//! Build settings: the four axes a build is keyed on.

use std::ffi::OsString;
use std::fmt;
use std::process::Command;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BuildType {
    #[default]
    Debug,
    Release,
}

impl BuildType {
    #[must_use]
    pub fn from_release(release: bool) -> Self {
        if release { Self::Release } else { Self::Debug }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "Debug",
            Self::Release => "Release",
        }
    }

    #[must_use]
    pub fn is_release(self) -> bool {
        self == Self::Release
    }
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub os: String,
    pub compiler: String,
    pub build_type: BuildType,
    pub arch: String,
}

impl Settings {
    /// Settings of the host, with the requested build type.
    #[must_use]
    pub fn detect(build_type: BuildType) -> Self {
        Self {
            os: std::env::consts::OS.to_owned(),
            compiler: detect_compiler(),
            build_type,
            arch: std::env::consts::ARCH.to_owned(),
        }
    }

    #[must_use]
    pub fn axes(&self) -> [(&'static str, &str); 4] {
        [
            ("os", self.os.as_str()),
            ("compiler", self.compiler.as_str()),
            ("build_type", self.build_type.as_str()),
            ("arch", self.arch.as_str()),
        ]
    }
}

/// `$RUSTC --version`, or `"unknown"` when the compiler cannot be run.
fn detect_compiler() -> String {
    let rustc = std::env::var_os("RUSTC").unwrap_or_else(|| OsString::from("rustc"));

    match Command::new(&rustc).arg("--version").output() {
        Ok(output) if output.status.success() => {
            let version = String::from_utf8_lossy(&output.stdout).trim().to_owned();
            if version.is_empty() {
                "unknown".to_owned()
            } else {
                version
            }
        }
        Ok(output) => {
            tracing::debug!(status = %output.status, "compiler version query failed");
            "unknown".to_owned()
        }
        Err(e) => {
            tracing::debug!(error = %e, rustc = %rustc.to_string_lossy(), "compiler not found");
            "unknown".to_owned()
        }
    }
}
