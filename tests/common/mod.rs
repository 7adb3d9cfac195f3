//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests.

#![allow(dead_code)]

use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Test workspace context
///
/// Creates a temporary directory holding a source tree, a private config
/// directory and any fake tools.
pub struct TestProject {
    /// Temporary directory for the test workspace
    pub dir: TempDir,
}

impl TestProject {
    /// Create a new test workspace in a temporary directory
    pub fn new() -> Self {
        let project = Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        };
        project.create_dir("src");
        project.create_dir("config");
        project
    }

    /// Get the path to the test workspace directory
    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Root scanned for project files
    pub fn src(&self) -> PathBuf {
        self.dir.path().join("src")
    }

    /// Failure log location used by [`TestProject::run`]
    pub fn log_path(&self) -> PathBuf {
        self.dir.path().join("buildFailure.log")
    }

    /// File the fake compiler appends invoked descriptors to
    pub fn calls_path(&self) -> PathBuf {
        self.dir.path().join("calls.txt")
    }

    /// Create a file in the test workspace
    pub fn create_file(&self, name: &str, content: &str) {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(path, content).expect("Failed to write file");
    }

    /// Create a directory in the test workspace
    pub fn create_dir(&self, name: &str) {
        let path = self.dir.path().join(name);
        std::fs::create_dir_all(path).expect("Failed to create directory");
    }

    /// Check if a file exists in the test workspace
    pub fn file_exists(&self, name: &str) -> bool {
        self.dir.path().join(name).exists()
    }

    /// Read a file from the test workspace
    pub fn read_file(&self, name: &str) -> String {
        std::fs::read_to_string(self.dir.path().join(name)).expect("Failed to read file")
    }

    /// Add `src/<identity>/<identity>.csproj`
    ///
    /// `marker` ends up in a comment and steers the fake compiler
    /// (`FAIL`, `HANG`, `NOISE`, `STDERR`).
    pub fn add_project(&self, identity: &str, references: &[&str], marker: &str) {
        self.create_file(
            &format!("src/{identity}/{identity}.csproj"),
            &descriptor(identity, references, marker),
        );
    }

    /// Descriptors the fake compiler was invoked with, in order
    pub fn calls(&self) -> Vec<String> {
        if !self.calls_path().exists() {
            return Vec::new();
        }
        std::fs::read_to_string(self.calls_path())
            .expect("Failed to read calls")
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Install the fake compiler and return its path
    #[cfg(unix)]
    pub fn fake_compiler(&self) -> PathBuf {
        self.script("fake-msbuild.sh", FAKE_COMPILER)
    }

    /// Install an executable shell script
    #[cfg(unix)]
    pub fn script(&self, name: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = self.dir.path().join(name);
        std::fs::write(&path, body).expect("Failed to write script");
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .expect("Failed to make script executable");
        path
    }

    /// Base command with an isolated config directory and log file
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_batchbuild"));
        cmd.current_dir(self.path())
            .env("BATCHBUILD_CONFIG_DIR", self.dir.path().join("config"))
            .env("FAKE_CALLS", self.calls_path())
            .env_remove("BATCHBUILD_COMPILER")
            .env_remove("RUST_LOG")
            .arg("--log-file")
            .arg(self.log_path());
        cmd
    }

    /// Run batchbuild over `src/` with the fake compiler
    #[cfg(unix)]
    pub fn run(&self, args: &[&str]) -> Output {
        let mut cmd = self.command();
        cmd.arg(self.src()).arg("--compiler").arg(self.fake_compiler());
        cmd.args(args);
        cmd.output().expect("Failed to execute batchbuild")
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

/// MSBuild-style descriptor text
pub fn descriptor(identity: &str, references: &[&str], marker: &str) -> String {
    let mut refs = String::new();
    for reference in references {
        refs.push_str(&format!(
            "    <ProjectReference Include=\"..\\{reference}\\{reference}.csproj\" />\n"
        ));
    }
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<Project ToolsVersion="4.0" xmlns="http://schemas.microsoft.com/developer/msbuild/2003">
  <PropertyGroup>
    <OutputType>Library</OutputType>
    <AssemblyName>{identity}</AssemblyName>
  </PropertyGroup>
  <ItemGroup>
    <Reference Include="System" />
{refs}  </ItemGroup>
  <!-- {marker} -->
</Project>
"#
    )
}

/// Descriptor file name an invocation was made with
pub fn descriptor_file(identity: &str) -> String {
    format!("{identity}.csproj")
}

/// Stand-in compiler driven by markers in the descriptor
pub const FAKE_COMPILER: &str = r#"#!/bin/sh
echo "$1" >> "$FAKE_CALLS"
if grep -q FAIL "$1"; then
    echo "Build FAILED."
    echo "    2 Error(s)"
    exit 1
fi
if grep -q HANG "$1"; then
    sleep 30
fi
if grep -q STDERR "$1"; then
    echo "Build started..."
    echo "    0 Error(s)" >&2
    exit 0
fi
if grep -q NOISE "$1"; then
    echo "Build started..."
    exit 0
fi
echo "Build succeeded."
echo "    0 Warning(s)"
echo "    0 Error(s)"
"#;

/// Convert captured output to text
pub fn text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
