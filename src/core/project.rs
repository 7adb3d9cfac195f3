//! Project metadata
//!
//! The data the loader hands to the scheduler: an identity plus the names
//! the project references.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::LoaderError;

/// Metadata for a single project descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectMetadata {
    /// Build artifact name, unique within a session
    pub identity: String,
    /// Referenced names, in declaration order, without duplicates
    pub dependencies: Vec<String>,
    /// Path of the descriptor file handed to the compiler
    pub descriptor: PathBuf,
    /// Expected location of the built artifact
    pub output: Option<PathBuf>,
}

impl ProjectMetadata {
    /// Create metadata with no descriptor on disk
    pub fn new(identity: impl Into<String>, dependencies: &[&str]) -> Self {
        let identity = identity.into();
        let mut metadata = Self {
            descriptor: PathBuf::from(format!("{identity}.csproj")),
            identity,
            dependencies: Vec::new(),
            output: None,
        };
        for dep in dependencies {
            metadata.add_dependency(dep);
        }
        metadata
    }

    /// Set the descriptor path
    #[must_use]
    pub fn with_descriptor(mut self, descriptor: impl Into<PathBuf>) -> Self {
        self.descriptor = descriptor.into();
        self
    }

    /// Set the output artifact path
    #[must_use]
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    /// Record a dependency, ignoring repeats
    pub fn add_dependency(&mut self, name: &str) {
        if !self.dependencies.iter().any(|d| d == name) {
            self.dependencies.push(name.to_string());
        }
    }

    /// Directory containing the descriptor
    pub fn descriptor_dir(&self) -> &Path {
        match self.descriptor.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        }
    }
}

/// Reject a project list in which two entries share an identity
pub fn ensure_unique_identities(projects: &[ProjectMetadata]) -> Result<(), LoaderError> {
    let mut seen: HashMap<&str, &Path> = HashMap::with_capacity(projects.len());
    for project in projects {
        if let Some(first) = seen.insert(&project.identity, &project.descriptor) {
            return Err(LoaderError::DuplicateIdentity {
                identity: project.identity.clone(),
                first: first.to_path_buf(),
                second: project.descriptor.clone(),
            });
        }
    }
    Ok(())
}
