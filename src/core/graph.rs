//! Dependency graph
//!
//! Answers which pending projects can be built given what is already built.
//! References to names outside the session never block a project.

use std::collections::{HashMap, HashSet};

use crate::core::project::ProjectMetadata;

/// Dependency graph for a build session
#[derive(Debug, Default)]
pub struct DependencyGraph {
    /// All session identities, in input order
    nodes: Vec<String>,
    /// Adjacency list: project -> in-session dependencies
    edges: HashMap<String, Vec<String>>,
}

impl DependencyGraph {
    /// Create a new empty dependency graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph from loader output
    ///
    /// Only edges whose target is exactly another session identity are
    /// kept. Everything else is treated as already satisfied.
    pub fn from_projects(projects: &[ProjectMetadata]) -> Self {
        let known: HashSet<&str> = projects.iter().map(|p| p.identity.as_str()).collect();
        let mut graph = Self::new();
        for project in projects {
            let deps = project
                .dependencies
                .iter()
                .filter(|d| known.contains(d.as_str()))
                .cloned()
                .collect();
            graph.add_project(&project.identity, deps);
        }
        graph
    }

    /// Add a project with its in-session dependencies
    pub fn add_project(&mut self, name: &str, dependencies: Vec<String>) {
        if !self.edges.contains_key(name) {
            self.nodes.push(name.to_string());
        }
        self.edges.insert(name.to_string(), dependencies);
    }

    /// All identities in input order
    pub fn identities(&self) -> &[String] {
        &self.nodes
    }

    /// Number of projects in the graph
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no projects
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// In-session dependencies of a project
    pub fn dependencies(&self, name: &str) -> &[String] {
        self.edges.get(name).map_or(&[], Vec::as_slice)
    }

    /// Pending projects whose every in-session dependency is built
    ///
    /// Results follow input order, so the first element is the
    /// deterministic pick. An empty result while `pending` is non-empty
    /// means nothing left can ever be built.
    pub fn ready<'a>(&'a self, pending: &HashSet<String>, built: &HashSet<String>) -> Vec<&'a str> {
        self.nodes
            .iter()
            .filter(|node| pending.contains(*node))
            .filter(|node| self.dependencies(node).iter().all(|d| built.contains(d)))
            .map(String::as_str)
            .collect()
    }
}
