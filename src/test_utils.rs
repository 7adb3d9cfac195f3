//! Test utilities for property-based testing
//!
//! This module provides generators and helpers for proptest.

#[cfg(test)]
pub mod generators {
    use proptest::prelude::*;

    use crate::core::project::ProjectMetadata;

    /// Generate a project identity (PascalCase-ish assembly name)
    pub fn identity() -> impl Strategy<Value = String> {
        "[A-Z][a-zA-Z0-9]{0,12}(\\.[A-Z][a-z]{1,6})?"
    }

    /// Generate an acyclic project list
    ///
    /// Project `i` may only reference projects `j < i` plus external
    /// names, then the list is shuffled so input order does not follow
    /// dependency order.
    pub fn acyclic_projects(max: usize) -> impl Strategy<Value = Vec<ProjectMetadata>> {
        (1..=max)
            .prop_flat_map(|n| {
                (
                    prop::collection::vec(prop::collection::vec(any::<prop::sample::Index>(), 0..4), n),
                    prop::collection::vec(any::<bool>(), n),
                    Just(n),
                )
            })
            .prop_map(|(edges, externals, n)| {
                (0..n)
                    .map(|i| {
                        let mut project = ProjectMetadata::new(format!("P{i}"), &[]);
                        if i > 0 {
                            for idx in &edges[i] {
                                project.add_dependency(&format!("P{}", idx.index(i)));
                            }
                        }
                        if externals[i] {
                            project.add_dependency("System.Core");
                        }
                        project
                    })
                    .collect::<Vec<_>>()
            })
            .prop_shuffle()
    }
}

#[cfg(test)]
mod tests {
    use super::generators::*;
    use crate::config::defaults::MIN_PROPTEST_ITERATIONS;
    use proptest::prelude::*;
    use std::collections::HashSet;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(MIN_PROPTEST_ITERATIONS))]

        #[test]
        fn test_identity_generator_produces_valid_names(name in identity()) {
            prop_assert!(!name.is_empty());
            prop_assert!(name.chars().next().unwrap().is_ascii_uppercase());
        }

        #[test]
        fn test_acyclic_projects_have_unique_identities(projects in acyclic_projects(12)) {
            let ids: HashSet<_> = projects.iter().map(|p| p.identity.clone()).collect();
            prop_assert_eq!(ids.len(), projects.len());
        }

        #[test]
        fn test_acyclic_projects_only_reference_lower_indices(projects in acyclic_projects(12)) {
            for project in &projects {
                let own: usize = project.identity[1..].parse().unwrap();
                for dep in project.dependencies.iter().filter(|d| d.starts_with('P')) {
                    let target: usize = dep[1..].parse().unwrap();
                    prop_assert!(target < own);
                }
            }
        }
    }
}
