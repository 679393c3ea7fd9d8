//! Rule selection and dependency gates
//!
//! Candidates matching a request are ranked by how many of their
//! dependencies are already installed, then the winner is checked against
//! a dependency policy. Component generation and feature installation use
//! different policies, see [`DependencyPolicy`].

use crate::error::{Result, StencilError};
use crate::manifest::Installation;
use crate::templates::{Catalog, ComponentCommand, Dependent, InstallationCommand};
use tracing::debug;

/// How many of a rule's dependencies must be installed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyPolicy {
    /// At least one dependency is installed or empty (component generation)
    AnySatisfied,
    /// Every dependency is installed or empty (feature installation)
    AllSatisfied,
}

impl DependencyPolicy {
    /// Check `depends_on` against the installed features
    ///
    /// On failure returns the dependencies to suggest: the whole list for
    /// `AnySatisfied`, only the unsatisfied ones for `AllSatisfied`.
    ///
    /// `AnySatisfied` needs at least one entry that is empty or installed, so
    /// an empty list fails it. `AllSatisfied` matches every entry against the
    /// installed names and unique keys only; an empty list has nothing
    /// missing.
    pub fn check(
        self,
        depends_on: &[String],
        installed: &[Installation],
    ) -> std::result::Result<(), Vec<String>> {
        let installed_match = |dep: &str| installed.iter().any(|i| i.satisfies(dep));

        match self {
            DependencyPolicy::AnySatisfied => {
                if depends_on.iter().any(|d| d.is_empty() || installed_match(d)) {
                    Ok(())
                } else {
                    Err(depends_on.to_vec())
                }
            }
            DependencyPolicy::AllSatisfied => {
                let missing: Vec<String> = depends_on
                    .iter()
                    .filter(|d| !installed_match(d))
                    .cloned()
                    .collect();
                if missing.is_empty() {
                    Ok(())
                } else {
                    Err(missing)
                }
            }
        }
    }
}

/// Number of `(dependency, installation)` pairs that match by name or unique
/// key; one dependency can count several times
pub fn match_score(depends_on: &[String], installed: &[Installation]) -> usize {
    depends_on
        .iter()
        .map(|dep| installed.iter().filter(|i| i.satisfies(dep)).count())
        .sum()
}

/// Order candidates by descending score; ties keep catalog order
pub fn rank<'a, T: Dependent>(candidates: Vec<&'a T>, installed: &[Installation]) -> Vec<&'a T> {
    let mut scored: Vec<(usize, &T)> = candidates
        .into_iter()
        .map(|c| (match_score(c.depends_on(), installed), c))
        .collect();
    // sort_by is stable
    scored.sort_by(|(a, _), (b, _)| b.cmp(a));
    scored.into_iter().map(|(_, c)| c).collect()
}

/// Picks the rule to execute for a request
pub struct Resolver<'a> {
    catalog: &'a Catalog,
    installed: &'a [Installation],
}

impl<'a> Resolver<'a> {
    pub fn new(catalog: &'a Catalog, installed: &'a [Installation]) -> Self {
        Self { catalog, installed }
    }

    /// Best component rule for `kind`, gated by [`DependencyPolicy::AnySatisfied`]
    pub fn select_component(&self, kind: &str) -> Result<&'a ComponentCommand> {
        let selected = self.best(self.catalog.component_commands_for(kind), kind)?;
        self.gate(selected, kind, DependencyPolicy::AnySatisfied)?;
        Ok(selected)
    }

    /// Best installation rule named `name`, without the dependency gate
    ///
    /// Installation checks its unique key before dependencies, so the gate
    /// is applied separately with [`Resolver::gate`].
    pub fn select_installation(&self, name: &str) -> Result<&'a InstallationCommand> {
        self.best(self.catalog.installation_commands_for(name), name)
    }

    /// Apply `policy` to a selected rule
    pub fn gate<T: Dependent>(
        &self,
        rule: &T,
        label: &str,
        policy: DependencyPolicy,
    ) -> Result<()> {
        policy
            .check(rule.depends_on(), self.installed)
            .map_err(|missing| StencilError::DependenciesMissing {
                command: label.to_string(),
                missing,
            })
    }

    fn best<T: Dependent>(&self, candidates: Vec<&'a T>, label: &str) -> Result<&'a T> {
        if candidates.is_empty() {
            return Err(StencilError::RuleNotFound {
                rule: label.to_string(),
            });
        }
        let total = candidates.len();
        let ranked = rank(candidates, self.installed);
        debug!(rule = label, candidates = total, "ranked candidate rules");
        ranked.into_iter().next().ok_or_else(|| StencilError::RuleNotFound {
            rule: label.to_string(),
        })
    }
}
