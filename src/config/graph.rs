//! Profile dependency graph: name index, validation, leaf and closure queries.
//!
//! Dependencies are stored by name on [`Profile`] and resolved here, once,
//! into an adjacency list over profile indices. Every query works on the
//! indices, so it never depends on the declaration order of the document.

use std::collections::HashMap;

use super::profiles::Profile;
use crate::error::ConfigError;
use crate::tasks::{
    CONFIG_VARIABLES_TASK, DEFAULT_TASK, config_task_name, install_task_name, package_task_name,
};

/// Names the compiler emits as fixed tasks; a profile task would clobber them.
const RESERVED_NAMES: &[&str] = &[DEFAULT_TASK, CONFIG_VARIABLES_TASK];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    Visiting,
    Done,
}

/// Validated, acyclic dependency graph over a config's profiles.
#[derive(Debug, Clone, Default)]
pub struct ProfileGraph {
    names: Vec<String>,
    index: HashMap<String, usize>,
    /// `edges[i]` are the indices of profile `i`'s dependencies, in declared order.
    edges: Vec<Vec<usize>>,
}

impl ProfileGraph {
    /// Index the profiles and validate the graph they form.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::ReservedProfileName`] for a profile named like a fixed task
    /// - [`ConfigError::DuplicateProfile`] when a name is declared twice
    /// - [`ConfigError::TaskNameCollision`] when a package's task would take the
    ///   name of a profile task or a fixed task
    /// - [`ConfigError::UnknownReference`] for a dependency on an undefined profile
    /// - [`ConfigError::CyclicDependency`] when the dependencies form a cycle
    pub fn build(profiles: &[Profile]) -> Result<Self, ConfigError> {
        let mut index = HashMap::with_capacity(profiles.len());
        for (i, profile) in profiles.iter().enumerate() {
            if RESERVED_NAMES.contains(&profile.name.as_str()) {
                return Err(ConfigError::ReservedProfileName(profile.name.clone()));
            }
            if index.insert(profile.name.clone(), i).is_some() {
                return Err(ConfigError::DuplicateProfile(profile.name.clone()));
            }
        }

        // Checked against the full index so declaration order does not matter.
        for profile in profiles {
            for package in &profile.packages {
                let derived = [
                    package_task_name(&profile.name, &package.name),
                    install_task_name(&profile.name, &package.name),
                    config_task_name(&profile.name, &package.name),
                ];
                for task in derived {
                    if index.contains_key(&task) || RESERVED_NAMES.contains(&task.as_str()) {
                        return Err(ConfigError::TaskNameCollision {
                            profile: profile.name.clone(),
                            task,
                        });
                    }
                }
            }
        }

        let edges = profiles
            .iter()
            .map(|profile| {
                profile
                    .dependencies
                    .iter()
                    .map(|dep| {
                        index.get(&dep.name).copied().ok_or_else(|| {
                            ConfigError::UnknownReference {
                                profile: profile.name.clone(),
                                dependency: dep.name.clone(),
                            }
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        let graph = Self {
            names: profiles.iter().map(|p| p.name.clone()).collect(),
            index,
            edges,
        };

        if let Some(cycle) = graph.find_cycle() {
            let path = cycle
                .iter()
                .filter_map(|&i| graph.names.get(i).map(String::as_str))
                .collect::<Vec<_>>()
                .join(" -> ");
            return Err(ConfigError::CyclicDependency(path));
        }

        tracing::debug!(
            "profile graph: {} profiles, {} dependency edges",
            graph.names.len(),
            graph.edges.iter().map(Vec::len).sum::<usize>()
        );
        Ok(graph)
    }

    /// Index of the profile called `name`.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Profiles no other profile depends on, in declaration order.
    #[must_use]
    pub fn leaf_profiles(&self) -> Vec<&str> {
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); self.names.len()];
        for (profile, deps) in self.edges.iter().enumerate() {
            for &dep in deps {
                if let Some(list) = dependents.get_mut(dep) {
                    list.push(profile);
                }
            }
        }

        self.names
            .iter()
            .zip(&dependents)
            .filter(|(_, dependents)| dependents.is_empty())
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Transitive dependency closure of `name`, the profile itself first.
    ///
    /// Depth-first in dependency-declaration order; each profile appears once,
    /// at its first visit.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownProfile`] if `name` is not defined.
    pub fn used_profiles_for(&self, name: &str) -> Result<Vec<&str>, ConfigError> {
        let start = self
            .index_of(name)
            .ok_or_else(|| ConfigError::UnknownProfile(name.to_string()))?;
        Ok(self
            .closure(start)
            .into_iter()
            .filter_map(|i| self.names.get(i).map(String::as_str))
            .collect())
    }

    /// Preorder closure over indices. Terminates on any graph, cyclic or not.
    fn closure(&self, start: usize) -> Vec<usize> {
        let mut seen = vec![false; self.names.len()];
        let mut order = Vec::new();
        let mut stack = vec![start];

        while let Some(node) = stack.pop() {
            match seen.get_mut(node) {
                Some(flag) if !*flag => *flag = true,
                _ => continue,
            }
            order.push(node);
            if let Some(deps) = self.edges.get(node) {
                stack.extend(deps.iter().rev());
            }
        }

        order
    }

    /// Iterative depth-first search with visiting/done markers.
    ///
    /// Returns the first cycle found as a closed path of indices
    /// (first == last).
    fn find_cycle(&self) -> Option<Vec<usize>> {
        let mut marks = vec![Mark::Unvisited; self.names.len()];

        for start in 0..self.names.len() {
            if marks.get(start) != Some(&Mark::Unvisited) {
                continue;
            }

            // (node, position of the next edge to follow)
            let mut stack: Vec<(usize, usize)> = vec![(start, 0)];
            if let Some(mark) = marks.get_mut(start) {
                *mark = Mark::Visiting;
            }

            while let Some(&(node, next)) = stack.last() {
                let Some(dep) = self.edges.get(node).and_then(|deps| deps.get(next)).copied()
                else {
                    if let Some(mark) = marks.get_mut(node) {
                        *mark = Mark::Done;
                    }
                    stack.pop();
                    continue;
                };

                if let Some(top) = stack.last_mut() {
                    top.1 += 1;
                }

                match marks.get(dep) {
                    Some(Mark::Visiting) => {
                        let from = stack.iter().position(|&(n, _)| n == dep).unwrap_or(0);
                        let mut cycle: Vec<usize> =
                            stack.iter().skip(from).map(|&(n, _)| n).collect();
                        cycle.push(dep);
                        return Some(cycle);
                    }
                    Some(Mark::Unvisited) => {
                        if let Some(mark) = marks.get_mut(dep) {
                            *mark = Mark::Visiting;
                        }
                        stack.push((dep, 0));
                    }
                    _ => {}
                }
            }
        }

        None
    }
}
