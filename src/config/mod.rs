//! Configuration model: parse the profile document, validate it, query it.
//!
//! A [`Config`] can only be obtained through a constructor that runs the
//! graph validation in [`graph::ProfileGraph::build`], so every `Config`
//! value has unique profile names, resolvable dependencies and no cycles.
pub mod graph;
pub mod packages;
pub mod profiles;
pub mod settings;
pub mod validation;
pub mod variables;

use serde_yaml::{Mapping, Value};
use std::path::Path;

use crate::error::ConfigError;
use crate::tasks::output::Document;
use crate::tasks::{self, TaskMap};

pub use graph::ProfileGraph;
pub use packages::{Command, Link, Package, PackageEntry, Template};
pub use profiles::{Dependency, Profile, Role};
pub use settings::Settings;
pub use variables::Variable;

/// The root aggregate: all variables and profiles of one document.
#[derive(Debug, Clone)]
pub struct Config {
    variables: Vec<Variable>,
    profiles: Vec<Profile>,
    graph: ProfileGraph,
}

impl Config {
    /// Build a config from already-parsed entities, validating the profile graph.
    ///
    /// # Errors
    ///
    /// Returns any error of [`ProfileGraph::build`].
    pub fn new(variables: Vec<Variable>, profiles: Vec<Profile>) -> Result<Self, ConfigError> {
        let graph = ProfileGraph::build(&profiles)?;
        Ok(Self {
            variables,
            profiles,
            graph,
        })
    }

    /// Read and parse a YAML profile document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, and otherwise
    /// any error of [`Config::from_yaml_str`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&content, &path.display().to_string())
    }

    /// Parse a YAML profile document held in memory. `source` names it in errors.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Syntax`] for invalid YAML, and otherwise any
    /// error of [`Config::from_value`].
    pub fn from_yaml_str(content: &str, source: &str) -> Result<Self, ConfigError> {
        let document: Value = serde_yaml::from_str(content).map_err(|e| ConfigError::Syntax {
            file: source.to_string(),
            message: e.to_string(),
        })?;
        Self::from_value(&document)
    }

    /// Build a config from a generic document tree.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::InvalidConfig`] when `profiles` is missing, empty or
    ///   not a mapping, or `variables` is not a mapping
    /// - [`ConfigError::MalformedEntity`] for an entity of the wrong shape
    /// - any error of [`ProfileGraph::build`]
    pub fn from_value(document: &Value) -> Result<Self, ConfigError> {
        let profiles = match document.get("profiles") {
            None | Some(Value::Null) => {
                return Err(ConfigError::InvalidConfig("missing profiles".to_string()));
            }
            Some(Value::Mapping(m)) if m.is_empty() => {
                return Err(ConfigError::InvalidConfig(
                    "profiles must not be empty".to_string(),
                ));
            }
            Some(Value::Mapping(m)) => m,
            Some(_) => {
                return Err(ConfigError::InvalidConfig(
                    "profiles must be a mapping of profile name to profile".to_string(),
                ));
            }
        };

        let variables = match document.get("variables") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Mapping(m)) => variables::parse(m)?,
            Some(_) => {
                return Err(ConfigError::InvalidConfig(
                    "variables must be a mapping of name to value".to_string(),
                ));
            }
        };

        let profiles = parse_profiles(profiles)?;
        tracing::debug!(
            "parsed {} variables, {} profiles",
            variables.len(),
            profiles.len()
        );

        Self::new(variables, profiles)
    }

    /// All variables, in declaration order.
    #[must_use]
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// All profiles, in declaration order.
    #[must_use]
    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    /// Look up a profile by name.
    #[must_use]
    pub fn profile(&self, name: &str) -> Option<&Profile> {
        self.graph
            .index_of(name)
            .and_then(|i| self.profiles.get(i))
    }

    /// Names of the profiles nothing depends on, in declaration order.
    #[must_use]
    pub fn leaf_profiles(&self) -> Vec<&str> {
        self.graph.leaf_profiles()
    }

    /// The profile called `name` followed by its transitive dependencies.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownProfile`] if `name` is not defined.
    pub fn used_profiles_for(&self, name: &str) -> Result<Vec<&Profile>, ConfigError> {
        Ok(self
            .graph
            .used_profiles_for(name)?
            .into_iter()
            .filter_map(|used| self.profile(used))
            .collect())
    }

    /// Compile every profile into the flat task mapping.
    #[must_use]
    pub fn compile(&self) -> TaskMap {
        tasks::compile(self)
    }

    /// Compile and wrap the tasks with the `install` macro definition.
    #[must_use]
    pub fn to_document(&self, install_prefix: &[String]) -> Document {
        Document::new(self.compile(), install_prefix)
    }
}

fn parse_profiles(mapping: &Mapping) -> Result<Vec<Profile>, ConfigError> {
    mapping
        .iter()
        .map(|(key, body)| {
            let name = variables::scalar_to_string(key)
                .filter(|name| !name.trim().is_empty())
                .ok_or_else(|| {
                    ConfigError::malformed("profiles", "profile names must be non-empty scalars")
                })?;
            profiles::parse(&name, body)
        })
        .collect()
}
