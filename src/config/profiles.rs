//! Profile definitions: named bundles of packages, roles and profile dependencies.
use serde::Deserialize;
use serde_yaml::Value;

use super::packages::{self, Package};
use crate::error::ConfigError;

/// A reference, by name, to another profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    pub name: String,
}

/// Capability tag attached to a profile. Carried through, not compiled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub name: String,
}

/// A parsed profile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    pub name: String,
    pub dependencies: Vec<Dependency>,
    pub packages: Vec<Package>,
    pub roles: Vec<Role>,
}

impl Profile {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builder-style helper used by programmatic construction and tests.
    #[must_use]
    pub fn depends_on(mut self, names: &[&str]) -> Self {
        self.dependencies.extend(names.iter().map(|n| Dependency {
            name: (*n).to_string(),
        }));
        self
    }

    /// Builder-style helper used by programmatic construction and tests.
    #[must_use]
    pub fn with_package(mut self, package: Package) -> Self {
        self.packages.push(package);
        self
    }
}

/// Raw profile body. Absent keys are empty collections.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ProfileBody {
    dependencies: Vec<String>,
    packages: Vec<Value>,
    roles: Vec<String>,
}

/// Parse one `profiles.<name>` body. A `null` body is an empty profile.
///
/// # Errors
///
/// Returns [`ConfigError::MalformedEntity`] when the body is not a mapping of
/// the expected sequences, or when a package entry is malformed.
pub fn parse(name: &str, body: &Value) -> Result<Profile, ConfigError> {
    let body: ProfileBody = if body.is_null() {
        ProfileBody::default()
    } else {
        serde_yaml::from_value(body.clone())
            .map_err(|e| ConfigError::malformed(format!("profiles.{name}"), e.to_string()))?
    };

    Ok(Profile {
        name: name.to_string(),
        dependencies: body
            .dependencies
            .into_iter()
            .map(|name| Dependency { name })
            .collect(),
        packages: packages::parse(&body.packages, name)?,
        roles: body.roles.into_iter().map(|name| Role { name }).collect(),
    })
}
