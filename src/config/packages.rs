//! Package entries: an installable unit plus its shell commands, links and templates.
use indexmap::IndexMap;
use serde::Deserialize;
use serde_yaml::Value;

use crate::error::ConfigError;

/// A literal shell command line run when configuring a package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub line: String,
}

/// A file linked from `profiles/<profile>/<package>/<path>` to `<path>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub path: String,
}

/// A file rendered from `profiles/<profile>/<package>/<path>` to `<path>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub path: String,
}

/// A package as seen by the compiler. All sequences keep declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Package {
    pub name: String,
    pub commands: Vec<Command>,
    pub links: Vec<Link>,
    pub templates: Vec<Template>,
}

impl Package {
    /// A package with nothing to configure, only to install.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// The two accepted shapes of a package entry, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageEntry {
    /// `- vim`
    Simple(String),
    /// `- [vim, { commands: [...] }]` or `- vim: { commands: [...] }`
    Detailed {
        name: String,
        commands: Vec<String>,
        links: Vec<String>,
        templates: Vec<String>,
    },
}

impl From<PackageEntry> for Package {
    fn from(entry: PackageEntry) -> Self {
        match entry {
            PackageEntry::Simple(name) => Self::named(name),
            PackageEntry::Detailed {
                name,
                commands,
                links,
                templates,
            } => Self {
                name,
                commands: commands.into_iter().map(|line| Command { line }).collect(),
                links: links.into_iter().map(|path| Link { path }).collect(),
                templates: templates.into_iter().map(|path| Template { path }).collect(),
            },
        }
    }
}

/// Raw YAML shape of an entry, matched without interpreting the options.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawEntry {
    Simple(String),
    Pair(String, Value),
    Keyed(IndexMap<String, Value>),
}

/// Options of a detailed entry.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct PackageOptions {
    commands: Vec<String>,
    links: Vec<String>,
    templates: Vec<String>,
}

const SHAPE_HINT: &str = "expected a package name, a [name, options] pair or a single-key {name: options} mapping";

impl PackageEntry {
    /// Classify one YAML package entry. `path` names the entry in errors.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MalformedEntity`] when the entry has neither
    /// accepted shape or its options are invalid.
    pub fn parse(value: &Value, path: &str) -> Result<Self, ConfigError> {
        let raw: RawEntry = serde_yaml::from_value(value.clone())
            .map_err(|_| ConfigError::malformed(path, SHAPE_HINT))?;

        let (name, options) = match raw {
            RawEntry::Simple(name) if !name.trim().is_empty() => return Ok(Self::Simple(name)),
            RawEntry::Simple(name) => (name, Value::Null),
            RawEntry::Pair(name, options) => (name, options),
            RawEntry::Keyed(map) => {
                if map.len() != 1 {
                    return Err(ConfigError::malformed(path, SHAPE_HINT));
                }
                map.into_iter()
                    .next()
                    .ok_or_else(|| ConfigError::malformed(path, SHAPE_HINT))?
            }
        };

        if name.trim().is_empty() {
            return Err(ConfigError::malformed(path, "package name is empty"));
        }

        let options = if options.is_null() {
            PackageOptions::default()
        } else {
            serde_yaml::from_value::<PackageOptions>(options)
                .map_err(|e| ConfigError::malformed(format!("{path}.{name}"), e.to_string()))?
        };

        Ok(Self::Detailed {
            name,
            commands: options.commands,
            links: options.links,
            templates: options.templates,
        })
    }
}

/// Parse a profile's `packages` sequence into normalized packages.
///
/// # Errors
///
/// Returns the first entry that fails [`PackageEntry::parse`].
pub fn parse(entries: &[Value], profile: &str) -> Result<Vec<Package>, ConfigError> {
    entries
        .iter()
        .enumerate()
        .map(|(i, value)| {
            PackageEntry::parse(value, &format!("profiles.{profile}.packages[{i}]"))
                .map(Package::from)
        })
        .collect()
}
