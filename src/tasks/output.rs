//! Output document consumed by the external task runner.
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use super::TaskMap;
use crate::error::OutputError;

/// Name of the macro package install tasks invoke as `@install`.
pub const INSTALL_MACRO_NAME: &str = "install";

/// Serialization format of the output document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    /// Recognised, but rendering it is not implemented.
    Toml,
    Yaml,
}

impl FromStr for OutputFormat {
    type Err = OutputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "toml" => Ok(Self::Toml),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(OutputError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Json => "json",
            Self::Toml => "toml",
            Self::Yaml => "yaml",
        })
    }
}

/// A runner macro: a command prefix prepended to the macro's arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Macro {
    pub prefix: Vec<String>,
}

/// The full output document: compiled tasks plus macro definitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    pub tasks: TaskMap,
    pub macros: IndexMap<String, Macro>,
}

impl Document {
    #[must_use]
    pub fn new(tasks: TaskMap, install_prefix: &[String]) -> Self {
        let mut macros = IndexMap::new();
        macros.insert(
            INSTALL_MACRO_NAME.to_string(),
            Macro {
                prefix: install_prefix.to_vec(),
            },
        );
        Self { tasks, macros }
    }

    /// Serialize the document.
    ///
    /// # Errors
    ///
    /// Returns [`OutputError::NotImplemented`] for [`OutputFormat::Toml`], or
    /// [`OutputError::Serialize`] if the serializer fails.
    pub fn render(&self, format: OutputFormat) -> Result<String, OutputError> {
        match format {
            OutputFormat::Json => serde_json::to_string_pretty(self)
                .map_err(|e| OutputError::Serialize(e.to_string())),
            OutputFormat::Yaml => {
                serde_yaml::to_string(self).map_err(|e| OutputError::Serialize(e.to_string()))
            }
            // Task runner's TOML schema wants per-task tables; not produced yet.
            OutputFormat::Toml => Err(OutputError::NotImplemented(format.to_string())),
        }
    }
}

/// Parse `format` and render `document` with it.
///
/// # Errors
///
/// Returns [`OutputError::UnsupportedFormat`] for an unknown format name,
/// and otherwise any error of [`Document::render`].
pub fn render_as(document: &Document, format: &str) -> Result<String, OutputError> {
    document.render(format.parse()?)
}
