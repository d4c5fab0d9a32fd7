//! Domain-specific error types for the profile compiler.
//!
//! Library modules return typed errors ([`ConfigError`], [`OutputError`])
//! while command handlers at the CLI boundary convert them to
//! [`anyhow::Error`] via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! HomestageError
//! ├── Config(ConfigError)  — document parsing, entity shape, profile graph
//! └── Output(OutputError)  — output format selection and rendering
//! ```

use thiserror::Error;

/// Top-level error type for the profile compiler.
#[derive(Error, Debug)]
pub enum HomestageError {
    /// The input document or the profile graph it describes is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The compiled document could not be rendered.
    #[error("Output error: {0}")]
    Output(#[from] OutputError),
}

/// Errors that arise while building or validating a [`Config`](crate::config::Config).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The document is structurally incomplete (e.g. no `profiles` mapping).
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// A specific entity does not have an accepted shape.
    #[error("Malformed entry at {path}: {message}")]
    MalformedEntity {
        /// Dotted path to the offending entry, e.g. `profiles.dev.packages[1]`.
        path: String,
        /// What is wrong with it.
        message: String,
    },

    /// A profile depends on a profile that is not defined.
    #[error("Profile '{profile}' depends on unknown profile '{dependency}'")]
    UnknownReference {
        /// Profile declaring the dependency.
        profile: String,
        /// The name that did not resolve.
        dependency: String,
    },

    /// The same profile name is declared twice.
    #[error("Duplicate profile '{0}'")]
    DuplicateProfile(String),

    /// A profile uses a name the compiler reserves for its own tasks.
    #[error("Profile name '{0}' is reserved")]
    ReservedProfileName(String),

    /// A package-derived task name equals a profile name or a fixed task.
    #[error("Task '{task}' derived from a package of profile '{profile}' collides with a profile or fixed task")]
    TaskNameCollision {
        /// Profile owning the package.
        profile: String,
        /// The derived task name.
        task: String,
    },

    /// The profile dependency graph contains a cycle.
    #[error("Cyclic profile dependency: {0}")]
    CyclicDependency(String),

    /// A profile was requested by name but is not defined.
    #[error("Unknown profile '{0}'")]
    UnknownProfile(String),

    /// The document is not valid YAML.
    #[error("Invalid YAML in {file}: {message}")]
    Syntax {
        /// File (or `<string>`) being parsed.
        file: String,
        /// Parser message.
        message: String,
    },

    /// An I/O error occurred while reading a config file.
    #[error("IO error reading config file {path}: {source}")]
    Io {
        /// Path to the file that could not be read.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

impl ConfigError {
    /// Shorthand for [`ConfigError::MalformedEntity`].
    pub fn malformed(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedEntity {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Errors that arise when rendering the compiled document.
#[derive(Error, Debug)]
pub enum OutputError {
    /// The requested format is not one of the recognised formats.
    #[error("Unsupported output format '{0}' (expected one of: json, toml, yaml)")]
    UnsupportedFormat(String),

    /// The format is recognised but rendering it is not built yet.
    #[error("Output format '{0}' is not implemented yet")]
    NotImplemented(String),

    /// The serializer rejected the document.
    #[error("Failed to serialize document: {0}")]
    Serialize(String),
}
