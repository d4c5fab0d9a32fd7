//! Tool settings from the optional `homestage.toml` at the repository root.
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// File name of the settings file, relative to the root.
pub const SETTINGS_FILE: &str = "homestage.toml";

/// Where things live and which external tools to call.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Input document, relative to the root.
    pub config: PathBuf,
    /// Directory holding `<profile>/<package>/<path>` sources.
    pub profiles_dir: PathBuf,
    /// Directory relinked to the used profiles after `do`.
    pub current_dir: PathBuf,
    /// External task runner binary.
    pub runner: String,
    /// Where `do` writes the generated document, relative to the root.
    pub generated: PathBuf,
    /// Command prefix of the `install` macro.
    pub install_prefix: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            config: PathBuf::from("profiles.yml"),
            profiles_dir: PathBuf::from("profiles"),
            current_dir: PathBuf::from("current"),
            runner: "homemaker".to_string(),
            generated: PathBuf::from("tmp_homemaker_generated.yml"),
            install_prefix: ["sudo", "apt", "install", "-yqq"]
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

impl Settings {
    /// Load `homestage.toml` from `root`; a missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(SETTINGS_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML settings: {}", path.display()))
    }
}
