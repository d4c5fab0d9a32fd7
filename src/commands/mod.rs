pub mod apply;
pub mod check;
pub mod compile;
pub mod completions;
pub mod list;
pub mod version;

use anyhow::{Context as _, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::cli::GlobalOpts;
use crate::config::{Config, Settings};
use crate::logging::Logger;

/// Environment variable naming the repository root when `--root` is absent.
pub const ROOT_ENV: &str = "HOMESTAGE_ROOT";

/// Shared state produced by the common command setup sequence.
///
/// Encapsulates root resolution, settings and profile document loading so
/// that each command does not have to repeat the boilerplate.
#[derive(Debug)]
pub struct CommandSetup {
    /// Resolved repository root.
    pub root: PathBuf,
    /// Settings from `homestage.toml`, or the defaults.
    pub settings: Settings,
    /// The validated profile document.
    pub config: Config,
}

impl CommandSetup {
    /// Resolve the root, then load settings and the profile document.
    ///
    /// # Errors
    ///
    /// Returns an error if the root does not exist, the settings file is
    /// invalid, or the profile document fails to load.
    pub fn init(global: &GlobalOpts, log: &Logger) -> Result<Self> {
        let root = resolve_root(global)?;
        Self::load(root, global.config.as_deref(), log)
    }

    /// Load settings and the profile document from an already resolved root.
    ///
    /// `config_override` replaces the settings' `config` path; relative
    /// paths are taken from the current directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings file is invalid or the profile
    /// document fails to load.
    pub fn load(root: PathBuf, config_override: Option<&Path>, log: &Logger) -> Result<Self> {
        log.debug(&format!("root: {}", root.display()));
        let settings = Settings::load(&root)?;

        let path = config_override.map_or_else(|| root.join(&settings.config), Path::to_path_buf);

        log.stage("Loading configuration");
        let config = Config::load(&path)?;
        log.debug(&format!("{} variables", config.variables().len()));
        log.debug(&format!("{} profiles", config.profiles().len()));
        log.info(&format!(
            "loaded {} profiles from {}",
            config.profiles().len(),
            path.display()
        ));

        Ok(Self {
            root,
            settings,
            config,
        })
    }

    /// Directory holding `<profile>/<package>/<path>` sources.
    #[must_use]
    pub fn profiles_dir(&self) -> PathBuf {
        self.root.join(&self.settings.profiles_dir)
    }

    /// Directory relinked after `do`.
    #[must_use]
    pub fn current_dir(&self) -> PathBuf {
        self.root.join(&self.settings.current_dir)
    }

    /// Where `do` writes the generated document.
    #[must_use]
    pub fn generated_path(&self) -> PathBuf {
        self.root.join(&self.settings.generated)
    }
}

/// Resolve the repository root: `--root`, then `$HOMESTAGE_ROOT`, then the
/// current directory.
///
/// # Errors
///
/// Returns an error if the chosen directory does not exist.
pub fn resolve_root(global: &GlobalOpts) -> Result<PathBuf> {
    let cwd = std::env::current_dir().context("cannot determine current directory")?;
    let root = choose_root(global.root.as_deref(), std::env::var_os(ROOT_ENV), cwd);
    dunce::canonicalize(&root).with_context(|| {
        format!(
            "cannot resolve root directory {}. Use --root or set {ROOT_ENV}",
            root.display()
        )
    })
}

fn choose_root(flag: Option<&Path>, env: Option<OsString>, cwd: PathBuf) -> PathBuf {
    flag.map(Path::to_path_buf)
        .or_else(|| env.filter(|v| !v.is_empty()).map(PathBuf::from))
        .unwrap_or(cwd)
}
