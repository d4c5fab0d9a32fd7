// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed profile repository and a fluent
// builder so each integration test can set up an isolated environment without
// repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use homestage_cli::commands::CommandSetup;
use homestage_cli::config::Config;
use homestage_cli::logging::Logger;

/// A small but complete profile document: a bootstrap profile, one
/// intermediate profile and one leaf, with variables, commands, links and
/// templates.
pub const SAMPLE_PROFILES: &str = r#"
variables:
  EDITOR: vim
  COLUMNS: 120
profiles:
  common:
    packages:
      - git
  base:
    dependencies: [common]
    packages:
      - [vim, {commands: ["vim +PlugInstall +qa"], links: [.vimrc]}]
  desktop:
    dependencies: [base]
    packages:
      - i3: {templates: [config]}
    roles: [workstation]
"#;

/// An isolated test repository backed by a [`tempfile::TempDir`].
///
/// The directory is automatically deleted when dropped (via the underlying
/// [`tempfile::TempDir`]).
pub struct IntegrationTestContext {
    /// Temporary directory containing the test repository.
    pub root: tempfile::TempDir,
}

impl IntegrationTestContext {
    /// Create a new context with `profiles.yml` set to [`SAMPLE_PROFILES`].
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        std::fs::write(root.path().join("profiles.yml"), SAMPLE_PROFILES)
            .expect("write profiles.yml");
        Self { root }
    }

    /// Path to the repository root.
    pub fn root_path(&self) -> &Path {
        self.root.path()
    }

    /// Path of `relative` inside the repository.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.path().join(relative)
    }

    /// Load settings and the profile document the way commands do.
    pub fn setup(&self) -> CommandSetup {
        CommandSetup::load(self.root.path().to_path_buf(), None, &Logger::new("test"))
            .expect("load command setup")
    }

    /// Load just the profile document.
    pub fn load_config(&self) -> Config {
        Config::load(&self.path("profiles.yml")).expect("load config")
    }
}

/// Fluent builder for [`IntegrationTestContext`].
///
/// Allows individual tests to customise the repository before the context
/// is finalised without modifying the shared setup.
pub struct TestContextBuilder {
    ctx: IntegrationTestContext,
}

impl TestContextBuilder {
    /// Begin building a new context backed by the sample repository.
    pub fn new() -> Self {
        Self {
            ctx: IntegrationTestContext::new(),
        }
    }

    /// Replace `profiles.yml` with `content`.
    pub fn with_profiles(self, content: &str) -> Self {
        std::fs::write(self.ctx.path("profiles.yml"), content).expect("write profiles.yml");
        self
    }

    /// Write `homestage.toml` with `content`.
    pub fn with_settings(self, content: &str) -> Self {
        std::fs::write(self.ctx.path("homestage.toml"), content).expect("write homestage.toml");
        self
    }

    /// Create `profiles/<profile>/<package>/<path>` so that source
    /// validation does not complain about it.
    pub fn with_source(self, profile: &str, package: &str, path: &str) -> Self {
        let full = self
            .ctx
            .path("profiles")
            .join(profile)
            .join(package)
            .join(path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).expect("create source parent");
        }
        std::fs::write(&full, "").expect("write source file");
        self
    }

    /// Create an empty `profiles/<profile>/` directory.
    pub fn with_profile_dir(self, profile: &str) -> Self {
        std::fs::create_dir_all(self.ctx.path("profiles").join(profile))
            .expect("create profile dir");
        self
    }

    /// Finish building and return the configured context.
    pub fn build(self) -> IntegrationTestContext {
        self.ctx
    }
}
