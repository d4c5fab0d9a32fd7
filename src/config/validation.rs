//! Non-fatal configuration checks reported by `homestage check`.
//!
//! Hard errors (cycles, unknown references, bad shapes) never reach this
//! module: a [`Config`] that exists has already passed them. These checks
//! look at the filesystem and at conventions the compiler cannot enforce.
use std::path::Path;

use super::{Config, Settings};
use crate::tasks::BOOTSTRAP_TASK;

/// A validation warning detected after loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// The configuration source (e.g. `profiles.dev.packages.vim`).
    pub source: String,
    /// The specific item that triggered the warning.
    pub item: String,
    /// Human-readable warning message.
    pub message: String,
}

impl ValidationWarning {
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        item: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            item: item.into(),
            message: message.into(),
        }
    }
}

/// Trait for configuration validators.
pub trait ConfigValidator {
    /// Validate the configuration and return any warnings found.
    fn validate(&self, root: &Path, settings: &Settings) -> Vec<ValidationWarning>;

    /// Return a human-readable name for this validator.
    fn name(&self) -> &'static str;
}

/// Checks that every link and template source exists under the profiles directory.
#[derive(Debug)]
pub struct SourceValidator<'a> {
    config: &'a Config,
}

impl<'a> SourceValidator<'a> {
    #[must_use]
    pub const fn new(config: &'a Config) -> Self {
        Self { config }
    }
}

impl ConfigValidator for SourceValidator<'_> {
    fn validate(&self, root: &Path, settings: &Settings) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();
        let profiles_dir = root.join(&settings.profiles_dir);

        for profile in self.config.profiles() {
            for package in &profile.packages {
                let source = format!("profiles.{}.packages.{}", profile.name, package.name);
                let package_dir = profiles_dir.join(&profile.name).join(&package.name);

                let paths = package
                    .links
                    .iter()
                    .map(|l| ("link", &l.path))
                    .chain(package.templates.iter().map(|t| ("template", &t.path)));

                for (kind, path) in paths {
                    if Path::new(path).is_absolute() || path.starts_with('/') {
                        warnings.push(ValidationWarning::new(
                            &source,
                            path,
                            format!("{kind} path should be relative"),
                        ));
                        continue;
                    }

                    let full = package_dir.join(path);
                    if !full.exists() {
                        warnings.push(ValidationWarning::new(
                            &source,
                            path,
                            format!("{kind} source does not exist: {}", full.display()),
                        ));
                    }
                }
            }
        }

        warnings
    }

    fn name(&self) -> &'static str {
        "sources"
    }
}

/// Checks for the profile the `default` task bootstraps from.
#[derive(Debug)]
pub struct BootstrapValidator<'a> {
    config: &'a Config,
}

impl<'a> BootstrapValidator<'a> {
    #[must_use]
    pub const fn new(config: &'a Config) -> Self {
        Self { config }
    }
}

impl ConfigValidator for BootstrapValidator<'_> {
    fn validate(&self, _root: &Path, _settings: &Settings) -> Vec<ValidationWarning> {
        if self.config.profile(BOOTSTRAP_TASK).is_some() {
            return Vec::new();
        }
        vec![ValidationWarning::new(
            "profiles",
            BOOTSTRAP_TASK,
            format!("no '{BOOTSTRAP_TASK}' profile; the 'default' task has nothing to run"),
        )]
    }

    fn name(&self) -> &'static str {
        "bootstrap"
    }
}

/// Checks for profiles that compile to an empty task.
#[derive(Debug)]
pub struct EmptyProfileValidator<'a> {
    config: &'a Config,
}

impl<'a> EmptyProfileValidator<'a> {
    #[must_use]
    pub const fn new(config: &'a Config) -> Self {
        Self { config }
    }
}

impl ConfigValidator for EmptyProfileValidator<'_> {
    fn validate(&self, _root: &Path, _settings: &Settings) -> Vec<ValidationWarning> {
        self.config
            .profiles()
            .iter()
            .filter(|p| p.packages.is_empty() && p.dependencies.is_empty())
            .map(|p| {
                ValidationWarning::new(
                    "profiles",
                    &p.name,
                    "profile has no packages and no dependencies",
                )
            })
            .collect()
    }

    fn name(&self) -> &'static str {
        "empty-profiles"
    }
}

impl Config {
    /// Run every validator and collect their warnings.
    #[must_use]
    pub fn validate(&self, root: &Path, settings: &Settings) -> Vec<ValidationWarning> {
        let validators: [&dyn ConfigValidator; 3] = [
            &SourceValidator::new(self),
            &BootstrapValidator::new(self),
            &EmptyProfileValidator::new(self),
        ];

        validators
            .iter()
            .flat_map(|v| {
                let warnings = v.validate(root, settings);
                tracing::debug!("validator {}: {} warning(s)", v.name(), warnings.len());
                warnings
            })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::config::test_helpers::config;

    const DOC: &str = "profiles:\n  common:\n    packages:\n      - [git, { links: [.gitignore], templates: [.gitconfig] }]\n";

    #[test]
    fn missing_sources_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(DOC);
        let warnings = SourceValidator::new(&cfg).validate(dir.path(), &Settings::default());
        assert_eq!(warnings.len(), 2);
        assert_eq!(warnings[0].source, "profiles.common.packages.git");
        assert_eq!(warnings[0].item, ".gitignore");
        assert!(warnings[1].message.starts_with("template source does not exist"));
    }

    #[test]
    fn present_sources_are_not_reported() {
        let dir = tempfile::tempdir().unwrap();
        let pkg = dir.path().join("profiles/common/git");
        std::fs::create_dir_all(&pkg).unwrap();
        std::fs::write(pkg.join(".gitignore"), "").unwrap();
        std::fs::write(pkg.join(".gitconfig"), "").unwrap();
        let cfg = config(DOC);
        assert!(cfg.validate(dir.path(), &Settings::default()).is_empty());
    }

    #[test]
    fn absolute_link_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config("profiles:\n  common:\n    packages:\n      - [x, { links: [/etc/passwd] }]\n");
        let warnings = SourceValidator::new(&cfg).validate(dir.path(), &Settings::default());
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].message, "link path should be relative");
    }

    #[test]
    fn missing_bootstrap_profile_is_reported() {
        let cfg = config("profiles:\n  base:\n    packages: [git]\n");
        let warnings = BootstrapValidator::new(&cfg).validate(Path::new("."), &Settings::default());
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].item, "common");
    }

    #[test]
    fn empty_profile_is_reported() {
        let cfg = config("profiles:\n  common:\n    packages: [git]\n  hollow:\n");
        let warnings =
            EmptyProfileValidator::new(&cfg).validate(Path::new("."), &Settings::default());
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].item, "hollow");
    }
}
