//! The `current/` directory: one symlink per profile used by the last `do`.
use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};

/// A planned `current/<name> -> <profiles_dir>/<name>` link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileLink {
    /// Profile directory the link points to.
    pub source: PathBuf,
    /// Link path inside the current directory.
    pub target: PathBuf,
}

/// Links for every profile in `profiles` that has a directory under `profiles_dir`.
#[must_use]
pub fn plan(current_dir: &Path, profiles_dir: &Path, profiles: &[&str]) -> Vec<ProfileLink> {
    profiles
        .iter()
        .map(|name| ProfileLink {
            source: profiles_dir.join(name),
            target: current_dir.join(name),
        })
        .filter(|link| link.source.is_dir())
        .collect()
}

/// Empty `current_dir` (creating it if needed), then create `links`.
///
/// # Errors
///
/// Returns an error if an existing entry cannot be removed or a link cannot
/// be created.
pub fn relink(current_dir: &Path, links: &[ProfileLink]) -> Result<()> {
    std::fs::create_dir_all(current_dir)
        .with_context(|| format!("creating {}", current_dir.display()))?;

    let entries = std::fs::read_dir(current_dir)
        .with_context(|| format!("reading {}", current_dir.display()))?;
    for entry in entries {
        let path = entry
            .with_context(|| format!("reading {}", current_dir.display()))?
            .path();
        remove_entry(&path).with_context(|| format!("removing {}", path.display()))?;
    }

    for link in links {
        create_symlink(&link.source, &link.target)?;
    }
    Ok(())
}

/// Remove a file, symlink or directory tree without following symlinks.
fn remove_entry(path: &Path) -> std::io::Result<()> {
    let meta = std::fs::symlink_metadata(path)?;
    if meta.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        match std::fs::remove_file(path) {
            // Windows directory symlinks are removed as directories.
            #[cfg(windows)]
            Err(_) => std::fs::remove_dir(path),
            other => other,
        }
    }
}

fn create_symlink(source: &Path, target: &Path) -> Result<()> {
    #[cfg(unix)]
    let result = std::os::unix::fs::symlink(source, target);

    #[cfg(windows)]
    let result = std::os::windows::fs::symlink_dir(source, target);

    result.with_context(|| {
        format!(
            "creating symlink {} -> {}",
            target.display(),
            source.display()
        )
    })
}
