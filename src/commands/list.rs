//! Command: list the profiles nothing else depends on.
use anyhow::Result;

use super::CommandSetup;
use crate::cli::GlobalOpts;
use crate::config::Config;
use crate::logging::Logger;

/// Run the list command, printing one leaf profile per line.
///
/// # Errors
///
/// Returns an error if the configuration fails to load.
pub fn run(global: &GlobalOpts, log: &Logger) -> Result<()> {
    let setup = CommandSetup::init(global, log)?;
    print!("{}", render(&setup.config));
    Ok(())
}

/// The leaf profiles, newline-terminated, in declaration order.
#[must_use]
pub fn render(config: &Config) -> String {
    config
        .leaf_profiles()
        .iter()
        .map(|name| format!("{name}\n"))
        .collect()
}
