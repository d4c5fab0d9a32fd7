//! Command: load, validate and compile, reporting non-fatal warnings.
use anyhow::{Result, bail};

use super::CommandSetup;
use crate::cli::GlobalOpts;
use crate::config::validation::ValidationWarning;
use crate::logging::Logger;
use crate::tasks::{self, BOOTSTRAP_TASK};

/// Run the check command.
///
/// Hard errors (parse failures, invalid graphs) fail the command; everything
/// else is reported as a warning.
///
/// # Errors
///
/// Returns an error if the configuration fails to load or the compiled task
/// graph contains a cycle.
pub fn run(global: &GlobalOpts, log: &Logger) -> Result<()> {
    let setup = CommandSetup::init(global, log)?;

    log.stage("Checking configuration");
    let warnings = collect(&setup)?;

    if warnings.is_empty() {
        log.info("no problems found");
        return Ok(());
    }

    log.warn(&format!(
        "found {} configuration warning(s):",
        warnings.len()
    ));
    for warning in &warnings {
        log.warn(&format!(
            "  {} [{}]: {}",
            warning.source, warning.item, warning.message
        ));
    }
    Ok(())
}

/// Validation warnings plus unresolved task dependencies of the compiled map.
///
/// # Errors
///
/// Returns an error if the compiled task graph contains a cycle.
pub fn collect(setup: &CommandSetup) -> Result<Vec<ValidationWarning>> {
    let mut warnings = setup.config.validate(&setup.root, &setup.settings);

    let compiled = setup.config.compile();
    if tasks::graph::has_cycle(&compiled) {
        bail!("compiled task graph contains a cycle");
    }

    // The missing bootstrap profile is already reported by its validator.
    warnings.extend(
        tasks::graph::unresolved_deps(&compiled)
            .into_iter()
            .filter(|(_, dep)| *dep != BOOTSTRAP_TASK)
            .map(|(task, dep)| {
                ValidationWarning::new(
                    format!("tasks.{task}"),
                    dep,
                    "dependency names no compiled task",
                )
            }),
    );

    Ok(warnings)
}
