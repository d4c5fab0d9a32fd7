//! Command: compile the task graph, hand it to the runner, relink `current/`.
use anyhow::{Context as _, Result, anyhow};
use std::path::Path;

use super::CommandSetup;
use crate::cli::{DoOpts, GlobalOpts};
use crate::current;
use crate::exec::{Executor, SystemExecutor};
use crate::logging::Logger;
use crate::tasks::output::OutputFormat;

/// Run the `do` command with the system executor.
///
/// # Errors
///
/// Returns an error if the configuration fails to load, the profile is not
/// defined, the runner is missing or fails, or `current/` cannot be relinked.
pub fn run(global: &GlobalOpts, opts: &DoOpts, log: &Logger) -> Result<()> {
    let setup = CommandSetup::init(global, log)?;
    apply(&setup, &opts.profile, global.dry_run, &SystemExecutor, log)
}

/// Execute `profile` through the configured runner.
///
/// The generated document is removed again whether or not the runner
/// succeeds; `current/` is only relinked after a successful run.
///
/// # Errors
///
/// Returns [`ConfigError::UnknownProfile`](crate::error::ConfigError) for an
/// undefined profile, and an error if the runner is not on `PATH`, exits
/// non-zero, or the filesystem operations fail.
pub fn apply(
    setup: &CommandSetup,
    profile: &str,
    dry_run: bool,
    executor: &dyn Executor,
    log: &Logger,
) -> Result<()> {
    let used: Vec<&str> = setup
        .config
        .used_profiles_for(profile)?
        .into_iter()
        .map(|p| p.name.as_str())
        .collect();
    log.info(&format!("profiles: {}", used.join(", ")));

    let runner = &setup.settings.runner;
    let runner_path = executor
        .which(runner)
        .ok_or_else(|| anyhow!("task runner '{runner}' not found on PATH"))?;
    log.debug(&format!("runner: {}", runner_path.display()));

    log.stage("Compiling task graph");
    let document = setup
        .config
        .to_document(&setup.settings.install_prefix)
        .render(OutputFormat::Yaml)?;

    let generated = setup.generated_path();
    let args = vec![
        "-task".to_string(),
        profile.to_string(),
        generated.display().to_string(),
        setup.root.display().to_string(),
    ];
    let links = current::plan(&setup.current_dir(), &setup.profiles_dir(), &used);

    if dry_run {
        log.dry_run(&format!("would write {}", generated.display()));
        log.dry_run(&format!("would run {runner} {}", args.join(" ")));
        log.dry_run(&format!(
            "would relink {} ({} profile link(s))",
            setup.current_dir().display(),
            links.len()
        ));
        for link in &links {
            log.dry_run(&format!(
                "  {} -> {}",
                link.target.display(),
                link.source.display()
            ));
        }
        return Ok(());
    }

    std::fs::write(&generated, document)
        .with_context(|| format!("writing {}", generated.display()))?;

    log.stage(&format!("Running {runner}"));
    let result = executor.run_in(&setup.root, runner, &args);
    remove_generated(&generated, log);
    let output = result?;
    for line in output.stdout.lines() {
        log.info(line);
    }

    log.stage("Relinking current profiles");
    current::relink(&setup.current_dir(), &links)?;
    log.info(&format!("linked {} profile(s)", links.len()));
    Ok(())
}

fn remove_generated(path: &Path, log: &Logger) {
    if let Err(e) = std::fs::remove_file(path) {
        log.warn(&format!("could not remove {}: {e}", path.display()));
    }
}
