//! Command: print the compiled task document.
use anyhow::{Context as _, Result};

use super::CommandSetup;
use crate::cli::{CompileOpts, GlobalOpts};
use crate::logging::Logger;
use crate::tasks::output::OutputFormat;

/// Run the compile command.
///
/// # Errors
///
/// Returns an error if the configuration fails to load, the format cannot be
/// rendered, or the output file cannot be written.
pub fn run(global: &GlobalOpts, opts: &CompileOpts, log: &Logger) -> Result<()> {
    let setup = CommandSetup::init(global, log)?;

    log.stage("Compiling task graph");
    let rendered = render(&setup, opts.format)?;

    match &opts.output {
        Some(path) if global.dry_run => {
            log.dry_run(&format!(
                "would write {} document to {}",
                opts.format,
                path.display()
            ));
        }
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("writing {}", path.display()))?;
            log.info(&format!("wrote {}", path.display()));
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

/// Render the document for `setup` in `format`.
///
/// # Errors
///
/// Returns an [`OutputError`](crate::error::OutputError) if the format is not
/// implemented or serialization fails.
pub fn render(setup: &CommandSetup, format: OutputFormat) -> Result<String> {
    let document = setup.config.to_document(&setup.settings.install_prefix);
    tracing::debug!("compiled {} tasks", document.tasks.len());
    Ok(document.render(format)?)
}
