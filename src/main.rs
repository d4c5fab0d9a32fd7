use clap::Parser;
use std::process::ExitCode;

use homestage_cli::{cli, commands, logging};

fn main() -> ExitCode {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();
    logging::init_subscriber(args.verbose, args.command.name());
    let log = logging::Logger::new(args.command.name());

    let result = match &args.command {
        cli::Command::List => commands::list::run(&args.global, &log),
        cli::Command::Do(opts) => commands::apply::run(&args.global, opts, &log),
        cli::Command::Compile(opts) => commands::compile::run(&args.global, opts, &log),
        cli::Command::Check => commands::check::run(&args.global, &log),
        cli::Command::Version => {
            commands::version::run();
            Ok(())
        }
        cli::Command::Completions(opts) => {
            commands::completions::run(opts);
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log.error(&format!("{e:#}"));
            if let Some(path) = log.log_path() {
                log.info(&format!("log: {}", path.display()));
            }
            ExitCode::FAILURE
        }
    }
}
