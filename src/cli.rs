use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::tasks::output::OutputFormat;

/// Top-level CLI entry point.
#[derive(Parser, Debug)]
#[command(
    name = "homestage",
    about = "Compile layered machine profiles into a task graph for an external runner",
    version = crate::commands::version::version()
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Override the repository root directory
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Override the profile document (default: `config` from homestage.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Preview changes without applying
    #[arg(short = 'd', long, global = true)]
    pub dry_run: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the profiles nothing else depends on
    List,
    /// Compile and run the task graph for a profile, then relink `current/`
    #[command(name = "do")]
    Do(DoOpts),
    /// Print the compiled task document
    Compile(CompileOpts),
    /// Load, validate and compile the configuration, reporting warnings
    Check,
    /// Print version information
    Version,
    /// Generate shell completions
    Completions(CompletionsOpts),
}

impl Command {
    /// Name of the subcommand, used to name its log file.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Do(_) => "do",
            Self::Compile(_) => "compile",
            Self::Check => "check",
            Self::Version => "version",
            Self::Completions(_) => "completions",
        }
    }
}

/// Options for the `do` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct DoOpts {
    /// Profile whose task the runner executes
    pub profile: String,
}

/// Options for the `compile` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct CompileOpts {
    /// Output format (json, yaml, toml)
    #[arg(short, long, default_value = "yaml")]
    pub format: OutputFormat,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Options for the `completions` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct CompletionsOpts {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_list() {
        let cli = Cli::parse_from(["homestage", "list"]);
        assert!(matches!(cli.command, Command::List));
        assert_eq!(cli.command.name(), "list");
    }

    #[test]
    fn parse_do_with_profile() {
        let cli = Cli::parse_from(["homestage", "do", "desktop"]);
        assert!(
            matches!(&cli.command, Command::Do(_)),
            "Expected Do command"
        );
        if let Command::Do(opts) = cli.command {
            assert_eq!(opts.profile, "desktop");
        }
    }

    #[test]
    fn parse_do_requires_profile() {
        assert!(Cli::try_parse_from(["homestage", "do"]).is_err());
    }

    #[test]
    fn parse_do_dry_run_short() {
        let cli = Cli::parse_from(["homestage", "-d", "do", "base"]);
        assert!(cli.global.dry_run);
    }

    #[test]
    fn parse_compile_defaults_to_yaml() {
        let cli = Cli::parse_from(["homestage", "compile"]);
        assert!(
            matches!(&cli.command, Command::Compile(_)),
            "Expected Compile command"
        );
        if let Command::Compile(opts) = cli.command {
            assert_eq!(opts.format, OutputFormat::Yaml);
            assert!(opts.output.is_none());
        }
    }

    #[test]
    fn parse_compile_format_and_output() {
        let cli = Cli::parse_from([
            "homestage",
            "compile",
            "--format",
            "JSON",
            "--output",
            "out.json",
        ]);
        assert!(
            matches!(&cli.command, Command::Compile(_)),
            "Expected Compile command"
        );
        if let Command::Compile(opts) = cli.command {
            assert_eq!(opts.format, OutputFormat::Json);
            assert_eq!(opts.output, Some(PathBuf::from("out.json")));
        }
    }

    #[test]
    fn parse_compile_rejects_unknown_format() {
        let err = Cli::try_parse_from(["homestage", "compile", "--format", "xml"]).unwrap_err();
        assert!(err.to_string().contains("xml"));
    }

    #[test]
    fn parse_check() {
        let cli = Cli::parse_from(["homestage", "check"]);
        assert!(matches!(cli.command, Command::Check));
    }

    #[test]
    fn parse_version() {
        let cli = Cli::parse_from(["homestage", "version"]);
        assert!(matches!(cli.command, Command::Version));
    }

    #[test]
    fn parse_completions() {
        let cli = Cli::parse_from(["homestage", "completions", "bash"]);
        assert!(matches!(cli.command, Command::Completions(_)));
    }

    #[test]
    fn parse_verbose() {
        let cli = Cli::parse_from(["homestage", "-v", "list"]);
        assert!(cli.verbose);
    }

    #[test]
    fn parse_root_and_config_override() {
        let cli = Cli::parse_from([
            "homestage",
            "--root",
            "/tmp/home",
            "--config",
            "other.yml",
            "list",
        ]);
        assert_eq!(cli.global.root, Some(PathBuf::from("/tmp/home")));
        assert_eq!(cli.global.config, Some(PathBuf::from("other.yml")));
    }

    #[test]
    fn version_flag_matches_version_command() {
        let cmd = Cli::command();
        assert_eq!(cmd.get_version(), Some(crate::commands::version::version()));

        let err = Cli::try_parse_from(["homestage", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
        assert_eq!(
            err.to_string().trim_end(),
            format!("homestage {}", crate::commands::version::version())
        );
    }

    #[test]
    fn missing_command_is_an_error() {
        assert!(Cli::try_parse_from(["homestage"]).is_err());
    }
}
