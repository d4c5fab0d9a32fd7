//! Layered machine-profile compiler.
//!
//! Reads a YAML document of variables and profiles (packages with shell
//! commands, links and templates, plus dependencies on other profiles),
//! validates the profile graph, and compiles it into a flat task graph that
//! an external task runner executes.
//!
//! The public API is organised into four layers:
//!
//! - **[`config`]**: parse the profile document and validate the profile graph
//! - **[`tasks`]**: compile profiles into named, dependency-ordered tasks and render them
//! - **[`exec`]** and **[`current`]**: run the task runner and relink `current/`
//! - **[`commands`]**: top-level subcommand orchestration (`list`, `do`, `compile`, `check`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod current;
pub mod error;
pub mod exec;
pub mod logging;
pub mod tasks;
