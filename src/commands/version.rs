//! Command: print version information.

/// The version baked in at build time, or the crate version for dev builds.
#[must_use]
pub fn version() -> &'static str {
    option_env!("HOMESTAGE_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}

/// Print the homestage version to stdout.
pub fn run() {
    println!("homestage {}", version());
}
