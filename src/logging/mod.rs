//! Logging infrastructure for structured console and file output.

mod logger;
mod subscriber;
mod utils;

pub use logger::Logger;
pub use subscriber::init_subscriber;

/// Target of stage header events.
pub const STAGE_TARGET: &str = "homestage::stage";

/// Target of dry-run action events.
pub const DRY_RUN_TARGET: &str = "homestage::dry_run";
