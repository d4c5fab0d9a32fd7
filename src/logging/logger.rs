//! Command-facing logger over [`tracing`].
use std::path::PathBuf;

use super::utils::log_file_path;
use super::{DRY_RUN_TARGET, STAGE_TARGET};

/// Structured logger used by command handlers.
///
/// Messages go through the global `tracing` subscriber installed by
/// [`init_subscriber`](super::subscriber::init_subscriber), which writes them
/// to the console and to `$XDG_CACHE_HOME/homestage/<command>.log`.
#[derive(Debug)]
pub struct Logger {
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Create a logger for `command`; the log file itself is created by the subscriber.
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self {
            log_file: log_file_path(command),
        }
    }

    /// Return the log file path, if available.
    #[must_use]
    pub const fn log_path(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }

    /// Log an error message.
    #[allow(clippy::unused_self)]
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    #[allow(clippy::unused_self)]
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header (major section).
    #[allow(clippy::unused_self)]
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    /// Log an informational message.
    #[allow(clippy::unused_self)]
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message (suppressed on console unless verbose; always
    /// written to the log file).
    #[allow(clippy::unused_self)]
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Log a dry-run action message.
    #[allow(clippy::unused_self)]
    pub fn dry_run(&self, msg: &str) {
        tracing::info!(target: DRY_RUN_TARGET, "{msg}");
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::layer::SubscriberExt as _;

    /// Records `(target, message)` of every event.
    #[derive(Default, Clone)]
    struct Capture(Arc<Mutex<Vec<(String, String)>>>);

    struct Message(String);

    impl tracing::field::Visit for Message {
        fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
            if field.name() == "message" {
                self.0 = format!("{value:?}");
            }
        }
    }

    impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for Capture {
        fn on_event(
            &self,
            event: &tracing::Event<'_>,
            _ctx: tracing_subscriber::layer::Context<'_, S>,
        ) {
            let mut msg = Message(String::new());
            event.record(&mut msg);
            self.0
                .lock()
                .unwrap()
                .push((event.metadata().target().to_string(), msg.0));
        }
    }

    #[test]
    fn stage_and_dry_run_use_dedicated_targets() {
        let capture = Capture::default();
        let subscriber = tracing_subscriber::registry().with(capture.clone());
        let log = Logger { log_file: None };

        tracing::subscriber::with_default(subscriber, || {
            log.stage("Compiling");
            log.dry_run("would run homemaker");
            log.info("plain");
        });

        let events = capture.0.lock().unwrap().clone();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0], (STAGE_TARGET.to_string(), "Compiling".to_string()));
        assert_eq!(events[1].0, DRY_RUN_TARGET);
        assert_eq!(events[2].1, "plain");
    }

    #[test]
    fn log_path_ends_with_command_name() {
        let log = Logger::new("check");
        if let Some(path) = log.log_path() {
            assert!(path.ends_with("check.log"));
        }
    }
}
