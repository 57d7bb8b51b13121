//! Startup status reporting sink.
//!
//! Init hooks report human-readable progress strings (splash-screen text).
//! Reporting is diagnostics-only: the sink trait is infallible, so a broken
//! reporter can never fail the startup sequence.

use log::info;

/// Sink accepting progress strings during `Initializing`.
pub trait StatusSink: Send + Sync {
    /// Accepts one progress string from `feature`.
    fn report(&self, feature: &str, message: &str);
}

/// Sink that forwards progress strings to the log.
#[derive(Debug, Default)]
pub struct LogStatusSink;

impl StatusSink for LogStatusSink {
    fn report(&self, feature: &str, message: &str) {
        info!("event=init_status module=lifecycle status=ok feature={feature} message={message}");
    }
}

/// Sink that discards progress strings.
#[derive(Debug, Default)]
pub struct NullStatusSink;

impl StatusSink for NullStatusSink {
    fn report(&self, _feature: &str, _message: &str) {}
}

#[cfg(test)]
mod tests {
    use super::{NullStatusSink, StatusSink};
    use std::sync::Mutex;

    struct RecordingSink {
        lines: Mutex<Vec<String>>,
    }

    impl StatusSink for RecordingSink {
        fn report(&self, feature: &str, message: &str) {
            self.lines
                .lock()
                .expect("sink mutex")
                .push(format!("{feature}: {message}"));
        }
    }

    #[test]
    fn custom_sink_receives_feature_and_message() {
        let sink = RecordingSink {
            lines: Mutex::new(Vec::new()),
        };
        sink.report("nav", "loading routes");
        assert_eq!(
            *sink.lines.lock().expect("sink mutex"),
            vec!["nav: loading routes".to_string()]
        );
    }

    #[test]
    fn null_sink_accepts_anything() {
        NullStatusSink.report("nav", "ignored");
    }
}
