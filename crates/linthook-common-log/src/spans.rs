//! Span helpers shared by the dispatch pipeline.

use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{info_span, Span};

/// Span covering one tool run against one file.
pub fn tool_span(subsystem: &'static str, tool: &str, file: &Path) -> Span {
    info_span!("tool", subsystem, name = %tool, file = %file.display())
}

/// Span covering config loading.
pub fn config_span(path: &Path) -> Span {
    info_span!("config", path = %path.display())
}

/// Record an error on the current span.
pub fn record_error(error: &dyn std::error::Error) {
    Span::current().record("error", tracing::field::display(error));
}

/// Measures how long an operation takes.
#[derive(Debug)]
pub struct Timer {
    start: Instant,
    operation: &'static str,
}

impl Timer {
    /// Start a new timer.
    pub fn start(operation: &'static str) -> Self {
        Self {
            start: Instant::now(),
            operation,
        }
    }

    /// Time since [`Timer::start`].
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Log the duration at debug level and return it.
    pub fn finish(self) -> Duration {
        let duration = self.start.elapsed();
        tracing::debug!(
            operation = self.operation,
            duration_ms = duration.as_millis() as u64,
            "operation completed"
        );
        duration
    }
}

/// Time a block of code.
#[macro_export]
macro_rules! timed {
    ($name:expr, $body:expr) => {{
        let _timer = $crate::spans::Timer::start($name);
        let result = $body;
        _timer.finish();
        result
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::EnvFilter;

    fn with_subscriber<F>(f: F)
    where
        F: FnOnce(),
    {
        let subscriber = tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter(EnvFilter::new("trace"))
            .finish();

        tracing::subscriber::with_default(subscriber, f);
    }

    #[test]
    fn test_tool_span_nests_under_config_span() {
        with_subscriber(|| {
            let config = config_span(Path::new("/tmp/validators.jsonc"));
            let _outer = config.enter();

            let tool = tool_span("validate", "go_vet", Path::new("main.go"));
            let _inner = tool.enter();

            assert_eq!(tool.metadata().map(|m| m.name()), Some("tool"));
            tracing::info!("inside tool span");
        });
    }

    #[test]
    fn test_record_error_on_current_span() {
        with_subscriber(|| {
            let span = tool_span("format", "gofmt", Path::new("x.go"));
            let _guard = span.enter();
            let error = std::io::Error::new(std::io::ErrorKind::NotFound, "gofmt not found");
            record_error(&error);
        });
    }

    #[test]
    fn test_timer_measures() {
        let timer = Timer::start("sleep");
        std::thread::sleep(Duration::from_millis(10));
        assert!(timer.elapsed() >= Duration::from_millis(10));
        assert!(timer.finish() >= Duration::from_millis(10));
    }

    #[test]
    fn test_timed_macro_returns_value() {
        with_subscriber(|| {
            let result = crate::timed!("macro", { 40 + 2 });
            assert_eq!(result, 42);
        });
    }
}
