//! Logging capability handed to the engine and checkers.
//!
//! The backend is `tracing`; the `Logger` wrapper exists so the core takes
//! logging as an explicit dependency instead of reaching for a process-wide
//! instance. Diagnostics never influence control flow or returned data.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// A named logging handle. Cheap to clone; one per component.
#[derive(Debug, Clone)]
pub struct Logger {
    component: String,
}

impl Logger {
    pub fn new(component: impl Into<String>) -> Self {
        Logger {
            component: component.into(),
        }
    }

    /// Derive a logger for a sub-component.
    pub fn child(&self, component: &str) -> Self {
        Logger::new(component)
    }

    pub fn debug(&self, message: impl AsRef<str>) {
        tracing::debug!(component = %self.component, "{}", message.as_ref());
    }

    pub fn info(&self, message: impl AsRef<str>) {
        tracing::info!(component = %self.component, "{}", message.as_ref());
    }

    pub fn warn(&self, message: impl AsRef<str>) {
        tracing::warn!(component = %self.component, "{}", message.as_ref());
    }

    pub fn error(&self, message: impl AsRef<str>) {
        tracing::error!(component = %self.component, "{}", message.as_ref());
    }
}

impl Default for Logger {
    fn default() -> Self {
        Logger::new("springlint")
    }
}

/// Install the global tracing subscriber.
///
/// Level defaults to `warn` and can be overridden with `SPRINGLINT_LOG`
/// (e.g. `SPRINGLINT_LOG=debug`). Safe to call once at startup.
pub fn init_subscriber() {
    let filter = EnvFilter::try_from_env("SPRINGLINT_LOG")
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init();
}
