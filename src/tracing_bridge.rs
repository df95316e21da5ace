//! Forward `tracing` events into the running process logger.
//!
//! ```rust,no_run
//! use tracing_subscriber::layer::SubscriberExt;
//! use tracing_subscriber::util::SubscriberInitExt;
//!
//! let logger = seglog::builder().with_directory("logs").start();
//! tracing_subscriber::registry()
//!     .with(seglog::tracing_bridge::layer())
//!     .init();
//!
//! tracing::info!(peer = "10.0.0.7", "connection accepted");
//! logger.stop();
//! ```

use std::fmt::{self, Write as _};

use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;

use crate::{CallSite, Level};

/// A [`Layer`] that writes every event through [`crate::current`].
///
/// Events are dropped while no logger is running, and so are the crate's own
/// lifecycle events, which would otherwise land in the segment file.
#[derive(Debug, Clone, Copy, Default)]
pub struct SegLogLayer {
    _priv: (),
}

impl SegLogLayer {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Shorthand for [`SegLogLayer::new`].
pub fn layer() -> SegLogLayer {
    SegLogLayer::new()
}

impl<S: Subscriber> Layer<S> for SegLogLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let Some(logger) = crate::current() else {
            return;
        };
        let metadata = event.metadata();
        if is_own_target(metadata.target()) {
            return;
        }
        let level = map_level(metadata.level());
        if !logger.enabled(level) {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let site = CallSite::new(
            metadata.module_path().unwrap_or_else(|| metadata.target()),
            metadata.file().unwrap_or(""),
            metadata.line().unwrap_or(0),
        );
        logger.log_fmt(level, &site, format_args!("{}", visitor.finish()));
    }
}

fn is_own_target(target: &str) -> bool {
    const OWN: &str = env!("CARGO_CRATE_NAME");
    target
        .strip_prefix(OWN)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
}

/// `TRACE` folds into `Debug`; nothing maps to `Fatal`.
pub fn map_level(level: &tracing::Level) -> Level {
    if *level == tracing::Level::ERROR {
        Level::Error
    } else if *level == tracing::Level::WARN {
        Level::Warn
    } else if *level == tracing::Level::INFO {
        Level::Info
    } else {
        Level::Debug
    }
}

/// Collects the `message` field, appending any other fields as `name=value`.
#[derive(Debug, Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    fn push_field(&mut self, name: &str, value: fmt::Arguments<'_>) {
        if !self.fields.is_empty() {
            self.fields.push(' ');
        }
        let _ = write!(self.fields, "{}={}", name, value);
    }

    fn finish(self) -> String {
        match (self.message.is_empty(), self.fields.is_empty()) {
            (_, true) => self.message,
            (true, false) => self.fields,
            (false, false) => format!("{} {}", self.message, self.fields),
        }
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            self.push_field(field.name(), format_args!("{}", value));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{:?}", value);
        } else {
            self.push_field(field.name(), format_args!("{:?}", value));
        }
    }
}
