//! # Seglog
//!
//! A process-wide leveled logger that writes to time-segmented log files.
//!
//! ## Features
//!
//! - One logger per process, started once and stopped once
//! - Per-minute or per-hour segment files named
//!   `<process>.<YYYY>-<MM>-<DD>-<HH>-<mm>.<pid>.log`
//! - Every line carries its level, calling function, file and line
//! - Optional mirroring to standard output and a backtrace on stop
//! - A `tracing` layer that forwards events into the logger
//!
//! ## Example
//!
//! ```rust,no_run
//! let logger = seglog::builder()
//!     .info_level()
//!     .with_directory("logs")
//!     .every_hour()
//!     .start();
//!
//! seglog::infoln!("listening on", "0.0.0.0:12345");
//! seglog::warnf!("{} clients dropped", 3);
//!
//! logger.stop();
//! ```

pub mod builder;
pub mod clock;
pub mod config;
pub mod error;
pub mod level;
pub mod lifecycle;
pub mod location;
pub mod logger;
mod macros;
pub mod rotation;
pub mod writer;

#[cfg(feature = "tracing-bridge")]
pub mod tracing_bridge;

pub use builder::LogBuilder;
pub use clock::{Clock, ManualClock};
pub use config::LogConfig;
pub use error::{Error, Result};
pub use level::Level;
pub use lifecycle::{current, fatal_fmt, fatal_values, log_fmt, log_values, start, try_start};
pub use location::CallSite;
pub use logger::Logger;
pub use rotation::Rotation;
pub use writer::SegmentWriter;

/// Create a new [`LogBuilder`] with default configuration.
pub fn builder() -> LogBuilder {
    LogBuilder::new()
}
