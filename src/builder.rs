//! Builder for starting the process logger.
//!
//! Options are applied in call order; when two options touch the same
//! setting, the later one wins.
//!
//! # Example
//!
//! ```rust,no_run
//! let logger = seglog::builder()
//!     .info_level()
//!     .with_directory("/var/log/chat")
//!     .every_hour()
//!     .also_stdout()
//!     .start();
//!
//! seglog::infoln!("listening on", 12345);
//! logger.stop();
//! ```

use std::path::PathBuf;

use crate::clock::Clock;
use crate::{Level, LogConfig, Logger, Result, Rotation};

/// A builder for configuring and starting the logger.
#[derive(Debug, Clone, Default)]
pub struct LogBuilder {
    config: LogConfig,
}

impl LogBuilder {
    /// Create a LogBuilder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a LogBuilder from an existing configuration.
    pub fn from_config(config: LogConfig) -> Self {
        Self { config }
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.config = self.config.with_level(level);
        self
    }

    pub fn debug_level(self) -> Self {
        self.with_level(Level::Debug)
    }

    pub fn info_level(self) -> Self {
        self.with_level(Level::Info)
    }

    pub fn warn_level(self) -> Self {
        self.with_level(Level::Warn)
    }

    pub fn error_level(self) -> Self {
        self.with_level(Level::Error)
    }

    pub fn fatal_level(self) -> Self {
        self.with_level(Level::Fatal)
    }

    /// Write segment files into `directory`.
    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.config = self.config.with_directory(directory);
        self
    }

    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.config = self.config.with_rotation(rotation);
        self
    }

    /// Start a new segment file every hour.
    pub fn every_hour(self) -> Self {
        self.with_rotation(Rotation::Hourly)
    }

    /// Start a new segment file every minute.
    pub fn every_minute(self) -> Self {
        self.with_rotation(Rotation::Minutely)
    }

    /// Duplicate every line to standard output.
    pub fn also_stdout(mut self) -> Self {
        self.config = self.config.with_also_stdout(true);
        self
    }

    /// Write a backtrace through the logger when it stops.
    pub fn print_stack(mut self) -> Self {
        self.config = self.config.with_print_stack(true);
        self
    }

    pub fn with_timestamp(mut self, timestamp: bool) -> Self {
        self.config = self.config.with_timestamp(timestamp);
        self
    }

    pub fn with_clock(mut self, clock: impl Into<Clock>) -> Self {
        self.config = self.config.with_clock(clock.into());
        self
    }

    /// Get the current configuration without starting.
    pub fn build(self) -> LogConfig {
        self.config
    }

    /// Start the process logger.
    ///
    /// Aborts the process if a logger is already running.
    pub fn start(self) -> Logger {
        crate::start(self.config)
    }

    /// Start the process logger, reporting a running logger as
    /// [`Error::AlreadyStarted`](crate::Error::AlreadyStarted).
    pub fn try_start(self) -> Result<Logger> {
        crate::try_start(self.config)
    }
}
