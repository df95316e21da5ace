//! Start/stop state machine for the single process logger.
//!
//! `STARTED` moves false -> true once per winning [`try_start`] and back to
//! false when the installed logger stops. The installed handle is kept in a
//! global slot so the logging macros can reach it without threading the
//! handle through every call site.

use std::fmt::{self, Display};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock};

use once_cell::sync::Lazy;

use crate::logger::{Sink, exit_fatal};
use crate::{CallSite, Error, Level, LogConfig, Logger, Result, SegmentWriter};

static STARTED: AtomicBool = AtomicBool::new(false);

static INSTANCE: Lazy<RwLock<Option<Logger>>> = Lazy::new(|| RwLock::new(None));

/// Start the process logger.
///
/// Starting twice without an intervening [`Logger::stop`] is a programming
/// error and aborts the process.
pub fn start(config: LogConfig) -> Logger {
    match try_start(config) {
        Ok(logger) => logger,
        Err(err) => {
            eprintln!("seglog: start() called twice: {}", err);
            std::process::abort()
        }
    }
}

/// Start the process logger, or report [`Error::AlreadyStarted`].
pub fn try_start(config: LogConfig) -> Result<Logger> {
    if STARTED
        .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
        .is_err()
    {
        return Err(Error::AlreadyStarted);
    }

    let sink = resolve_sink(&config);
    let logger = Logger::new(config, sink);
    *INSTANCE.write().unwrap_or_else(PoisonError::into_inner) = Some(logger.clone());

    tracing::debug!(
        level = %logger.level(),
        directory = ?logger.config().directory,
        rotation = ?logger.config().rotation,
        "seglog started"
    );
    Ok(logger)
}

/// The running logger, if any.
pub fn current() -> Option<Logger> {
    INSTANCE
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Write a formatted line through the running logger.
pub fn log_fmt(level: Level, site: &CallSite, args: fmt::Arguments<'_>) {
    if let Some(logger) = current() {
        logger.log_fmt(level, site, args);
    }
}

/// Write space-separated values through the running logger.
pub fn log_values(level: Level, site: &CallSite, values: &[&dyn Display]) {
    if let Some(logger) = current() {
        logger.log_values(level, site, values);
    }
}

/// Log at [`Level::Fatal`] and exit with status 1, whether or not a logger
/// is running.
pub fn fatal_fmt(site: &CallSite, args: fmt::Arguments<'_>) -> ! {
    log_fmt(Level::Fatal, site, args);
    exit_fatal()
}

/// Value-list form of [`fatal_fmt`].
pub fn fatal_values(site: &CallSite, values: &[&dyn Display]) -> ! {
    log_values(Level::Fatal, site, values);
    exit_fatal()
}

/// Uninstall `logger` if it is the running one and reopen the door for `start`.
pub(crate) fn release(logger: &Logger) {
    let mut slot = INSTANCE.write().unwrap_or_else(PoisonError::into_inner);
    if slot.as_ref().is_some_and(|current| current.ptr_eq(logger)) {
        *slot = None;
        STARTED.store(false, Ordering::Release);
    }
}

fn resolve_sink(config: &LogConfig) -> Sink {
    if let Some(directory) = &config.directory {
        match SegmentWriter::open(directory, config.rotation, config.clock.clone()) {
            Ok(writer) => return Sink::Segment(writer),
            Err(err) => {
                eprintln!(
                    "seglog: cannot open log directory {}: {}",
                    directory.display(),
                    err
                );
                tracing::warn!(
                    directory = %directory.display(),
                    error = %err,
                    "file sink unavailable"
                );
            }
        }
    }
    if config.also_stdout {
        Sink::Stdout
    } else {
        Sink::Stderr
    }
}
