use std::backtrace::Backtrace;
use std::fmt::{self, Display, Write as _};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use time::macros::format_description;

use crate::{CallSite, Level, LogConfig, SegmentWriter};

/// Resolved output of a running logger.
#[derive(Debug)]
pub(crate) enum Sink {
    Segment(SegmentWriter),
    Stdout,
    Stderr,
    #[cfg(test)]
    Memory(Arc<Mutex<Vec<u8>>>),
}

impl Sink {
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        match self {
            Sink::Segment(writer) => writer.write_all(bytes),
            Sink::Stdout => io::stdout().lock().write_all(bytes),
            Sink::Stderr => io::stderr().lock().write_all(bytes),
            #[cfg(test)]
            Sink::Memory(buf) => {
                lock(buf).extend_from_slice(bytes);
                Ok(())
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Sink::Segment(writer) => writer.flush(),
            Sink::Stdout => io::stdout().flush(),
            Sink::Stderr => io::stderr().flush(),
            #[cfg(test)]
            Sink::Memory(_) => Ok(()),
        }
    }

    fn close(self) -> io::Result<()> {
        match self {
            Sink::Segment(writer) => writer.close(),
            mut other => other.flush(),
        }
    }
}

#[derive(Debug)]
struct Shared {
    config: LogConfig,
    /// Serializes writers; `None` once stopped.
    sink: Mutex<Option<Sink>>,
    stopped: AtomicBool,
}

/// Handle to the running process logger.
///
/// Returned by [`start`](crate::start); clones refer to the same instance.
/// Logging through a stopped handle is a silent no-op.
#[derive(Debug, Clone)]
pub struct Logger {
    shared: Arc<Shared>,
}

impl Logger {
    pub(crate) fn new(config: LogConfig, sink: Sink) -> Self {
        Self {
            shared: Arc::new(Shared {
                config,
                sink: Mutex::new(Some(sink)),
                stopped: AtomicBool::new(false),
            }),
        }
    }

    pub fn config(&self) -> &LogConfig {
        &self.shared.config
    }

    /// Minimum level that is written.
    pub fn level(&self) -> Level {
        self.shared.config.level
    }

    pub fn enabled(&self, level: Level) -> bool {
        level >= self.level()
    }

    pub fn is_stopped(&self) -> bool {
        self.shared.stopped.load(Ordering::Acquire)
    }

    /// Path of the segment file currently receiving lines, if logging to files.
    pub fn segment_path(&self) -> Option<PathBuf> {
        match lock(&self.shared.sink).as_ref() {
            Some(Sink::Segment(writer)) => writer.current_path().map(|p| p.to_path_buf()),
            _ => None,
        }
    }

    /// Write a formatted line.
    ///
    /// A line at [`Level::Fatal`] that passes the threshold terminates the
    /// process with exit code 1 once it has been written.
    pub fn log_fmt(&self, level: Level, site: &CallSite, args: fmt::Arguments<'_>) {
        if !self.enabled(level) {
            return;
        }
        let mut line = self.prefix(level, site);
        let _ = line.write_fmt(args);
        if !line.ends_with('\n') {
            line.push('\n');
        }
        self.emit(level, &line);
    }

    /// Write `values` separated by single spaces, followed by a newline.
    pub fn log_values(&self, level: Level, site: &CallSite, values: &[&dyn Display]) {
        if !self.enabled(level) {
            return;
        }
        let mut line = self.prefix(level, site);
        for (i, value) in values.iter().enumerate() {
            if i > 0 {
                line.push(' ');
            }
            let _ = write!(line, "{}", value);
        }
        line.push('\n');
        self.emit(level, &line);
    }

    /// Tear the logger down. Only the first call has any effect.
    ///
    /// Writes a backtrace first when `print_stack` is configured, then
    /// closes the sink and allows a new logger to be started. The backtrace
    /// covers only the thread calling `stop`; other threads' stacks are not
    /// captured.
    pub fn stop(&self) {
        if self
            .shared
            .stopped
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }

        {
            let mut guard = lock(&self.shared.sink);
            if self.shared.config.print_stack {
                let trace = stack_trace();
                if let Some(sink) = guard.as_mut() {
                    let _ = sink.write_all(trace.as_bytes());
                }
                if self.shared.config.also_stdout {
                    mirror(&trace);
                }
            }
            if let Some(sink) = guard.take() {
                if let Err(err) = sink.close() {
                    eprintln!("seglog: failed to close log sink: {}", err);
                }
            }
        }

        crate::lifecycle::release(self);
        tracing::debug!("seglog stopped");
    }

    pub(crate) fn ptr_eq(&self, other: &Logger) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }

    fn prefix(&self, level: Level, site: &CallSite) -> String {
        let mut line = String::with_capacity(128);
        if self.shared.config.timestamp {
            let now = self.shared.config.clock.now();
            if let Ok(stamp) =
                now.format(format_description!("[year]/[month]/[day] [hour]:[minute]:[second]"))
            {
                line.push_str(&stamp);
                line.push(' ');
            }
        }
        let _ = write!(
            line,
            "{} [{}] ({}:{}) - ",
            level.tag(),
            site.base_function(),
            site.base_file(),
            site.line()
        );
        line
    }

    fn emit(&self, level: Level, line: &str) {
        {
            let mut guard = lock(&self.shared.sink);
            let Some(sink) = guard.as_mut() else {
                return;
            };
            let _ = sink.write_all(line.as_bytes());
            if self.shared.config.also_stdout {
                mirror(line);
            }
            if level == Level::Fatal {
                let _ = sink.flush();
            }
        }
        if level == Level::Fatal {
            exit_fatal();
        }
    }
}

/// Flush standard output and exit with status 1.
pub(crate) fn exit_fatal() -> ! {
    let _ = io::stdout().flush();
    std::process::exit(1)
}

fn mirror(line: &str) {
    let mut stdout = io::stdout().lock();
    let _ = stdout.write_all(line.as_bytes());
    let _ = stdout.flush();
}

fn stack_trace() -> String {
    let thread = std::thread::current();
    format!(
        "stack backtrace of thread '{}':\n{}\n",
        thread.name().unwrap_or("<unnamed>"),
        Backtrace::force_capture()
    )
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
