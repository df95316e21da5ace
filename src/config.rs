use std::path::PathBuf;

use serde::{Deserialize, Deserializer, Serialize};

use crate::clock::Clock;
use crate::{Level, Rotation};

/// Configuration for the process logger.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Minimum level a line must have to be written
    pub level: Level,
    /// Directory for segment files; `None` logs to a standard stream
    #[serde(deserialize_with = "non_empty_path")]
    pub directory: Option<PathBuf>,
    /// How often a new segment file is started
    pub rotation: Rotation,
    /// Duplicate every line to standard output
    pub also_stdout: bool,
    /// Write a stack backtrace when the logger stops
    pub print_stack: bool,
    /// Prefix each line with `YYYY/MM/DD HH:MM:SS`
    pub timestamp: bool,
    /// Time source for rotation
    #[serde(skip)]
    pub clock: Clock,
}

impl LogConfig {
    /// Create a new LogConfig with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum level
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Enable the file sink in `directory`; an empty path disables it
    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        let directory = directory.into();
        self.directory = if directory.as_os_str().is_empty() {
            None
        } else {
            Some(directory)
        };
        self
    }

    /// Set the rotation unit
    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    /// Mirror lines to standard output
    pub fn with_also_stdout(mut self, also_stdout: bool) -> Self {
        self.also_stdout = also_stdout;
        self
    }

    /// Print a backtrace on stop
    pub fn with_print_stack(mut self, print_stack: bool) -> Self {
        self.print_stack = print_stack;
        self
    }

    /// Prefix lines with the date and time
    pub fn with_timestamp(mut self, timestamp: bool) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Replace the rotation clock
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }
}

fn non_empty_path<'de, D>(deserializer: D) -> Result<Option<PathBuf>, D::Error>
where
    D: Deserializer<'de>,
{
    let path = Option::<PathBuf>::deserialize(deserializer)?;
    Ok(path.filter(|p| !p.as_os_str().is_empty()))
}
