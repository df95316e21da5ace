use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use time::OffsetDateTime;

use crate::clock::Clock;
use crate::rotation::{process_base_name, segment_file_name};
use crate::{Result, Rotation};

/// Where segment bytes currently go.
#[derive(Debug)]
enum Target {
    File { file: File, path: PathBuf },
    /// Terminal state after a failed rotation.
    Stderr,
}

/// A writer that switches to a fresh file each time a rotation boundary passes.
///
/// The boundary is checked lazily: a new file is only opened by the first
/// write that observes the deadline has already elapsed. Idle periods create
/// no files.
///
/// The writer holds no lock of its own; callers sharing it across threads
/// must serialize access.
#[derive(Debug)]
pub struct SegmentWriter {
    /// Directory holding the segment files.
    directory: PathBuf,
    rotation: Rotation,
    clock: Clock,
    process: String,
    pid: u32,
    target: Target,
    /// Instant after which the next write rotates; `None` disables rotation.
    deadline: Option<OffsetDateTime>,
}

impl SegmentWriter {
    /// Create the directory if needed and open the first segment.
    pub fn open(directory: impl AsRef<Path>, rotation: Rotation, clock: Clock) -> Result<Self> {
        let directory = directory.as_ref().to_path_buf();
        std::fs::create_dir_all(&directory)?;

        let process = process_base_name();
        let pid = std::process::id();
        let now = clock.now();
        let (file, path) = open_segment(&directory, &process, now, pid)?;

        Ok(Self {
            directory,
            rotation,
            clock,
            process,
            pid,
            target: Target::File { file, path },
            deadline: rotation.next_deadline(now),
        })
    }

    /// Path of the file currently written to, `None` once degraded to stderr.
    pub fn current_path(&self) -> Option<&Path> {
        match &self.target {
            Target::File { path, .. } => Some(path),
            Target::Stderr => None,
        }
    }

    /// Directory the segment files are created in.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Rotation unit this writer was opened with.
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Whether a failed rotation has redirected output to stderr.
    pub fn is_degraded(&self) -> bool {
        matches!(self.target, Target::Stderr)
    }

    /// Flush, sync to disk and release the current file.
    pub fn close(mut self) -> io::Result<()> {
        self.flush()?;
        match &self.target {
            Target::File { file, .. } => file.sync_all(),
            Target::Stderr => Ok(()),
        }
    }

    fn rotate_if_due(&mut self) {
        let Some(deadline) = self.deadline else {
            return;
        };
        let now = self.clock.now();
        if now < deadline {
            return;
        }

        // The old handle is dropped before its successor is opened.
        drop(std::mem::replace(&mut self.target, Target::Stderr));

        let boundary = self.rotation.truncate(now);
        match open_segment(&self.directory, &self.process, boundary, self.pid) {
            Ok((file, path)) => {
                self.target = Target::File { file, path };
                self.deadline = self.rotation.next_deadline(boundary);
            }
            Err(err) => {
                eprintln!(
                    "seglog: cannot open next log segment in {}, writing to stderr: {}",
                    self.directory.display(),
                    err
                );
                self.deadline = None;
            }
        }
    }
}

impl Write for SegmentWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.rotate_if_due();
        match &mut self.target {
            Target::File { file, .. } => file.write(buf),
            Target::Stderr => io::stderr().write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.target {
            Target::File { file, .. } => file.flush(),
            Target::Stderr => io::stderr().flush(),
        }
    }
}

fn open_segment(
    directory: &Path,
    process: &str,
    at: OffsetDateTime,
    pid: u32,
) -> Result<(File, PathBuf)> {
    let path = directory.join(segment_file_name(process, at, pid)?);
    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    Ok((file, path))
}
