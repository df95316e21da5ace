//! Per-minute segment rotation example.
//!
//! Writes a line every few seconds for a little over two minutes; a new
//! segment file appears in the temporary directory after each minute
//! boundary that a write crosses.

use std::thread;
use std::time::Duration;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = tempfile::tempdir()?;

    let logger = seglog::builder()
        .with_directory(temp_dir.path())
        .every_minute()
        .also_stdout()
        .start();

    for i in 0..30 {
        seglog::infof!("Log message number {}", i);
        thread::sleep(Duration::from_secs(5));
    }
    logger.stop();

    for entry in std::fs::read_dir(temp_dir.path())? {
        println!("segment: {}", entry?.file_name().to_string_lossy());
    }

    Ok(())
}
