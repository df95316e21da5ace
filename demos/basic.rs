//! Basic logging example.
//!
//! Starts the logger on standard output, logs at every level and stops it.

fn main() {
    let logger = seglog::builder().info_level().also_stdout().start();

    seglog::debugln!("This debug line is below the threshold");
    seglog::infoln!("This is an info message", 1);
    seglog::warnf!("This is a warning about {} clients", 3);
    seglog::errorf!("This is an error: {}", "connection reset");

    logger.stop();
}
