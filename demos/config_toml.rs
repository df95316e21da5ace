//! Example of loading logger configuration from TOML.
//!
//! Run with:
//! ```bash
//! cargo run --example config_toml
//! ```

use serde::Deserialize;

const CONFIG: &str = r#"
[log]
level = "debug"
directory = "logs"
rotation = "hourly"
also_stdout = true
print_stack = true
timestamp = true
"#;

#[derive(Deserialize)]
struct Config {
    log: seglog::LogConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let root: Config = toml::from_str(CONFIG)?;

    let logger = seglog::start(root.log);

    seglog::debugln!("This is a debug message");
    seglog::infoln!("This is an info message");
    seglog::warnln!("This is a warning message");
    seglog::errorln!("This is an error message");

    // print_stack is set, so the backtrace lands in the segment too
    logger.stop();

    Ok(())
}
