//! Forwarding `tracing` events into the segment logger.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn main() {
    let logger = seglog::builder().debug_level().also_stdout().start();

    tracing_subscriber::registry()
        .with(seglog::tracing_bridge::layer())
        .init();

    tracing::info!("This is an info message");
    tracing::warn!(user = "bob", action = "logout", "User session ended");
    seglog::infoln!("Direct calls still work");

    logger.stop();
}
