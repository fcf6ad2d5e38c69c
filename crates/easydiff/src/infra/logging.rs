//! Tracing subscriber setup.

use tracing::Level;

/// Install the global subscriber. `verbosity` counts `-v` flags: warnings are shown by
/// default, then info, debug, and trace.
pub fn init(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    // A subscriber may already be installed by an embedding host or test harness.
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
