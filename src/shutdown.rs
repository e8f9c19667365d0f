//! Ctrl+C handling.

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Exit status used when a second Ctrl+C abandons the final flush.
const FORCED_EXIT_CODE: i32 = 130;

/// Spawn a task that cancels the returned token on the first Ctrl+C.
///
/// Installing the handler replaces the default SIGINT behaviour for the rest
/// of the process, so a second Ctrl+C exits immediately instead of waiting
/// for a flush that may never finish.
pub fn install_ctrl_c_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {e}");
            return;
        }
        info!("Received interrupt signal (Ctrl+C)");
        trigger.cancel();

        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Second interrupt received, exiting without waiting for pending posts");
            std::process::exit(FORCED_EXIT_CODE);
        }
    });

    token
}
