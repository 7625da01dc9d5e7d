use std::io;
use std::path::{self, Path};

use rdpgate_common::console::{Console, ConsoleError};
use rdpgate_common::launcher::Launcher;
use tracing::{error, info};

const LAUNCH_PROMPT: &str = "Open the connection now? [y/N] ";

#[derive(Debug)]
pub enum LaunchOutcome {
    /// No known client on this platform; the user was not asked.
    Unsupported,
    Declined,
    Launched,
    /// The client could not be started. The output file is still in place.
    Failed(io::Error),
}

/// Offers to open `output` in the platform's remote-desktop client.
pub fn offer_launch(
    launcher: &dyn Launcher,
    output: &Path,
    console: &mut dyn Console,
) -> Result<LaunchOutcome, ConsoleError> {
    if !launcher.is_supported() {
        return Ok(LaunchOutcome::Unsupported);
    }

    let key = console.read_key(LAUNCH_PROMPT)?;
    console.print("");
    if !matches!(key, 'y' | 'Y') {
        return Ok(LaunchOutcome::Declined);
    }

    match path::absolute(output).and_then(|full_path| launcher.launch(&full_path)) {
        Ok(()) => {
            info!("Remote desktop client started");
            Ok(LaunchOutcome::Launched)
        }
        Err(e) => {
            error!("Failed to start the remote desktop client: {e}");
            Ok(LaunchOutcome::Failed(e))
        }
    }
}
