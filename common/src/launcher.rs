use std::io;
use std::path::Path;
#[cfg(target_os = "windows")]
use std::process::Command;

/// Starts an external remote-desktop client with a generated connection file.
pub trait Launcher {
    /// Whether this host has a client we know how to start.
    fn is_supported(&self) -> bool;

    /// Spawns the client with `file` as its only argument. Does not wait for it to exit.
    fn launch(&self, file: &Path) -> io::Result<()>;
}

/// The client shipped with the operating system (`mstsc.exe` on Windows).
pub struct SystemLauncher;

#[cfg(target_os = "windows")]
const CLIENT_EXECUTABLE: &str = "mstsc.exe";

impl Launcher for SystemLauncher {
    fn is_supported(&self) -> bool {
        cfg!(target_os = "windows")
    }

    #[cfg(target_os = "windows")]
    fn launch(&self, file: &Path) -> io::Result<()> {
        Command::new(CLIENT_EXECUTABLE).arg(file).spawn().map(|_| ())
    }

    #[cfg(not(target_os = "windows"))]
    fn launch(&self, _file: &Path) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "no remote desktop client is known for this platform",
        ))
    }
}
