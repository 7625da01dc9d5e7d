//! Scripted stand-ins for the workflow's capabilities.
//!
//! Compiled for this crate's unit tests and, through the `testing` feature,
//! for the integration tests.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use rdpgate_common::console::{Console, ConsoleError};
use rdpgate_common::files::{FileStore, LocalFiles, Sink};
use rdpgate_common::launcher::Launcher;
use rdpgate_common::network::interface::{InterfaceInfo, InterfaceSource};

/// Answers prompts from a fixed script and records everything shown.
#[derive(Default)]
pub struct ScriptedConsole {
    lines: VecDeque<String>,
    keys: VecDeque<char>,
    pub printed: Vec<String>,
    pub prompts: Vec<String>,
}

impl ScriptedConsole {
    pub fn with_lines(lines: &[&str]) -> Self {
        Self {
            lines: lines.iter().map(|l| l.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn with_keys(mut self, keys: &[char]) -> Self {
        self.keys = keys.iter().copied().collect();
        self
    }
}

impl Console for ScriptedConsole {
    fn print(&mut self, line: &str) {
        self.printed.push(line.to_string());
    }

    fn read_line(&mut self, prompt: &str) -> Result<String, ConsoleError> {
        self.prompts.push(prompt.to_string());
        self.lines.pop_front().ok_or(ConsoleError::Closed)
    }

    fn read_key(&mut self, prompt: &str) -> Result<char, ConsoleError> {
        self.prompts.push(prompt.to_string());
        self.keys.pop_front().ok_or(ConsoleError::Closed)
    }
}

/// Serves a fixed interface list and counts how often it was asked.
pub struct FakeInterfaces {
    interfaces: Vec<InterfaceInfo>,
    pub queries: Rc<RefCell<usize>>,
}

impl FakeInterfaces {
    pub fn new(interfaces: Vec<InterfaceInfo>) -> Self {
        Self {
            interfaces,
            queries: Rc::new(RefCell::new(0)),
        }
    }
}

impl InterfaceSource for FakeInterfaces {
    fn interfaces(&self) -> anyhow::Result<Vec<InterfaceInfo>> {
        *self.queries.borrow_mut() += 1;
        Ok(self.interfaces.clone())
    }
}

pub struct FailingInterfaces;

impl InterfaceSource for FailingInterfaces {
    fn interfaces(&self) -> anyhow::Result<Vec<InterfaceInfo>> {
        anyhow::bail!("interface query failed")
    }
}

/// Records launched files; the handle survives moving the launcher into a service.
pub struct RecordingLauncher {
    supported: bool,
    fail: bool,
    pub launched: Rc<RefCell<Vec<PathBuf>>>,
}

impl RecordingLauncher {
    pub fn new(supported: bool) -> Self {
        Self {
            supported,
            fail: false,
            launched: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// A supported launcher whose client never starts.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(true)
        }
    }
}

impl Launcher for RecordingLauncher {
    fn is_supported(&self) -> bool {
        self.supported
    }

    fn launch(&self, file: &Path) -> io::Result<()> {
        if self.fail {
            return Err(io::Error::new(io::ErrorKind::NotFound, "mstsc.exe not found"));
        }
        self.launched.borrow_mut().push(file.to_path_buf());
        Ok(())
    }
}

/// The local filesystem with selected operations forced to fail.
///
/// A failing write still creates the file, so a later cleanup has something
/// to remove.
#[derive(Debug, Default, Clone, Copy)]
pub struct FaultyFiles {
    pub fail_write: bool,
    pub fail_copy: bool,
    pub fail_remove: bool,
}

impl FileStore for FaultyFiles {
    fn open(&self, path: &Path) -> io::Result<Box<dyn Read>> {
        LocalFiles.open(path)
    }

    fn create(&self, path: &Path) -> io::Result<Box<dyn Sink>> {
        let sink = LocalFiles.create(path)?;
        if self.fail_write {
            return Ok(Box::new(FullDisk(sink)));
        }
        Ok(sink)
    }

    fn copy(&self, from: &Path, to: &Path) -> io::Result<u64> {
        if self.fail_copy {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "output is locked"));
        }
        LocalFiles.copy(from, to)
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        if self.fail_remove {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "file is in use by another process",
            ));
        }
        LocalFiles.remove(path)
    }
}

struct FullDisk(Box<dyn Sink>);

impl Write for FullDisk {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::other("no space left on device"))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.flush()
    }
}

impl Sink for FullDisk {
    fn sync_all(&mut self) -> io::Result<()> {
        self.0.sync_all()
    }
}
