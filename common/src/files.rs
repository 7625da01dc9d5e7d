//! File operations behind rendering and promotion.
//!
//! The workflow reads the template, writes and removes the temporary file and
//! copies it over the output only through a [`FileStore`], so every failure
//! path (including a failing cleanup) can be reproduced.

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::Path;

/// A writable destination that can be forced to durable storage.
pub trait Sink: Write {
    fn sync_all(&mut self) -> io::Result<()>;
}

impl Sink for File {
    fn sync_all(&mut self) -> io::Result<()> {
        File::sync_all(self)
    }
}

pub trait FileStore {
    fn open(&self, path: &Path) -> io::Result<Box<dyn Read>>;

    /// Creates or truncates `path`.
    fn create(&self, path: &Path) -> io::Result<Box<dyn Sink>>;

    /// Copies `from` over `to`, replacing it if present.
    fn copy(&self, from: &Path, to: &Path) -> io::Result<u64>;

    fn remove(&self, path: &Path) -> io::Result<()>;
}

/// The local filesystem.
pub struct LocalFiles;

impl FileStore for LocalFiles {
    fn open(&self, path: &Path) -> io::Result<Box<dyn Read>> {
        Ok(Box::new(File::open(path)?))
    }

    fn create(&self, path: &Path) -> io::Result<Box<dyn Sink>> {
        Ok(Box::new(File::create(path)?))
    }

    fn copy(&self, from: &Path, to: &Path) -> io::Result<u64> {
        fs::copy(from, to)
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }
}
