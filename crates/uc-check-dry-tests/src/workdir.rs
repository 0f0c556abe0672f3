// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Temporary working directories for on-disk runs.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A temp directory that conventionally holds `checker.log` and `stdout.log`.
///
/// The directory is removed when the value drops.
#[derive(Debug)]
pub struct LogDir {
    dir: TempDir,
}

impl LogDir {
    /// Creates an empty directory.
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir()?,
        })
    }

    /// Root of the directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Writes `text` to `name` inside the directory and returns its path.
    pub fn write(&self, name: &str, text: impl AsRef<[u8]>) -> io::Result<PathBuf> {
        let path = self.dir.path().join(name);
        fs::write(&path, text)?;
        Ok(path)
    }

    /// Writes `checker.log`.
    pub fn write_checker(&self, text: impl AsRef<[u8]>) -> io::Result<PathBuf> {
        self.write("checker.log", text)
    }

    /// Writes `stdout.log`.
    pub fn write_stdout(&self, text: impl AsRef<[u8]>) -> io::Result<PathBuf> {
        self.write("stdout.log", text)
    }
}
