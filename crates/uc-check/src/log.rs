// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Log sources and their in-memory contents.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::CheckError;

/// Which of the two inputs a log came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogKind {
    /// Log of the reference checker peer (`checker.log`).
    Counterpart,
    /// Log of the application under test (`stdout.log`).
    Application,
}

impl LogKind {
    /// Both kinds, in evaluation order.
    pub const ALL: [LogKind; 2] = [LogKind::Counterpart, LogKind::Application];

    /// Conventional file name, relative to the working directory.
    pub const fn default_file_name(self) -> &'static str {
        match self {
            Self::Counterpart => "checker.log",
            Self::Application => "stdout.log",
        }
    }

    /// The process that writes this log.
    pub const fn producer(self) -> &'static str {
        match self {
            Self::Counterpart => "checker",
            Self::Application => "application",
        }
    }
}

impl fmt::Display for LogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Counterpart => write!(f, "checker log"),
            Self::Application => write!(f, "application log"),
        }
    }
}

/// Full contents of one log, read once and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogBlob {
    kind: LogKind,
    path: PathBuf,
    text: String,
}

impl LogBlob {
    /// Wraps text that is already in memory.
    pub fn new(kind: LogKind, path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.into(),
            text: text.into(),
        }
    }

    /// Reads the whole file at `path`.
    ///
    /// A missing file maps to [`CheckError::MissingInput`]; every other I/O
    /// failure (permissions, a directory in place of the file, invalid UTF-8)
    /// maps to [`CheckError::UnexpectedFault`]. Emptiness is not checked here;
    /// see [`LogBlob::ensure_content`].
    pub fn read(kind: LogKind, path: &Path) -> Result<Self, CheckError> {
        match fs::read_to_string(path) {
            Ok(text) => Ok(Self::new(kind, path, text)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Err(CheckError::MissingInput {
                kind,
                path: path.to_path_buf(),
            }),
            Err(source) => Err(CheckError::UnexpectedFault {
                kind,
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Source kind.
    pub fn kind(&self) -> LogKind {
        self.kind
    }

    /// Path the contents were read from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw contents.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// `true` when the log holds nothing but whitespace.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Fails with [`CheckError::EmptyInput`] when the log is blank.
    pub fn ensure_content(&self) -> Result<(), CheckError> {
        if self.is_blank() {
            return Err(CheckError::EmptyInput {
                kind: self.kind,
                path: self.path.clone(),
            });
        }
        Ok(())
    }
}
