// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Where the checker looks for its inputs.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::counterpart::DEFAULT_ERROR_PREVIEW;
use crate::log::LogKind;

/// Error type for config loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file not present.
    #[error("config not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error while reading.
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    /// Deserialization failure.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Checker settings. Every field has a default, so `{}` is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CheckConfig {
    /// Directory relative log paths resolve against.
    pub workdir: PathBuf,
    /// Checker log path.
    pub counterpart_log: PathBuf,
    /// Application log path.
    pub application_log: PathBuf,
    /// Checker error lines echoed in the narrative.
    pub error_preview: usize,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            workdir: PathBuf::from("."),
            counterpart_log: PathBuf::from(LogKind::Counterpart.default_file_name()),
            application_log: PathBuf::from(LogKind::Application.default_file_name()),
            error_preview: DEFAULT_ERROR_PREVIEW,
        }
    }
}

impl CheckConfig {
    /// Defaults rooted at `workdir`.
    pub fn in_dir(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
            ..Self::default()
        }
    }

    /// Reads a JSON config file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(ConfigError::NotFound(path.to_path_buf()))
            }
            Err(err) => return Err(ConfigError::Io(err)),
        };
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Resolved path of the checker log.
    pub fn counterpart_path(&self) -> PathBuf {
        self.resolve(&self.counterpart_log)
    }

    /// Resolved path of the application log.
    pub fn application_path(&self) -> PathBuf {
        self.resolve(&self.application_log)
    }

    /// Resolved path of the log of `kind`.
    pub fn path_for(&self, kind: LogKind) -> PathBuf {
        match kind {
            LogKind::Counterpart => self.counterpart_path(),
            LogKind::Application => self.application_path(),
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.workdir.join(path)
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_conventional_layout() {
        let cfg = CheckConfig::default();
        assert_eq!(cfg.counterpart_path(), Path::new("./checker.log"));
        assert_eq!(cfg.application_path(), Path::new("./stdout.log"));
        assert_eq!(cfg.error_preview, 3);
    }

    #[test]
    fn absolute_paths_ignore_workdir() {
        let cfg = CheckConfig {
            application_log: PathBuf::from("/var/log/app.log"),
            ..CheckConfig::in_dir("/tmp/run")
        };
        assert_eq!(cfg.application_path(), Path::new("/var/log/app.log"));
        assert_eq!(
            cfg.path_for(LogKind::Counterpart),
            Path::new("/tmp/run/checker.log")
        );
    }

    #[test]
    fn partial_json_fills_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("check.json");
        fs::write(&path, r#"{ "workdir": "run", "error_preview": 5 }"#).expect("write");
        let cfg = CheckConfig::load(&path).expect("load");
        assert_eq!(cfg.workdir, PathBuf::from("run"));
        assert_eq!(cfg.error_preview, 5);
        assert_eq!(cfg.counterpart_log, PathBuf::from("checker.log"));
    }

    #[test]
    fn load_errors_are_classified() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("absent.json");
        assert!(matches!(
            CheckConfig::load(&missing).unwrap_err(),
            ConfigError::NotFound(p) if p == missing
        ));

        let bad = dir.path().join("bad.json");
        fs::write(&bad, r#"{ "workdir": 7 }"#).expect("write");
        assert!(matches!(
            CheckConfig::load(&bad).unwrap_err(),
            ConfigError::Serde(_)
        ));

        let unknown = dir.path().join("unknown.json");
        fs::write(&unknown, r#"{ "checker": "x.log" }"#).expect("write");
        assert!(matches!(
            CheckConfig::load(&unknown).unwrap_err(),
            ConfigError::Serde(_)
        ));
    }
}
