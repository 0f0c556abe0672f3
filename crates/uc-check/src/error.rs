// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Stage failure taxonomy.
//!
//! Gates return `Result<_, CheckError>` so evaluation short-circuits with `?`.
//! Nothing here escapes a stage: the stage boundary turns every error into
//! failure findings (see [`CheckError::findings`]).

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::log::LogKind;
use crate::outcome::{Finding, Rule};

/// Why a stage stopped.
#[derive(Debug, Error)]
pub enum CheckError {
    /// The log file does not exist.
    #[error("No {kind} found at {}", .path.display())]
    MissingInput {
        /// Which log.
        kind: LogKind,
        /// Where it was expected.
        path: PathBuf,
    },
    /// The log file exists but holds no non-whitespace content.
    #[error("Empty {kind}: {} has no content - the {} may have failed to start", .path.display(), .kind.producer())]
    EmptyInput {
        /// Which log.
        kind: LogKind,
        /// The blank file.
        path: PathBuf,
    },
    /// A required marker is absent or a peer id is malformed.
    #[error("{detail}")]
    FormatViolation {
        /// Gate that failed.
        rule: Rule,
        /// What was wrong.
        detail: String,
        /// Literal text the gate looks for, when it helps to show it.
        expected: Option<String>,
    },
    /// Any other I/O fault while reading a log.
    #[error("Error reading {}: {source}", .path.display())]
    UnexpectedFault {
        /// Which log.
        kind: LogKind,
        /// The unreadable path.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: io::Error,
    },
}

impl CheckError {
    /// A gate violation without an expected-text hint.
    pub fn violation(rule: Rule, detail: impl Into<String>) -> Self {
        Self::FormatViolation {
            rule,
            detail: detail.into(),
            expected: None,
        }
    }

    /// A gate violation that also reports the literal text it looks for.
    pub fn violation_expecting(
        rule: Rule,
        detail: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        Self::FormatViolation {
            rule,
            detail: detail.into(),
            expected: Some(expected.into()),
        }
    }

    /// Gate this error is attributed to.
    pub fn rule(&self) -> Rule {
        match self {
            Self::MissingInput { .. } => Rule::LogPresent,
            Self::EmptyInput { .. } => Rule::LogNotEmpty,
            Self::FormatViolation { rule, .. } => *rule,
            Self::UnexpectedFault { .. } => Rule::LogReadable,
        }
    }

    /// Narrative lines for this error: one failure line, plus the expected
    /// text when there is one.
    pub fn findings(&self) -> Vec<Finding> {
        let mut findings = vec![Finding::fail(self.rule(), self.to_string())];
        if let Self::FormatViolation {
            rule,
            expected: Some(expected),
            ..
        } = self
        {
            findings.push(Finding::info(*rule, format!("Expected: '{expected}'")));
        }
        findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::Mark;

    #[test]
    fn missing_input_names_the_path() {
        let err = CheckError::MissingInput {
            kind: LogKind::Counterpart,
            path: PathBuf::from("run/checker.log"),
        };
        assert_eq!(err.to_string(), "No checker log found at run/checker.log");
        assert_eq!(err.rule(), Rule::LogPresent);
    }

    #[test]
    fn empty_input_names_the_producer() {
        let err = CheckError::EmptyInput {
            kind: LogKind::Application,
            path: PathBuf::from("stdout.log"),
        };
        assert_eq!(
            err.to_string(),
            "Empty application log: stdout.log has no content - the application may have failed to start"
        );
    }

    #[test]
    fn expected_text_becomes_an_info_line() {
        let err = CheckError::violation_expecting(
            Rule::PeerIdGenerated,
            "Peer ID not found",
            "[SYSTEM] Generated Peer ID: <peer_id>",
        );
        let findings = err.findings();
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].mark, Mark::Fail);
        assert_eq!(findings[0].message, "Peer ID not found");
        assert_eq!(findings[1].mark, Mark::Info);
        assert_eq!(
            findings[1].message,
            "Expected: '[SYSTEM] Generated Peer ID: <peer_id>'"
        );
    }

    #[test]
    fn faults_keep_their_source() {
        let err = CheckError::UnexpectedFault {
            kind: LogKind::Counterpart,
            path: PathBuf::from("checker.log"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
        };
        assert_eq!(err.rule(), Rule::LogReadable);
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(
            err.to_string(),
            "Error reading checker.log: permission denied"
        );
    }
}
