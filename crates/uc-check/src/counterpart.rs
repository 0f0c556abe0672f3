// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Checker log validation.
//!
//! The checker prints CSV events as the application under test interacts
//! with it. The stage passes once the checker saw the application connect or
//! subscribe:
//!
//! 1. The log exists and is not blank.
//! 2. Lines mentioning `error` are surfaced but never fail the stage; the
//!    checker logs transient dial and stream errors during normal runs.
//! 3. `listening,` lines are echoed.
//! 4. A `connected` or `subscribe` event must be present, and a `connected`
//!    peer id must be well formed. `subscribe` and `msg` events only add
//!    positive findings.

use std::path::{Path, PathBuf};

use tracing::{instrument, warn};

use crate::error::CheckError;
use crate::extract::{EventExtractor, Fact, CHAT_TOPIC};
use crate::log::{LogBlob, LogKind};
use crate::outcome::{Narrator, Recorder, Rule, StageOutcome};

/// Error lines shown when none is configured.
pub const DEFAULT_ERROR_PREVIEW: usize = 3;

/// Listening addresses echoed from the checker's startup lines.
const LISTENING_PREVIEW: usize = 2;

/// Validates the checker log.
#[derive(Debug, Clone)]
pub struct CounterpartValidator {
    path: PathBuf,
    error_preview: usize,
}

impl CounterpartValidator {
    /// Validator for the log at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            error_preview: DEFAULT_ERROR_PREVIEW,
        }
    }

    /// Number of error lines to surface.
    pub fn with_error_preview(mut self, lines: usize) -> Self {
        self.error_preview = lines;
        self
    }

    /// Path of the log this validator reads.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the log and runs every gate.
    #[instrument(skip_all, fields(path = %self.path.display()))]
    pub fn validate(&self, narrator: &mut dyn Narrator) -> StageOutcome {
        let mut rec = Recorder::new(LogKind::Counterpart, narrator);
        let result = LogBlob::read(LogKind::Counterpart, &self.path)
            .and_then(|blob| self.evaluate(&blob, &mut rec));
        if let Err(CheckError::UnexpectedFault { source, .. }) = &result {
            warn!(%source, "checker log unreadable");
        }
        rec.finish(result)
    }

    /// Runs every gate against a log already in memory.
    pub fn validate_blob(&self, blob: &LogBlob, narrator: &mut dyn Narrator) -> StageOutcome {
        let mut rec = Recorder::new(LogKind::Counterpart, narrator);
        let result = self.evaluate(blob, &mut rec);
        rec.finish(result)
    }

    fn evaluate(&self, blob: &LogBlob, rec: &mut Recorder<'_>) -> Result<(), CheckError> {
        rec.info(
            Rule::LogPresent,
            format!("Found {} at {}", blob.kind(), blob.path().display()),
        );
        rec.info(Rule::LogPresent, "Checking checker functionality (CSV events)...");
        blob.ensure_content()?;

        let events = EventExtractor::new(blob);
        self.scan_errors(&events, rec);
        report_listening(&events, rec);
        check_readiness(&events, rec)
    }

    fn scan_errors(&self, events: &EventExtractor<'_>, rec: &mut Recorder<'_>) {
        let errors = events.error_lines();
        if errors.is_empty() {
            return;
        }
        warn!(count = errors.len(), "checker log contains error lines");
        rec.info(
            Rule::ErrorScan,
            format!("Checker log contains {} error line(s) (non-fatal):", errors.len()),
        );
        for line in errors.into_iter().take(self.error_preview) {
            rec.info(Rule::ErrorScan, format!("  {line}"));
        }
    }
}

fn report_listening(events: &EventExtractor<'_>, rec: &mut Recorder<'_>) {
    let addresses = events.listening_addresses();
    if addresses.is_empty() {
        return;
    }
    rec.pass(
        Rule::CheckerListening,
        "Checker printed listening addresses on startup",
    );
    for addr in addresses
        .into_iter()
        .take(LISTENING_PREVIEW)
        .filter(|addr| addr.contains("/p2p/"))
    {
        rec.info(Rule::CheckerListening, format!("  {addr}"));
    }
}

fn check_readiness(events: &EventExtractor<'_>, rec: &mut Recorder<'_>) -> Result<(), CheckError> {
    let mut connected = None;
    let mut subscribed = false;
    let mut message = false;
    for fact in events.facts() {
        match fact {
            Fact::ConnectedPeer(peer) => connected = Some(peer),
            Fact::SubscribedPeer { .. } => subscribed = true,
            Fact::MessageSeen { .. } => message = true,
            _ => {}
        }
    }

    if connected.is_none() && !subscribed {
        return Err(CheckError::violation(
            Rule::Readiness,
            "Checker did not receive connections or subscriptions yet",
        ));
    }

    if let Some(peer) = connected {
        peer.validate().map_err(|err| {
            CheckError::violation(
                Rule::ConnectedPeer,
                format!("Invalid peer id in connected event: {err}"),
            )
        })?;
        rec.pass(
            Rule::ConnectedPeer,
            format!("Checker accepted connection from application peer {peer}"),
        );
    }

    if subscribed {
        rec.pass(
            Rule::SubscribedPeer,
            format!("Checker observed subscription to {CHAT_TOPIC} topic"),
        );
    }

    if message {
        rec.pass(
            Rule::MessageSeen,
            format!("Checker observed a chat message on {CHAT_TOPIC}"),
        );
    }

    Ok(())
}
