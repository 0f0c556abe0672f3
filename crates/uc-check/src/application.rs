// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Application log validation.
//!
//! An ordered checklist; the first failing required gate ends the stage:
//!
//! | # | Gate                                  | Required |
//! |---|---------------------------------------|----------|
//! | 1 | log exists and is not blank           | yes      |
//! | 2 | startup banner                        | yes      |
//! | 3 | generated peer id, well formed        | yes      |
//! | 4 | node started                          | yes      |
//! | 5 | listening on N address(es)            | yes      |
//! | 6 | ≥ [`PROTOCOL_QUORUM`] of 4 protocols  | yes      |
//! | 7 | chat room initialising                | yes      |
//! | 8 | chat room joined                      | yes      |
//! | 9 | introduction, publishing, running     | no       |
//!
//! Gate 6 is a quorum rather than a full set: one protocol line may be
//! missing or logged late without failing the run. Lifecycle markers get no
//! such leniency.

use std::path::{Path, PathBuf};

use tracing::{instrument, warn};

use crate::error::CheckError;
use crate::extract::{EventExtractor, Marker, Protocol};
use crate::log::{LogBlob, LogKind};
use crate::outcome::{Narrator, Recorder, Rule, StageOutcome};

/// Protocol mentions required by gate 6.
pub const PROTOCOL_QUORUM: usize = 3;

/// Validates the application log.
#[derive(Debug, Clone)]
pub struct ApplicationValidator {
    path: PathBuf,
}

impl ApplicationValidator {
    /// Validator for the log at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the log this validator reads.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the log and runs the checklist.
    #[instrument(skip_all, fields(path = %self.path.display()))]
    pub fn validate(&self, narrator: &mut dyn Narrator) -> StageOutcome {
        let mut rec = Recorder::new(LogKind::Application, narrator);
        let result = LogBlob::read(LogKind::Application, &self.path)
            .and_then(|blob| evaluate(&blob, &mut rec));
        if let Err(CheckError::UnexpectedFault { source, .. }) = &result {
            warn!(%source, "application log unreadable");
        }
        rec.finish(result)
    }

    /// Runs the checklist against a log already in memory.
    pub fn validate_blob(&self, blob: &LogBlob, narrator: &mut dyn Narrator) -> StageOutcome {
        let mut rec = Recorder::new(LogKind::Application, narrator);
        let result = evaluate(blob, &mut rec);
        rec.finish(result)
    }
}

fn evaluate(blob: &LogBlob, rec: &mut Recorder<'_>) -> Result<(), CheckError> {
    rec.info(
        Rule::LogPresent,
        format!("Found {} at {}", blob.kind(), blob.path().display()),
    );
    rec.info(
        Rule::LogPresent,
        "Checking Universal Connectivity functionality...",
    );
    blob.ensure_content()?;

    let events = EventExtractor::new(blob);

    if !events.has_marker(Marker::StartupBanner) {
        return Err(CheckError::violation_expecting(
            Rule::StartupBanner,
            "Application startup message not found",
            "Starting Universal Connectivity Application...",
        ));
    }
    rec.pass(Rule::StartupBanner, "Application started successfully");

    check_peer_id(&events, rec)?;

    require(
        &events,
        rec,
        Marker::NodeStarted,
        Rule::NodeStarted,
        "Node startup confirmation not found",
        "Node started successfully",
    )?;
    require(
        &events,
        rec,
        Marker::ListeningOn,
        Rule::ListeningOn,
        "Listening addresses not found",
        "Node listening on addresses",
    )?;

    check_protocol_quorum(&events, rec)?;

    require(
        &events,
        rec,
        Marker::ChatRoomInitialized,
        Rule::ChatRoomInitialized,
        "Chat room initialization not found",
        "Chat room initialized",
    )?;
    require(
        &events,
        rec,
        Marker::ChatRoomJoined,
        Rule::ChatRoomJoined,
        "Chat room join confirmation not found",
        "Successfully joined chat room",
    )?;

    report_enrichment(&events, rec);
    Ok(())
}

fn require(
    events: &EventExtractor<'_>,
    rec: &mut Recorder<'_>,
    marker: Marker,
    rule: Rule,
    missing: &str,
    found: &str,
) -> Result<(), CheckError> {
    if !events.has_marker(marker) {
        return Err(CheckError::violation(rule, missing));
    }
    rec.pass(rule, found);
    Ok(())
}

fn check_peer_id(events: &EventExtractor<'_>, rec: &mut Recorder<'_>) -> Result<(), CheckError> {
    let Some(peer) = events.generated_peer_id() else {
        return Err(CheckError::violation_expecting(
            Rule::PeerIdGenerated,
            "Peer ID not found",
            "[SYSTEM] Generated Peer ID: <peer_id>",
        ));
    };
    peer.validate()
        .map_err(|err| CheckError::violation(Rule::PeerIdGenerated, err.to_string()))?;
    rec.pass(Rule::PeerIdGenerated, format!("Peer ID generated: {peer}"));
    Ok(())
}

fn check_protocol_quorum(
    events: &EventExtractor<'_>,
    rec: &mut Recorder<'_>,
) -> Result<(), CheckError> {
    let found = events.protocol_mentions();
    for protocol in &found {
        let message = match protocol {
            Protocol::Identify | Protocol::Ping => format!("{protocol} protocol detected"),
            Protocol::ChatSubscription | Protocol::Kademlia => format!("{protocol} initialized"),
        };
        rec.pass(Rule::ProtocolQuorum, message);
    }

    let total = Protocol::ALL.len();
    if found.len() < PROTOCOL_QUORUM {
        return Err(CheckError::violation(
            Rule::ProtocolQuorum,
            format!("Insufficient protocols detected ({}/{total})", found.len()),
        ));
    }
    rec.pass(
        Rule::ProtocolQuorum,
        format!(
            "Multiple protocols working together ({}/{total} detected)",
            found.len()
        ),
    );
    Ok(())
}

fn report_enrichment(events: &EventExtractor<'_>, rec: &mut Recorder<'_>) {
    let optional = [
        (
            Marker::Introduction,
            Rule::Introduction,
            "Introduction/welcome message sent",
        ),
        (
            Marker::MessagePublished,
            Rule::MessagePublishing,
            "Message publishing capability verified",
        ),
        (
            Marker::SystemRunning,
            Rule::SystemRunning,
            "System running and operational",
        ),
    ];
    for (marker, rule, message) in optional {
        if events.has_marker(marker) {
            rec.pass(rule, message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::{Finding, Mark};

    const PEER: &str = "12D3KooWD3eckifWpRn9wQpMG9R9hX3sD158z7EqHWmweQAJU5SA";

    fn full_log() -> Vec<String> {
        vec![
            "Starting Universal Connectivity Application...".to_owned(),
            format!("[SYSTEM] Generated Peer ID: {PEER}"),
            "[SYSTEM] Node started successfully".to_owned(),
            "[SYSTEM] Listening on 2 address(es)".to_owned(),
            "[IDENTIFY] Identify protocol enabled".to_owned(),
            "[PING] Ping service ready".to_owned(),
            "[CHAT] Subscribed to topic: universal-connectivity".to_owned(),
            "[DHT] Kademlia DHT bootstrapped".to_owned(),
            "[CHAT] Initializing chat room...".to_owned(),
            "[CHAT] Joined chat room as: student".to_owned(),
        ]
    }

    fn without(lines: &[String], needle: &str) -> Vec<String> {
        lines
            .iter()
            .filter(|l| !l.contains(needle))
            .cloned()
            .collect()
    }

    fn run(lines: &[String]) -> StageOutcome {
        let blob = LogBlob::new(LogKind::Application, "stdout.log", lines.join("\n"));
        ApplicationValidator::new("stdout.log").validate_blob(&blob, &mut Vec::<Finding>::new())
    }

    fn failed_rule(outcome: &StageOutcome) -> Option<Rule> {
        outcome.failure().map(|f| f.rule)
    }

    #[test]
    fn complete_log_passes() {
        let outcome = run(&full_log());
        assert!(outcome.passed, "{:?}", outcome.findings);
        assert!(outcome.mentions(Rule::ChatRoomJoined));
        assert!(!outcome.mentions(Rule::Introduction));
    }

    #[test]
    fn missing_banner_reports_expected_text() {
        let outcome = run(&without(&full_log(), "Starting Universal"));
        assert_eq!(failed_rule(&outcome), Some(Rule::StartupBanner));
        let last = outcome.findings.last().map(|f| (f.mark, f.message.clone()));
        assert_eq!(
            last,
            Some((
                Mark::Info,
                "Expected: 'Starting Universal Connectivity Application...'".to_owned()
            ))
        );
    }

    #[test]
    fn missing_and_invalid_peer_id_fail_differently() {
        let absent = run(&without(&full_log(), "Generated Peer ID"));
        assert_eq!(failed_rule(&absent), Some(Rule::PeerIdGenerated));
        assert_eq!(
            absent.failure().map(|f| f.message.as_str()),
            Some("Peer ID not found")
        );

        // Not id-shaped: reads as absent.
        let mut lines = full_log();
        lines[1] = "[SYSTEM] Generated Peer ID: 12D3KooW!!!".to_owned();
        let garbled = run(&lines);
        assert_eq!(failed_rule(&garbled), Some(Rule::PeerIdGenerated));
        assert_eq!(
            garbled.failure().map(|f| f.message.as_str()),
            Some("Peer ID not found")
        );

        let short = "12D3KooWAAAAAAAAAAAAAAAAAAAAAA";
        lines[1] = format!("[SYSTEM] Generated Peer ID: {short}");
        let invalid = run(&lines);
        assert_eq!(failed_rule(&invalid), Some(Rule::PeerIdGenerated));
        assert_eq!(
            invalid.failure().map(|f| f.message.clone()),
            Some(format!(
                "Peer ID length seems invalid. Expected 45-60 chars, got 30: {short}"
            ))
        );

        let bad_char = format!("{}0", &PEER[..51]);
        lines[1] = format!("[SYSTEM] Generated Peer ID: {bad_char}");
        let invalid = run(&lines);
        assert_eq!(
            invalid.failure().map(|f| f.message.as_str()),
            Some("Invalid character '0' in peer ID. Must be base58 encoded.")
        );
    }

    #[test]
    fn decorated_or_wrapped_peer_id_still_passes() {
        let variants = [
            format!("[SYSTEM] Generated Peer ID: {PEER}\x1b[0m"),
            format!("[SYSTEM] Generated Peer ID: {PEER}."),
            format!("[SYSTEM] Generated Peer ID:\n{PEER}"),
        ];
        for variant in variants {
            let mut lines = full_log();
            lines[1].clone_from(&variant);
            let outcome = run(&lines);
            assert!(outcome.passed, "{variant:?}: {:?}", outcome.failure());
            let expected = Finding::pass(Rule::PeerIdGenerated, format!("Peer ID generated: {PEER}"));
            assert!(outcome.findings.contains(&expected));
        }
    }

    #[test]
    fn gates_fail_in_checklist_order() {
        let cases = [
            ("Node started", Rule::NodeStarted),
            ("Listening on", Rule::ListeningOn),
            ("Initializing chat room", Rule::ChatRoomInitialized),
            ("Joined chat room", Rule::ChatRoomJoined),
        ];
        for (needle, rule) in cases {
            let outcome = run(&without(&full_log(), needle));
            assert_eq!(failed_rule(&outcome), Some(rule), "without {needle}");
        }

        // Two gates missing: the earlier one is reported.
        let both = without(&without(&full_log(), "Node started"), "Joined chat room");
        assert_eq!(failed_rule(&run(&both)), Some(Rule::NodeStarted));
    }

    #[test]
    fn three_of_four_protocols_is_enough() {
        for needle in ["[IDENTIFY]", "[PING]", "Subscribed to topic", "[DHT]"] {
            let outcome = run(&without(&full_log(), needle));
            assert!(outcome.passed, "quorum should hold without {needle}");
            assert!(outcome
                .findings
                .iter()
                .any(|f| f.message == "Multiple protocols working together (3/4 detected)"));
        }
    }

    #[test]
    fn two_of_four_protocols_fails_quorum() {
        let lines = without(&without(&full_log(), "[PING]"), "[DHT]");
        let outcome = run(&lines);
        assert_eq!(failed_rule(&outcome), Some(Rule::ProtocolQuorum));
        assert_eq!(
            outcome.failure().map(|f| f.message.as_str()),
            Some("Insufficient protocols detected (2/4)")
        );
        assert!(!outcome.mentions(Rule::ChatRoomInitialized));
    }

    #[test]
    fn enrichment_only_adds_findings() {
        let mut lines = full_log();
        lines.push("[CHAT] student has joined the conversation".to_owned());
        lines.push("[CHAT] Publishing message to universal-connectivity".to_owned());
        lines.push("[SYSTEM] Running. Listening for messages...".to_owned());
        let outcome = run(&lines);
        assert!(outcome.passed);
        for rule in [Rule::Introduction, Rule::MessagePublishing, Rule::SystemRunning] {
            assert!(outcome.mentions(rule), "{rule}");
        }
    }

    #[test]
    fn whitespace_log_fails_as_empty() {
        let outcome = run(&["".to_owned(), "   ".to_owned()]);
        assert_eq!(failed_rule(&outcome), Some(Rule::LogNotEmpty));
    }
}
