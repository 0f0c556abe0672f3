// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Rule outcomes, stage results and the narrative port.
//!
//! Every rule evaluation produces a [`Finding`]. Findings are forwarded to a
//! [`Narrator`] as they happen and collected into a [`StageOutcome`]; the
//! orchestrator folds stage outcomes into one [`Verdict`].
//!
//! A [`Mark`] is not a severity: `Info` lines carry context (error lines in
//! the checker log, listening addresses), `Pass` lines report a satisfied
//! rule, and only `Fail` affects the verdict.

use std::fmt;

use tracing::{debug, info};

use crate::error::CheckError;
use crate::log::LogKind;

/// How a single finding reads in the narrative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Mark {
    /// Context only; never affects the verdict.
    Info,
    /// A rule was satisfied.
    Pass,
    /// A required rule was violated.
    Fail,
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "i"),
            Self::Pass => write!(f, "+"),
            Self::Fail => write!(f, "X"),
        }
    }
}

/// Identifies the rule a finding belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rule {
    // ─── Presence ────────────────────────────────────────────────────────────
    /// The log file exists.
    LogPresent,
    /// The log file holds non-whitespace content.
    LogNotEmpty,
    /// The log file could be read.
    LogReadable,

    // ─── Checker log ─────────────────────────────────────────────────────────
    /// Lines mentioning `error` (informational).
    ErrorScan,
    /// `listening,` lines printed at checker startup (informational).
    CheckerListening,
    /// At least one `connected` or `subscribe` event.
    Readiness,
    /// The `connected` event carries a valid peer id.
    ConnectedPeer,
    /// A `subscribe` event on the chat topic (optional).
    SubscribedPeer,
    /// A `msg` event on the chat topic (optional).
    MessageSeen,

    // ─── Application log ─────────────────────────────────────────────────────
    /// Startup banner.
    StartupBanner,
    /// Generated peer id marker with a valid id.
    PeerIdGenerated,
    /// Node-started marker.
    NodeStarted,
    /// Listening-address marker.
    ListeningOn,
    /// At least three of the four protocol mentions.
    ProtocolQuorum,
    /// Chat room initialisation marker.
    ChatRoomInitialized,
    /// Chat room join marker.
    ChatRoomJoined,
    /// Introduction or welcome message (optional).
    Introduction,
    /// Message publishing confirmation (optional).
    MessagePublishing,
    /// Running / listening-for-messages marker (optional).
    SystemRunning,

    // ─── Orchestrator ────────────────────────────────────────────────────────
    /// Stage and overall verdict lines.
    Verdict,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::LogPresent => "LOG_PRESENT",
            Self::LogNotEmpty => "LOG_NOT_EMPTY",
            Self::LogReadable => "LOG_READABLE",
            Self::ErrorScan => "ERROR_SCAN",
            Self::CheckerListening => "CHECKER_LISTENING",
            Self::Readiness => "READINESS",
            Self::ConnectedPeer => "CONNECTED_PEER",
            Self::SubscribedPeer => "SUBSCRIBED_PEER",
            Self::MessageSeen => "MESSAGE_SEEN",
            Self::StartupBanner => "STARTUP_BANNER",
            Self::PeerIdGenerated => "PEER_ID_GENERATED",
            Self::NodeStarted => "NODE_STARTED",
            Self::ListeningOn => "LISTENING_ON",
            Self::ProtocolQuorum => "PROTOCOL_QUORUM",
            Self::ChatRoomInitialized => "CHAT_ROOM_INITIALIZED",
            Self::ChatRoomJoined => "CHAT_ROOM_JOINED",
            Self::Introduction => "INTRODUCTION",
            Self::MessagePublishing => "MESSAGE_PUBLISHING",
            Self::SystemRunning => "SYSTEM_RUNNING",
            Self::Verdict => "VERDICT",
        };
        write!(f, "{s}")
    }
}

/// One line of diagnostic output tied to the rule that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// Producing rule.
    pub rule: Rule,
    /// Narrative mark.
    pub mark: Mark,
    /// Human-readable text, without the mark.
    pub message: String,
}

impl Finding {
    /// Creates a finding.
    pub fn new(rule: Rule, mark: Mark, message: impl Into<String>) -> Self {
        Self {
            rule,
            mark,
            message: message.into(),
        }
    }

    /// Informational finding.
    pub fn info(rule: Rule, message: impl Into<String>) -> Self {
        Self::new(rule, Mark::Info, message)
    }

    /// Satisfied-rule finding.
    pub fn pass(rule: Rule, message: impl Into<String>) -> Self {
        Self::new(rule, Mark::Pass, message)
    }

    /// Violated-rule finding.
    pub fn fail(rule: Rule, message: impl Into<String>) -> Self {
        Self::new(rule, Mark::Fail, message)
    }

    /// `false` only for [`Mark::Fail`].
    pub fn passed(&self) -> bool {
        self.mark != Mark::Fail
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.mark, self.message)
    }
}

/// Result of validating one log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageOutcome {
    /// Which log was validated.
    pub stage: LogKind,
    /// Findings in evaluation order.
    pub findings: Vec<Finding>,
    /// `true` when every required gate held.
    pub passed: bool,
}

impl StageOutcome {
    /// The failing finding, if the stage failed on a gate.
    pub fn failure(&self) -> Option<&Finding> {
        self.findings.iter().find(|f| f.mark == Mark::Fail)
    }

    /// `true` if any finding belongs to `rule`.
    pub fn mentions(&self, rule: Rule) -> bool {
        self.findings.iter().any(|f| f.rule == rule)
    }
}

/// Overall result of a checker run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    /// Stages that ran, in order. A failed counterpart stage means the
    /// application stage never ran.
    pub stages: Vec<StageOutcome>,
    /// Closing lines emitted by the orchestrator.
    pub closing: Vec<Finding>,
    /// The single pass/fail answer.
    pub passed: bool,
}

impl Verdict {
    /// The boolean verdict.
    pub fn passed(&self) -> bool {
        self.passed
    }

    /// Process exit status for this verdict: `0` on pass, `1` otherwise.
    pub fn exit_code(&self) -> u8 {
        u8::from(!self.passed)
    }

    /// Outcome of `stage`, if it ran.
    pub fn stage(&self, stage: LogKind) -> Option<&StageOutcome> {
        self.stages.iter().find(|s| s.stage == stage)
    }

    /// Every finding, stage by stage, then the closing lines.
    pub fn findings(&self) -> impl Iterator<Item = &Finding> {
        self.stages
            .iter()
            .flat_map(|s| s.findings.iter())
            .chain(self.closing.iter())
    }
}

/// Receives the narrative in call order.
///
/// Only [`Narrator::finding`] is required; the structural hooks let a
/// renderer print headers and separators.
pub trait Narrator {
    /// A checker run is starting.
    fn begin(&mut self) {}
    /// Stage `index` (1-based) is starting.
    fn stage_started(&mut self, _index: usize, _stage: LogKind) {}
    /// Both stages passed; the closing summary follows.
    fn summary_started(&mut self) {}
    /// A finding was produced.
    fn finding(&mut self, finding: &Finding);
}

impl Narrator for Vec<Finding> {
    fn finding(&mut self, finding: &Finding) {
        self.push(finding.clone());
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl Narrator for Silent {
    fn finding(&mut self, _finding: &Finding) {}
}

/// Collects one stage's findings while forwarding them to a narrator.
pub(crate) struct Recorder<'n> {
    stage: LogKind,
    findings: Vec<Finding>,
    narrator: &'n mut dyn Narrator,
}

impl<'n> Recorder<'n> {
    pub(crate) fn new(stage: LogKind, narrator: &'n mut dyn Narrator) -> Self {
        Self {
            stage,
            findings: Vec::new(),
            narrator,
        }
    }

    pub(crate) fn record(&mut self, finding: Finding) {
        debug!(stage = ?self.stage, rule = %finding.rule, mark = %finding.mark, "{}", finding.message);
        self.narrator.finding(&finding);
        self.findings.push(finding);
    }

    pub(crate) fn info(&mut self, rule: Rule, message: impl Into<String>) {
        self.record(Finding::info(rule, message));
    }

    pub(crate) fn pass(&mut self, rule: Rule, message: impl Into<String>) {
        self.record(Finding::pass(rule, message));
    }

    /// Closes the stage. An error becomes its failure findings.
    pub(crate) fn finish(mut self, result: Result<(), CheckError>) -> StageOutcome {
        let passed = match result {
            Ok(()) => true,
            Err(err) => {
                for finding in err.findings() {
                    self.record(finding);
                }
                false
            }
        };
        info!(stage = ?self.stage, passed, findings = self.findings.len(), "stage finished");
        StageOutcome {
            stage: self.stage,
            findings: self.findings,
            passed,
        }
    }
}
