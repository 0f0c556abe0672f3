// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Two-stage run: checker log, then application log.
//!
//! The application stage only runs when the checker stage passed. Stage
//! faults arrive here already converted into findings, so [`CheckOrchestrator::run`]
//! is infallible; its [`Verdict`] is the only answer a caller needs.

use tracing::{info, instrument};

use crate::application::ApplicationValidator;
use crate::config::CheckConfig;
use crate::counterpart::CounterpartValidator;
use crate::log::LogKind;
use crate::outcome::{Finding, Narrator, Rule, StageOutcome, Verdict};

const SUMMARY: [&str; 5] = [
    "You have successfully:",
    "- Integrated the libp2p protocols (TCP, Ping, Identify, Gossipsub, DHT)",
    "- Joined the universal-connectivity chat room",
    "- Connected to and communicated with the checker peer",
    "- Built a working Universal Connectivity application",
];

/// Runs both stages under one configuration.
#[derive(Debug, Clone)]
pub struct CheckOrchestrator {
    config: CheckConfig,
}

impl CheckOrchestrator {
    /// Orchestrator for `config`.
    pub fn new(config: CheckConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    pub fn config(&self) -> &CheckConfig {
        &self.config
    }

    /// Validates both logs and streams every finding to `narrator`.
    #[instrument(skip_all, fields(workdir = %self.config.workdir.display()))]
    pub fn run(&self, narrator: &mut dyn Narrator) -> Verdict {
        narrator.begin();
        let mut stages = Vec::with_capacity(LogKind::ALL.len());

        narrator.stage_started(1, LogKind::Counterpart);
        let counterpart = CounterpartValidator::new(self.config.counterpart_path())
            .with_error_preview(self.config.error_preview)
            .validate(narrator);
        if let Some(verdict) = stop_if_failed(
            counterpart,
            &mut stages,
            "Checker validation failed",
            narrator,
        ) {
            return verdict;
        }

        narrator.stage_started(2, LogKind::Application);
        let application =
            ApplicationValidator::new(self.config.application_path()).validate(narrator);
        if let Some(verdict) = stop_if_failed(
            application,
            &mut stages,
            "Student application validation failed",
            narrator,
        ) {
            return verdict;
        }

        narrator.summary_started();
        let mut closing = vec![Finding::pass(
            Rule::Verdict,
            "Final Checkpoint completed successfully!",
        )];
        closing.extend(SUMMARY.iter().map(|line| Finding::info(Rule::Verdict, *line)));
        for finding in &closing {
            narrator.finding(finding);
        }
        info!(passed = true, "checkpoint verdict");
        Verdict {
            stages,
            closing,
            passed: true,
        }
    }
}

fn stop_if_failed(
    outcome: StageOutcome,
    stages: &mut Vec<StageOutcome>,
    message: &str,
    narrator: &mut dyn Narrator,
) -> Option<Verdict> {
    let passed = outcome.passed;
    stages.push(outcome);
    if passed {
        return None;
    }
    let closing = Finding::fail(Rule::Verdict, message);
    narrator.finding(&closing);
    info!(passed = false, "checkpoint verdict");
    Some(Verdict {
        stages: std::mem::take(stages),
        closing: vec![closing],
        passed: false,
    })
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use std::fs;
    use std::path::Path;

    use super::*;
    use crate::outcome::Mark;

    const PEER: &str = "12D3KooWD3eckifWpRn9wQpMG9R9hX3sD158z7EqHWmweQAJU5SA";

    fn write(dir: &Path, name: &str, text: &str) {
        fs::write(dir.join(name), text).expect("write log");
    }

    fn application_log() -> String {
        format!(
            "Starting Universal Connectivity Application...\n\
             [SYSTEM] Generated Peer ID: {PEER}\n\
             [SYSTEM] Node started successfully\n\
             [SYSTEM] Listening on 1 address(es)\n\
             [IDENTIFY] Identify protocol enabled\n\
             [PING] Ping service ready\n\
             [CHAT] Subscribed to topic: universal-connectivity\n\
             [CHAT] Initializing chat room...\n\
             [CHAT] Joined chat room as: student\n"
        )
    }

    fn run_in(dir: &Path) -> Verdict {
        CheckOrchestrator::new(CheckConfig::in_dir(dir)).run(&mut Vec::<Finding>::new())
    }

    #[derive(Default)]
    struct Trace {
        events: Vec<String>,
    }

    impl Narrator for Trace {
        fn begin(&mut self) {
            self.events.push("begin".to_owned());
        }
        fn stage_started(&mut self, index: usize, stage: LogKind) {
            self.events.push(format!("stage {index} {stage}"));
        }
        fn summary_started(&mut self) {
            self.events.push("summary".to_owned());
        }
        fn finding(&mut self, finding: &Finding) {
            self.events.push(finding.to_string());
        }
    }

    #[test]
    fn failed_checker_stage_skips_application() {
        let dir = tempfile::tempdir().expect("tempdir");
        write(dir.path(), "checker.log", "");
        write(dir.path(), "stdout.log", &application_log());

        let mut trace = Trace::default();
        let verdict = CheckOrchestrator::new(CheckConfig::in_dir(dir.path())).run(&mut trace);

        assert!(!verdict.passed());
        assert_eq!(verdict.exit_code(), 1);
        assert_eq!(verdict.stages.len(), 1);
        assert!(verdict.stage(LogKind::Application).is_none());
        assert!(!trace.events.iter().any(|e| e.starts_with("stage 2")));
        assert_eq!(
            trace.events.last().map(String::as_str),
            Some("X Checker validation failed")
        );
    }

    #[test]
    fn both_stages_pass_with_summary() {
        let dir = tempfile::tempdir().expect("tempdir");
        write(dir.path(), "checker.log", &format!("connected,{PEER},\n"));
        write(dir.path(), "stdout.log", &application_log());

        let mut trace = Trace::default();
        let verdict = CheckOrchestrator::new(CheckConfig::in_dir(dir.path())).run(&mut trace);

        assert!(verdict.passed(), "{:?}", trace.events);
        assert_eq!(verdict.exit_code(), 0);
        assert_eq!(verdict.stages.len(), 2);
        assert_eq!(verdict.closing[0].mark, Mark::Pass);
        assert_eq!(trace.events[0], "begin");
        assert_eq!(trace.events[1], "stage 1 checker log");
        assert!(trace.events.contains(&"stage 2 application log".to_owned()));
        assert!(trace.events.contains(&"summary".to_owned()));
        assert!(verdict.findings().all(Finding::passed));
    }

    #[test]
    fn application_failure_is_reported_last() {
        let dir = tempfile::tempdir().expect("tempdir");
        write(dir.path(), "checker.log", &format!("connected,{PEER},\n"));
        write(
            dir.path(),
            "stdout.log",
            &application_log().replace("[CHAT] Joined chat room as: student\n", ""),
        );

        let verdict = run_in(dir.path());
        assert!(!verdict.passed());
        let app = verdict.stage(LogKind::Application).expect("application stage ran");
        assert_eq!(app.failure().map(|f| f.rule), Some(Rule::ChatRoomJoined));
        assert_eq!(
            verdict.closing[0].message,
            "Student application validation failed"
        );
    }

    #[test]
    fn invalid_utf8_is_a_failure_not_a_panic() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("checker.log"), [0xff, 0xfe, 0x00]).expect("write");

        let verdict = run_in(dir.path());
        assert!(!verdict.passed());
        let checker = verdict.stage(LogKind::Counterpart).expect("checker stage ran");
        assert_eq!(checker.failure().map(|f| f.rule), Some(Rule::LogReadable));
    }
}
