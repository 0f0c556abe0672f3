// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Plain-text narrative on standard output.

use uc_check::{Finding, LogKind, Narrator};

const RULE_WIDTH: usize = 60;

/// Prints one line per finding, with stage headers and separators.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutNarrator;

impl StdoutNarrator {
    fn rule(ch: char) {
        println!("i {}", ch.to_string().repeat(RULE_WIDTH));
    }
}

const fn stage_title(stage: LogKind) -> &'static str {
    match stage {
        LogKind::Counterpart => "Checker Application",
        LogKind::Application => "Student Application",
    }
}

impl Narrator for StdoutNarrator {
    fn begin(&mut self) {
        println!("i Checking Final Checkpoint - Universal Connectivity");
        Self::rule('=');
    }

    fn stage_started(&mut self, index: usize, stage: LogKind) {
        println!("\ni Step {index}: Validating {}", stage_title(stage));
        Self::rule('-');
    }

    fn summary_started(&mut self) {
        Self::rule('=');
    }

    fn finding(&mut self, finding: &Finding) {
        println!("{finding}");
    }
}
