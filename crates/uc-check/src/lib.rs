// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Acceptance rules for the Universal Connectivity final checkpoint.
//!
//! A run inspects two logs left behind by a previous peer-to-peer session:
//! the checker's CSV event log (`checker.log`) and the application's
//! free-text output (`stdout.log`). Each log goes through an ordered battery
//! of pattern rules; the outcome is a [`Verdict`] plus the narrative of every
//! rule evaluated.
//!
//! # Modules
//!
//! - [`peer_id`]: peer identifier format validation
//! - [`extract`]: pattern queries over log text
//! - [`counterpart`]: checker log stage
//! - [`application`]: application log stage
//! - [`orchestrator`]: runs both stages, produces the verdict
//! - [`outcome`]: findings, verdicts and the [`Narrator`] port
//! - [`config`]: input locations
//!
//! # Example
//!
//! ```no_run
//! use uc_check::{CheckConfig, CheckOrchestrator, Finding};
//!
//! let mut narrative: Vec<Finding> = Vec::new();
//! let verdict = CheckOrchestrator::new(CheckConfig::in_dir("run")).run(&mut narrative);
//! std::process::exit(i32::from(verdict.exit_code()));
//! ```

pub mod application;
pub mod config;
pub mod counterpart;
pub mod error;
pub mod extract;
pub mod log;
pub mod orchestrator;
pub mod outcome;
pub mod peer_id;

pub use application::ApplicationValidator;
pub use config::{CheckConfig, ConfigError};
pub use counterpart::CounterpartValidator;
pub use error::CheckError;
pub use extract::{EventExtractor, Fact, Marker, Protocol};
pub use log::{LogBlob, LogKind};
pub use orchestrator::CheckOrchestrator;
pub use outcome::{Finding, Mark, Narrator, Rule, Silent, StageOutcome, Verdict};
pub use peer_id::{PeerId, PeerIdError};
