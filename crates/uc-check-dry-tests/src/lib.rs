// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared log fixtures for uc-check tests.
#![forbid(unsafe_code)]
//!
//! # Modules
//!
//! - [`peers`] - Sample peer identifiers, valid and boundary-length
//! - [`logs`] - Builders for checker and application log text
//! - [`workdir`] - Temporary working directories holding both logs

pub mod logs;
pub mod peers;
pub mod workdir;

pub use logs::{AppLine, ApplicationLogBuilder, CounterpartLogBuilder};
pub use peers::{peer_id_of_len, APPLICATION_PEER_ID, CHECKER_PEER_ID};
pub use workdir::LogDir;
