// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `uc-check`: validates the logs of a Universal Connectivity checkpoint run.
//!
//! # Usage
//! ```text
//! uc-check [--dir <DIR>] [--config <FILE>] [--checker-log <PATH>] [--stdout-log <PATH>] [-v...]
//! ```
//!
//! The narrative goes to standard output, diagnostics to standard error. The
//! process exits with `0` when every rule holds and `1` otherwise.

// The CLI is expected to print to stdout/stderr.
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod narrator;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Parser};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use uc_check::{CheckConfig, CheckOrchestrator};

use crate::narrator::StdoutNarrator;

#[derive(Parser, Debug)]
#[command(author, version, about = "Universal Connectivity final checkpoint checker")]
struct Args {
    /// JSON config file; flags below override its fields.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Directory holding the logs (default: current directory).
    #[arg(long)]
    dir: Option<PathBuf>,
    /// Checker log path, relative to the directory unless absolute.
    #[arg(long)]
    checker_log: Option<PathBuf>,
    /// Application log path, relative to the directory unless absolute.
    #[arg(long)]
    stdout_log: Option<PathBuf>,
    /// Raise diagnostic verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn resolve_config(&self) -> Result<CheckConfig> {
        let mut config = match &self.config {
            Some(path) => CheckConfig::load(path)
                .with_context(|| format!("load config {}", path.display()))?,
            None => CheckConfig::default(),
        };
        if let Some(dir) = &self.dir {
            config.workdir.clone_from(dir);
        }
        if let Some(path) = &self.checker_log {
            config.counterpart_log.clone_from(path);
        }
        if let Some(path) = &self.stdout_log {
            config.application_log.clone_from(path);
        }
        Ok(config)
    }
}

fn init_tracing(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("install tracing subscriber")
}

fn run(args: &Args) -> Result<u8> {
    init_tracing(args.verbose)?;
    let config = args.resolve_config()?;
    debug!(?config, "resolved config");
    let verdict = CheckOrchestrator::new(config).run(&mut StdoutNarrator);
    Ok(verdict.exit_code())
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            // `--help` and `--version` arrive here too and are not failures.
            let code = if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
            let _ = err.print();
            return code;
        }
    };
    match run(&args) {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            println!("X Unexpected error during checking: {err:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let args = Args::parse_from([
            "uc-check",
            "--dir",
            "run",
            "--stdout-log",
            "/abs/app.log",
        ]);
        let config = args.resolve_config().expect("config");
        assert_eq!(config.counterpart_path(), PathBuf::from("run/checker.log"));
        assert_eq!(config.application_path(), PathBuf::from("/abs/app.log"));
    }

    #[test]
    fn verbosity_counts() {
        let args = Args::parse_from(["uc-check", "-vv"]);
        assert_eq!(args.verbose, 2);
    }
}
