// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Log text builders.
//!
//! # Example
//!
//! ```
//! use uc_check_dry_tests::logs::{AppLine, ApplicationLogBuilder, CounterpartLogBuilder};
//! use uc_check_dry_tests::peers::APPLICATION_PEER_ID;
//!
//! let app = ApplicationLogBuilder::new()
//!     .without(AppLine::Ping)
//!     .with(AppLine::Running)
//!     .build();
//! assert!(!app.contains("[PING]"));
//!
//! let checker = CounterpartLogBuilder::new()
//!     .connected(APPLICATION_PEER_ID)
//!     .build();
//! assert!(checker.starts_with("connected,12D3KooW"));
//! ```

use crate::peers::{APPLICATION_PEER_ID, CHECKER_PEER_ID};

/// One line the application prints during a healthy run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppLine {
    /// Startup banner.
    Banner,
    /// Generated peer id.
    PeerId,
    /// Node started.
    NodeStarted,
    /// Listening address count.
    Listening,
    /// Identify protocol.
    Identify,
    /// Ping protocol.
    Ping,
    /// Chat topic subscription.
    ChatSubscribed,
    /// Kademlia bootstrap.
    Dht,
    /// Chat room initialising.
    ChatInit,
    /// Chat room joined.
    ChatJoined,
    /// Introduction message (optional).
    Introduction,
    /// Message published (optional).
    Publish,
    /// Running status (optional).
    Running,
}

impl AppLine {
    /// Every line, in the order the application prints them.
    pub const ALL: [AppLine; 13] = [
        AppLine::Banner,
        AppLine::PeerId,
        AppLine::NodeStarted,
        AppLine::Listening,
        AppLine::Identify,
        AppLine::Ping,
        AppLine::ChatSubscribed,
        AppLine::Dht,
        AppLine::ChatInit,
        AppLine::ChatJoined,
        AppLine::Introduction,
        AppLine::Publish,
        AppLine::Running,
    ];

    /// `true` for lines a passing log must contain.
    pub const fn is_required(self) -> bool {
        !matches!(self, Self::Introduction | Self::Publish | Self::Running)
    }

    fn render(self, peer_id: &str) -> String {
        match self {
            Self::Banner => "Starting Universal Connectivity Application...".to_owned(),
            Self::PeerId => format!("[SYSTEM] Generated Peer ID: {peer_id}"),
            Self::NodeStarted => "[SYSTEM] Node started successfully".to_owned(),
            Self::Listening => "[SYSTEM] Listening on 2 address(es)".to_owned(),
            Self::Identify => "[IDENTIFY] Identify protocol enabled".to_owned(),
            Self::Ping => "[PING] Ping service ready".to_owned(),
            Self::ChatSubscribed => "[CHAT] Subscribed to topic: universal-connectivity".to_owned(),
            Self::Dht => "[DHT] Kademlia DHT bootstrapped".to_owned(),
            Self::ChatInit => "[CHAT] Initializing chat room...".to_owned(),
            Self::ChatJoined => "[CHAT] Joined chat room as: student".to_owned(),
            Self::Introduction => "[CHAT] student has joined the conversation".to_owned(),
            Self::Publish => "[CHAT] Publishing message to universal-connectivity".to_owned(),
            Self::Running => "[SYSTEM] Running. Listening for messages...".to_owned(),
        }
    }
}

/// Builds `stdout.log` text. Starts with every required line.
#[derive(Debug, Clone)]
pub struct ApplicationLogBuilder {
    lines: Vec<AppLine>,
    peer_id: String,
    extra: Vec<String>,
}

impl Default for ApplicationLogBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ApplicationLogBuilder {
    /// Every required line, no optional ones.
    pub fn new() -> Self {
        Self {
            lines: AppLine::ALL
                .into_iter()
                .filter(|line| line.is_required())
                .collect(),
            peer_id: APPLICATION_PEER_ID.to_owned(),
            extra: Vec::new(),
        }
    }

    /// Every line, optional ones included.
    pub fn complete() -> Self {
        Self {
            lines: AppLine::ALL.to_vec(),
            ..Self::new()
        }
    }

    /// Drops `line`.
    pub fn without(mut self, line: AppLine) -> Self {
        self.lines.retain(|l| *l != line);
        self
    }

    /// Adds `line` in its usual position.
    pub fn with(mut self, line: AppLine) -> Self {
        if !self.lines.contains(&line) {
            self.lines.push(line);
            self.lines
                .sort_by_key(|l| AppLine::ALL.iter().position(|a| a == l));
        }
        self
    }

    /// Replaces the id printed by [`AppLine::PeerId`].
    pub fn peer_id(mut self, id: impl Into<String>) -> Self {
        self.peer_id = id.into();
        self
    }

    /// Appends a raw line after the structured ones.
    pub fn line(mut self, text: impl Into<String>) -> Self {
        self.extra.push(text.into());
        self
    }

    /// Newline-terminated log text.
    pub fn build(&self) -> String {
        let mut out = String::new();
        let rendered = self.lines.iter().map(|l| l.render(&self.peer_id));
        for line in rendered.chain(self.extra.iter().cloned()) {
            out.push_str(&line);
            out.push('\n');
        }
        out
    }
}

/// Builds `checker.log` CSV text. Starts empty.
#[derive(Debug, Clone, Default)]
pub struct CounterpartLogBuilder {
    lines: Vec<String>,
}

impl CounterpartLogBuilder {
    /// No lines.
    pub fn new() -> Self {
        Self::default()
    }

    /// A checker that started, saw the application connect and subscribe.
    pub fn ready() -> Self {
        Self::new()
            .listening(&format!("/ip4/127.0.0.1/tcp/9092/p2p/{CHECKER_PEER_ID}"))
            .connected(APPLICATION_PEER_ID)
            .subscribed(APPLICATION_PEER_ID)
    }

    /// `listening,<addr>`.
    pub fn listening(self, addr: &str) -> Self {
        self.line(format!("listening,{addr}"))
    }

    /// `connected,<peer>,<addr>`.
    pub fn connected(self, peer: &str) -> Self {
        self.line(format!("connected,{peer},/ip4/127.0.0.1/tcp/9091"))
    }

    /// `subscribe,<peer>,universal-connectivity`.
    pub fn subscribed(self, peer: &str) -> Self {
        self.line(format!("subscribe,{peer},universal-connectivity"))
    }

    /// `msg,<peer>,universal-connectivity,<body>`.
    pub fn message(self, peer: &str, body: &str) -> Self {
        self.line(format!("msg,{peer},universal-connectivity,{body}"))
    }

    /// `error,<detail>`.
    pub fn error(self, detail: &str) -> Self {
        self.line(format!("error,{detail}"))
    }

    /// A raw line.
    pub fn line(mut self, text: impl Into<String>) -> Self {
        self.lines.push(text.into());
        self
    }

    /// Newline-terminated log text.
    pub fn build(&self) -> String {
        let mut out = self.lines.join("\n");
        if !out.is_empty() {
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_application_log_has_only_required_lines() {
        let log = ApplicationLogBuilder::new().build();
        assert_eq!(log.lines().count(), 10);
        assert!(!log.contains("Running"));
    }

    #[test]
    fn with_keeps_print_order() {
        let log = ApplicationLogBuilder::new()
            .without(AppLine::Banner)
            .with(AppLine::Banner)
            .build();
        assert!(log.starts_with("Starting Universal Connectivity Application"));
    }

    #[test]
    fn required_lines_avoid_foreign_protocol_words() {
        // Each protocol word appears only on its own line.
        for (line, word) in [
            (AppLine::Identify, "identify"),
            (AppLine::Ping, "ping"),
            (AppLine::Dht, "kad"),
        ] {
            let log = ApplicationLogBuilder::complete()
                .without(line)
                .build()
                .to_lowercase();
            assert!(!log.contains(word), "{word} leaked outside its line");
        }
    }

    #[test]
    fn empty_counterpart_builds_empty_text() {
        assert_eq!(CounterpartLogBuilder::new().build(), "");
        assert_eq!(CounterpartLogBuilder::ready().build().lines().count(), 3);
    }
}
