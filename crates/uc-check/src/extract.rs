// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Fact extraction from free-text logs.
//!
//! [`EventExtractor`] answers one question per pattern. Patterns are
//! independent and side-effect free; a pattern that does not match yields
//! `None` or `false`, never an error. Where a pattern captures a payload only
//! its first match in the whole log is used.
//!
//! # Pattern families
//!
//! - **CSV events** (checker log): line-anchored `tag,peerId,...` records for
//!   `connected`, `subscribe`, `msg` and `listening`.
//! - **Free-text markers** (application log): startup banner, generated peer
//!   id, node/listening status, protocol mentions, chat lifecycle markers and
//!   optional enrichment markers.
//!
//! # Example
//!
//! ```
//! use uc_check::extract::{EventExtractor, Protocol};
//!
//! let log = "[PING] ping to peer ok\n[DHT] Kademlia bootstrap done\n";
//! let events = EventExtractor::from_text(log);
//! assert_eq!(events.protocol_mentions(), vec![Protocol::Ping, Protocol::Kademlia]);
//! assert!(events.connected_peer().is_none());
//! ```

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::log::LogBlob;
use crate::peer_id::PeerId;

/// Gossipsub topic both peers chat on.
pub const CHAT_TOPIC: &str = "universal-connectivity";

/// A regular expression compiled on first use.
struct Pattern {
    source: &'static str,
    compiled: OnceLock<Regex>,
}

impl Pattern {
    const fn new(source: &'static str) -> Self {
        Self {
            source,
            compiled: OnceLock::new(),
        }
    }

    // Sources are literals below; `every_pattern_compiles` covers them all.
    #[allow(clippy::expect_used)]
    fn regex(&self) -> &Regex {
        self.compiled
            .get_or_init(|| Regex::new(self.source).expect("built-in pattern must compile"))
    }

    fn is_match(&self, text: &str) -> bool {
        self.regex().is_match(text)
    }

    fn first_capture<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.regex()
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }
}

// ─── CSV events ──────────────────────────────────────────────────────────────
static CONNECTED: Pattern = Pattern::new(r"(?m)^connected,(12D3KooW[A-Za-z0-9]+),");
static SUBSCRIBED: Pattern =
    Pattern::new(r"(?m)^subscribe,(12D3KooW[A-Za-z0-9]+),universal-connectivity");
static MESSAGE: Pattern = Pattern::new(r"(?m)^msg,(12D3KooW[A-Za-z0-9]+),universal-connectivity,");

const LISTENING_TAG: &str = "listening,";

// ─── Free-text markers ───────────────────────────────────────────────────────
static STARTUP_BANNER: Pattern = Pattern::new(r"Starting Universal Connectivity Application");
// The id may wrap onto the next line; trailing colour codes or punctuation
// are not part of the capture.
static GENERATED_PEER_ID: Pattern =
    Pattern::new(r"\[SYSTEM\] Generated Peer ID:\s*(12D3KooW[A-Za-z0-9]+)");
static NODE_STARTED: Pattern = Pattern::new(r"\[SYSTEM\] Node started successfully");
static LISTENING_ON: Pattern = Pattern::new(r"\[SYSTEM\] Listening on \d+ address\(es\)");
static CHAT_INITIALIZING: Pattern = Pattern::new(r"\[CHAT\].*Initializing chat room");
static CHAT_JOINED: Pattern = Pattern::new(r"\[CHAT\] Joined chat room as:");
static INTRODUCTION: Pattern = Pattern::new(r"(?i)ready to chat|has joined|introduction|hello");
static PUBLISHING: Pattern = Pattern::new(r"\[CHAT\].*Publishing message|Message sent");
static RUNNING: Pattern = Pattern::new(r"\[SYSTEM\].*Running|Listening for messages");

static IDENTIFY: Pattern = Pattern::new(r"(?i)identify");
static PING: Pattern = Pattern::new(r"(?i)ping");
static CHAT_SUBSCRIBED: Pattern = Pattern::new(r"\[CHAT\].*Subscribed to topic");
static KADEMLIA: Pattern = Pattern::new(r"(?i)\[DHT\].*Kademlia|kad");

/// Protocols whose initialisation the application log should mention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Protocol {
    /// libp2p Identify.
    Identify,
    /// libp2p Ping.
    Ping,
    /// Gossipsub, seen through the chat topic subscription.
    ChatSubscription,
    /// Kademlia DHT.
    Kademlia,
}

impl Protocol {
    /// All protocols, in report order.
    pub const ALL: [Protocol; 4] = [
        Protocol::Identify,
        Protocol::Ping,
        Protocol::ChatSubscription,
        Protocol::Kademlia,
    ];

    fn pattern(self) -> &'static Pattern {
        match self {
            Self::Identify => &IDENTIFY,
            Self::Ping => &PING,
            Self::ChatSubscription => &CHAT_SUBSCRIBED,
            Self::Kademlia => &KADEMLIA,
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identify => write!(f, "Identify"),
            Self::Ping => write!(f, "Ping"),
            Self::ChatSubscription => write!(f, "Gossipsub (Chat)"),
            Self::Kademlia => write!(f, "Kademlia DHT"),
        }
    }
}

/// Fixed textual markers in the application log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Marker {
    /// `Starting Universal Connectivity Application`.
    StartupBanner,
    /// `[SYSTEM] Node started successfully`.
    NodeStarted,
    /// `[SYSTEM] Listening on N address(es)`.
    ListeningOn,
    /// `[CHAT] ... Initializing chat room`.
    ChatRoomInitialized,
    /// `[CHAT] Joined chat room as:`.
    ChatRoomJoined,
    /// Introduction or welcome text (optional).
    Introduction,
    /// Publish / send confirmation (optional).
    MessagePublished,
    /// Running / listening-for-messages status (optional).
    SystemRunning,
}

impl Marker {
    /// All markers, in checklist order.
    pub const ALL: [Marker; 8] = [
        Marker::StartupBanner,
        Marker::NodeStarted,
        Marker::ListeningOn,
        Marker::ChatRoomInitialized,
        Marker::ChatRoomJoined,
        Marker::Introduction,
        Marker::MessagePublished,
        Marker::SystemRunning,
    ];

    fn pattern(self) -> &'static Pattern {
        match self {
            Self::StartupBanner => &STARTUP_BANNER,
            Self::NodeStarted => &NODE_STARTED,
            Self::ListeningOn => &LISTENING_ON,
            Self::ChatRoomInitialized => &CHAT_INITIALIZING,
            Self::ChatRoomJoined => &CHAT_JOINED,
            Self::Introduction => &INTRODUCTION,
            Self::MessagePublished => &PUBLISHING,
            Self::SystemRunning => &RUNNING,
        }
    }
}

/// A typed fact found in a log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fact {
    /// `connected,<peer>,` in the checker log.
    ConnectedPeer(PeerId),
    /// `subscribe,<peer>,<topic>` in the checker log.
    SubscribedPeer {
        /// Subscribing peer.
        peer: PeerId,
        /// Topic subscribed to.
        topic: String,
    },
    /// `msg,<peer>,<topic>,...` in the checker log.
    MessageSeen {
        /// Sending peer.
        peer: PeerId,
        /// Topic the message arrived on.
        topic: String,
    },
    /// `listening,<address>` in the checker log.
    ListeningAddress(String),
    /// `[SYSTEM] Generated Peer ID: <peer>` in the application log.
    GeneratedPeer(PeerId),
    /// A protocol mention in the application log.
    ProtocolMention(Protocol),
    /// A fixed marker in the application log.
    Lifecycle(Marker),
}

/// Pattern queries over one log's text.
#[derive(Debug, Clone, Copy)]
pub struct EventExtractor<'a> {
    text: &'a str,
}

impl<'a> EventExtractor<'a> {
    /// Queries over `blob`.
    pub fn new(blob: &'a LogBlob) -> Self {
        Self::from_text(blob.text())
    }

    /// Queries over raw text.
    pub fn from_text(text: &'a str) -> Self {
        Self { text }
    }

    /// Peer id of the first `connected` event.
    pub fn connected_peer(&self) -> Option<PeerId> {
        CONNECTED.first_capture(self.text).map(PeerId::from)
    }

    /// Peer id of the first `subscribe` event on [`CHAT_TOPIC`].
    pub fn subscribed_peer(&self) -> Option<PeerId> {
        SUBSCRIBED.first_capture(self.text).map(PeerId::from)
    }

    /// Peer id of the first `msg` event on [`CHAT_TOPIC`].
    pub fn message_seen(&self) -> Option<PeerId> {
        MESSAGE.first_capture(self.text).map(PeerId::from)
    }

    /// Payload of every `listening,` line, in log order.
    pub fn listening_addresses(&self) -> Vec<&'a str> {
        self.text
            .lines()
            .filter_map(|line| line.strip_prefix(LISTENING_TAG))
            .collect()
    }

    /// Lines containing `error` in any case, in log order.
    pub fn error_lines(&self) -> Vec<&'a str> {
        self.text
            .lines()
            .filter(|line| line.to_lowercase().contains("error"))
            .collect()
    }

    /// `12D3KooW`-prefixed token after the first `[SYSTEM] Generated Peer ID:`
    /// marker, possibly on the following line.
    pub fn generated_peer_id(&self) -> Option<PeerId> {
        GENERATED_PEER_ID.first_capture(self.text).map(PeerId::from)
    }

    /// `true` if `marker` appears anywhere in the log.
    pub fn has_marker(&self, marker: Marker) -> bool {
        marker.pattern().is_match(self.text)
    }

    /// `true` if `protocol` is mentioned anywhere in the log.
    pub fn mentions(&self, protocol: Protocol) -> bool {
        protocol.pattern().is_match(self.text)
    }

    /// Mentioned protocols, in [`Protocol::ALL`] order.
    pub fn protocol_mentions(&self) -> Vec<Protocol> {
        Protocol::ALL
            .into_iter()
            .filter(|p| self.mentions(*p))
            .collect()
    }

    /// Every fact present in the log.
    ///
    /// Order: checker events, listening addresses, generated peer id,
    /// protocol mentions, markers.
    pub fn facts(&self) -> Vec<Fact> {
        let mut facts = Vec::new();
        if let Some(peer) = self.connected_peer() {
            facts.push(Fact::ConnectedPeer(peer));
        }
        if let Some(peer) = self.subscribed_peer() {
            facts.push(Fact::SubscribedPeer {
                peer,
                topic: CHAT_TOPIC.to_owned(),
            });
        }
        if let Some(peer) = self.message_seen() {
            facts.push(Fact::MessageSeen {
                peer,
                topic: CHAT_TOPIC.to_owned(),
            });
        }
        facts.extend(
            self.listening_addresses()
                .into_iter()
                .map(|addr| Fact::ListeningAddress(addr.to_owned())),
        );
        if let Some(peer) = self.generated_peer_id() {
            facts.push(Fact::GeneratedPeer(peer));
        }
        facts.extend(self.protocol_mentions().into_iter().map(Fact::ProtocolMention));
        facts.extend(
            Marker::ALL
                .into_iter()
                .filter(|m| self.has_marker(*m))
                .map(Fact::Lifecycle),
        );
        facts
    }
}
