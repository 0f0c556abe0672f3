// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Peer identifier format validation.
//!
//! libp2p prints Ed25519 peer ids as Base58btc text starting with `12D3KooW`.
//! The validator checks that convention and nothing more: it never decodes
//! the multihash, so a well-formed but fabricated id still passes.
//!
//! Checks run in a fixed order (prefix, length, alphabet) and the first one
//! that fails decides the reported [`PeerIdError`].
//!
//! # Example
//!
//! ```
//! use uc_check::peer_id::{validate, PeerIdError};
//!
//! assert!(validate("12D3KooWD3eckifWpRn9wQpMG9R9hX3sD158z7EqHWmweQAJU5SA").is_ok());
//! assert!(matches!(
//!     validate("QmYyQSo1c1Ym7orWxLYvCrM2EmxFTANf8wXmmE7DWjhx5N"),
//!     Err(PeerIdError::InvalidPrefix { .. })
//! ));
//! ```

use std::fmt;

use thiserror::Error;

/// Literal prefix of every accepted peer id.
pub const PEER_ID_PREFIX: &str = "12D3KooW";

/// Shortest accepted peer id, in characters.
pub const MIN_PEER_ID_LEN: usize = 45;

/// Longest accepted peer id, in characters.
pub const MAX_PEER_ID_LEN: usize = 60;

/// Base58 (Bitcoin) alphabet. `0`, `O`, `I` and `l` are not members.
pub const BASE58_ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Why a candidate string is not a well-formed peer id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeerIdError {
    /// The candidate does not start with [`PEER_ID_PREFIX`].
    #[error("Invalid peer ID format. Expected to start with '12D3KooW', got: {actual}")]
    InvalidPrefix {
        /// The rejected candidate.
        actual: String,
    },
    /// The candidate is shorter than [`MIN_PEER_ID_LEN`] or longer than
    /// [`MAX_PEER_ID_LEN`].
    #[error("Peer ID length seems invalid. Expected 45-60 chars, got {len}: {actual}")]
    InvalidLength {
        /// Length of the candidate in characters.
        len: usize,
        /// The rejected candidate.
        actual: String,
    },
    /// The candidate contains a character outside [`BASE58_ALPHABET`].
    #[error("Invalid character '{ch}' in peer ID. Must be base58 encoded.")]
    InvalidCharacter {
        /// First offending character.
        ch: char,
        /// The rejected candidate.
        actual: String,
    },
}

/// A claimed peer identifier as it appeared in a log.
///
/// Holding a `PeerId` says nothing about validity; call [`PeerId::validate`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PeerId(String);

impl PeerId {
    /// Wraps a candidate string without checking it.
    pub fn new(candidate: impl Into<String>) -> Self {
        Self(candidate.into())
    }

    /// The candidate text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Checks the candidate against the peer id format.
    pub fn validate(&self) -> Result<(), PeerIdError> {
        validate(&self.0)
    }

    /// Shorthand for `self.validate().is_ok()`.
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PeerId {
    fn from(candidate: &str) -> Self {
        Self::new(candidate)
    }
}

/// Returns `true` if `ch` belongs to [`BASE58_ALPHABET`].
pub fn is_base58(ch: char) -> bool {
    BASE58_ALPHABET.contains(ch)
}

/// Validates `candidate` as a peer id.
///
/// Total over all strings: every input yields `Ok(())` or exactly one
/// [`PeerIdError`] variant.
pub fn validate(candidate: &str) -> Result<(), PeerIdError> {
    if !candidate.starts_with(PEER_ID_PREFIX) {
        return Err(PeerIdError::InvalidPrefix {
            actual: candidate.to_owned(),
        });
    }

    let len = candidate.chars().count();
    if !(MIN_PEER_ID_LEN..=MAX_PEER_ID_LEN).contains(&len) {
        return Err(PeerIdError::InvalidLength {
            len,
            actual: candidate.to_owned(),
        });
    }

    if let Some(ch) = candidate.chars().find(|ch| !is_base58(*ch)) {
        return Err(PeerIdError::InvalidCharacter {
            ch,
            actual: candidate.to_owned(),
        });
    }

    Ok(())
}
