// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Sample peer identifiers.
//!
//! Both constants are 52 characters of Base58 and contain none of the
//! substrings the application rules look for (`ping`, `kad`, `identify`,
//! `hello`, `error`), so they can sit in any fixture without tripping a
//! pattern.

/// Peer id the application reports for itself.
pub const APPLICATION_PEER_ID: &str = "12D3KooWD3eckifWpRn9wQpMG9R9hX3sD158z7EqHWmweQAJU5SA";

/// Peer id the checker listens under.
pub const CHECKER_PEER_ID: &str = "12D3KooWGzh2bAZ6QvXe3nSmNpqhHVw3FDSCTSqVPkqjsM7XsD5u";

/// `12D3KooW` followed by `A` until the id is `len` characters long.
///
/// Lengths shorter than the prefix yield the prefix alone.
pub fn peer_id_of_len(len: usize) -> String {
    let mut id = String::from("12D3KooW");
    while id.len() < len {
        id.push('A');
    }
    id
}
