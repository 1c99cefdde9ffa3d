//! Dense-identifier interning for byte sequences.
//!
//! [`ContentTrie`] is the workhorse behind flat-file ingestion: every
//! distinct cell content is stored once and addressed by a small integer, so
//! downstream consumers pay per-string costs at most once per distinct
//! value. See the [`trie`] module docs for the arena layout.

#![forbid(unsafe_code)]

mod trie;

pub use trie::{ContentTrie, RECOMMENDED_MAX_KEY_BYTES};
