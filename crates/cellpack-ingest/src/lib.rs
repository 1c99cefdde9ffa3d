//! Streaming ingestion of delimited flat files (TSV, CSV and friends).
//!
//! [`parse`] drives a fixed-capacity input window over an arbitrary byte
//! source, guesses the separator from the first line, tokenizes cells with
//! quote and trimming semantics, and interns every cell through
//! [`cellpack_intern::ContentTrie`] so the output is a dense matrix of small
//! integers plus the table of distinct contents (see
//! [`cellpack_model::CellMatrix`]).
//!
//! UTF-16LE/BE sources are detected by their byte-order mark and transcoded
//! on the fly ([`Utf16Reader`]); a UTF-8 BOM is stripped. Any 8-bit superset
//! of ASCII passes through untouched.
//!
//! A parse is single-threaded and owns all of its state; the only blocking
//! point is the source read. Parsing the same bytes twice yields identical
//! matrices.

#![forbid(unsafe_code)]

mod buffer;
mod error;
mod options;
mod tokenizer;
mod transcode;

pub use error::Error;
pub use options::{ParseOptions, MIN_READ_BUFFER_SIZE};
pub use tokenizer::parse;
pub use transcode::Utf16Reader;

pub use cellpack_model::{CellMatrix, Encoding, UnexpectedCell};
