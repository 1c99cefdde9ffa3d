//! `cellpack-model` defines the in-memory output of flat-file ingestion.
//!
//! The crate is intentionally self-contained so it can be reused by:
//! - the streaming tokenizer (`cellpack-ingest`), which produces matrices
//! - downstream parsing pipelines that consume identifiers instead of bytes
//! - importers that rebuild matrices from the wire format in [`wire`]
//!
//! A [`CellMatrix`] pairs a dense grid of `u32` cell identifiers with the
//! ordered table of distinct cell contents, so per-string work downstream
//! (date parsing, numeric parsing, memoization) happens at most once per
//! distinct value.

#![forbid(unsafe_code)]

mod error;
mod matrix;
pub mod wire;

pub use error::Error;
pub use matrix::{CellMatrix, Encoding, UnexpectedCell};
