use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{name} of {value} is out of range (minimum {minimum})")]
    OptionOutOfRange {
        name: &'static str,
        value: usize,
        minimum: usize,
    },
    #[error("read buffer of {requested} bytes is too small (minimum {minimum})")]
    BufferTooSmall { requested: usize, minimum: usize },
    /// Failure of the underlying byte source, propagated verbatim.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
