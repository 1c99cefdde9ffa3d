use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A structural invariant of [`CellMatrix`](crate::CellMatrix) does not
    /// hold. Raised by the consistency check that gates externally
    /// constructed matrices.
    #[error("inconsistent cell matrix: {0}")]
    Inconsistent(String),
    #[error("unsupported wire format version {0}")]
    UnknownVersion(u8),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
