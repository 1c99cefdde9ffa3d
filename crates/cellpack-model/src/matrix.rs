use std::fmt;

use crate::error::Error;

/// Source encoding detected from a byte-order mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Utf8,
    Utf16Le,
    Utf16Be,
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Encoding::Utf8 => "UTF-8",
            Encoding::Utf16Le => "UTF-16LE",
            Encoding::Utf16Be => "UTF-16BE",
        })
    }
}

/// A non-empty cell that appeared beyond the detected column count on its
/// line. The cell is not part of the matrix; its bytes are preserved here so
/// callers can report or recover it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnexpectedCell {
    pub line: u32,
    pub column: u32,
    pub bytes: Vec<u8>,
}

/// Dense matrix of interned cell identifiers plus the distinct-content table.
///
/// `cells` holds `line_count() * columns` identifiers in row-major order; the
/// byte content behind the cell at `(line, column)` is
/// `contents[cells[line * columns + column]]`. `contents[0]` is always the
/// empty sequence, so identifier 0 doubles as the empty cell. Identifiers
/// above 0 are assigned in the order their content first appeared in the
/// input, which lets the wire format reconstruct the table in a single pass.
///
/// Once constructed a matrix is immutable in practice and safe to share
/// across threads for reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellMatrix {
    pub columns: usize,
    pub cells: Vec<u32>,
    pub contents: Vec<Vec<u8>>,
    pub unexpected: Vec<UnexpectedCell>,
    /// Separator byte the body of the file was split on.
    pub separator: u8,
    /// The header line was space-separated while the body uses tabs.
    pub space_separated_header: bool,
    pub encoding: Option<Encoding>,
    /// The cell cap was reached; the final line may be ragged.
    pub truncated: bool,
}

impl CellMatrix {
    /// The zero-column matrix produced for inputs with no cells.
    pub fn empty() -> Self {
        Self {
            columns: 0,
            cells: Vec::new(),
            contents: vec![Vec::new()],
            unexpected: Vec::new(),
            separator: b'\t',
            space_separated_header: false,
            encoding: None,
            truncated: false,
        }
    }

    pub fn line_count(&self) -> usize {
        if self.columns == 0 {
            0
        } else {
            self.cells.len() / self.columns
        }
    }

    /// Number of lines after the header.
    pub fn content_line_count(&self) -> usize {
        self.line_count().saturating_sub(1)
    }

    pub fn cell_id(&self, line: usize, column: usize) -> Option<u32> {
        if column >= self.columns || line >= self.line_count() {
            return None;
        }
        self.cells.get(line * self.columns + column).copied()
    }

    /// Byte content of the cell at `(line, column)`, or `None` out of range.
    pub fn cell_bytes(&self, line: usize, column: usize) -> Option<&[u8]> {
        let id = self.cell_id(line, column)?;
        self.contents.get(id as usize).map(Vec::as_slice)
    }

    /// Verify the structural invariants. This is the gatekeeper for matrices
    /// constructed outside the parser (e.g. decoded from the wire format).
    ///
    /// Checked:
    /// - `contents[0]` is the empty sequence;
    /// - every identifier in `cells` indexes into `contents`;
    /// - `cells.len()` is a multiple of `columns` (a ragged final line is
    ///   tolerated only on a truncated matrix); a zero-column matrix has no
    ///   cells and at most the empty content;
    /// - identifiers above 0 first appear in dense ascending order, so the
    ///   identifiers occurring in `cells` form a prefix of the integers.
    ///   Identifier 0 is pre-seeded by construction and exempt.
    pub fn check_consistency(&self) -> Result<(), Error> {
        match self.contents.first() {
            Some(first) if first.is_empty() => {}
            _ => {
                return Err(Error::Inconsistent(
                    "contents[0] must be the empty sequence".into(),
                ))
            }
        }

        if self.columns == 0 {
            if !self.cells.is_empty() {
                return Err(Error::Inconsistent(
                    "zero-column matrix must have no cells".into(),
                ));
            }
            if self.contents.len() > 1 {
                return Err(Error::Inconsistent(format!(
                    "zero-column matrix must have at most the empty content, got {}",
                    self.contents.len()
                )));
            }
            return Ok(());
        }

        if self.cells.len() % self.columns != 0 && !self.truncated {
            return Err(Error::Inconsistent(format!(
                "{} cells do not fill {} columns evenly",
                self.cells.len(),
                self.columns
            )));
        }

        let mut max_seen = 0u32;
        for (pos, &id) in self.cells.iter().enumerate() {
            if id as usize >= self.contents.len() {
                return Err(Error::Inconsistent(format!(
                    "cell {pos} references content {id} of {}",
                    self.contents.len()
                )));
            }
            if id > max_seen {
                if id != max_seen + 1 {
                    return Err(Error::Inconsistent(format!(
                        "cell {pos} introduces content {id} before {}",
                        max_seen + 1
                    )));
                }
                max_seen = id;
            }
        }

        Ok(())
    }
}
