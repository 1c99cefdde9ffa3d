//! Streaming tokenizer and matrix builder.
//!
//! One forward pass over the input window: guess the separator from the
//! first line, then repeatedly scan to the next unquoted terminator, extract
//! the cell (quote stripping, escaped-quote collapsing, space trimming),
//! intern it, and assemble lines. Parsing never fails on malformed content:
//! ragged lines, ill-formed quoting and overflowing cells all degrade to
//! diagnostics on the matrix.

use std::io::Read;

use cellpack_intern::ContentTrie;
use cellpack_model::{CellMatrix, UnexpectedCell};

use crate::buffer::InputBuffer;
use crate::error::Error;
use crate::options::ParseOptions;

const QUOTE: u8 = b'"';
const SPACE: u8 = b' ';
const TAB: u8 = b'\t';
const CR: u8 = b'\r';
const LF: u8 = b'\n';

/// Separator candidates in priority order; the first with a nonzero count on
/// the first line wins.
const SEPARATOR_CANDIDATES: [u8; 5] = [TAB, b';', b',', b'|', SPACE];

/// Parse a delimited flat file from `source` into a [`CellMatrix`].
///
/// The returned matrix owns the distinct-content table built during the
/// parse; the trie arena and the input window are dropped on every exit
/// path. Errors are limited to option validation and source I/O.
pub fn parse<'s>(source: impl Read + 's, options: &ParseOptions) -> Result<CellMatrix, Error> {
    options.validate()?;
    let mut buffer = InputBuffer::new(source, options.read_buffer_size)?;
    buffer.refill()?;

    let detection = detect_separator(&mut buffer)?;
    let columns = detection.columns;
    let body_separator = if detection.space_separated_header {
        TAB
    } else {
        detection.separator
    };

    if let Some(encoding) = buffer.encoding() {
        log::debug!("detected {encoding} byte-order mark");
    }
    if detection.space_separated_header {
        log::debug!("space-separated header line; body separator is TAB");
    }

    let mut scanner = Scanner {
        buffer,
        trie: ContentTrie::new(),
        cells: Vec::new(),
        unexpected: Vec::new(),
        columns,
        separator: detection.separator,
        body_separator,
        cell_cap: options.effective_cell_cap(columns),
        line_size: 0,
        empty_cells_since_line_start: 0,
    };
    scanner.run()?;

    let truncated = scanner.cells.len() >= scanner.cell_cap;
    if truncated {
        log::warn!(
            "cell cap of {} reached; input truncated",
            scanner.cell_cap
        );
    }

    let encoding = scanner.buffer.encoding();
    if scanner.cells.is_empty() {
        // No line produced a cell: the canonical zero-column matrix.
        let mut matrix = CellMatrix::empty();
        matrix.encoding = encoding;
        return Ok(matrix);
    }

    Ok(CellMatrix {
        columns,
        cells: scanner.cells,
        contents: scanner.trie.into_contents(),
        unexpected: scanner.unexpected,
        separator: body_separator,
        space_separated_header: detection.space_separated_header,
        encoding,
        truncated,
    })
}

struct Detection {
    columns: usize,
    separator: u8,
    space_separated_header: bool,
}

/// Guess the separator from the first line.
///
/// Leading spaces and newlines are consumed (they belong to no cell), then
/// candidate bytes are counted up to the first CR/LF within the window. The
/// column count is fixed here for the whole parse.
fn detect_separator(buffer: &mut InputBuffer<'_>) -> Result<Detection, Error> {
    loop {
        while buffer.start < buffer.end {
            match buffer.data[buffer.start] {
                SPACE | CR | LF => buffer.start += 1,
                _ => break,
            }
        }
        if buffer.start < buffer.end || buffer.is_full() {
            break;
        }
        buffer.refill()?;
    }

    let mut counts = [0usize; SEPARATOR_CANDIDATES.len()];
    for &b in buffer.live() {
        if b == CR || b == LF {
            break;
        }
        if let Some(i) = SEPARATOR_CANDIDATES.iter().position(|&c| c == b) {
            counts[i] += 1;
        }
    }

    for (i, &separator) in SEPARATOR_CANDIDATES.iter().enumerate() {
        if counts[i] > 0 {
            return Ok(Detection {
                columns: counts[i] + 1,
                separator,
                space_separated_header: separator == SPACE,
            });
        }
    }
    Ok(Detection {
        columns: 1,
        separator: TAB,
        space_separated_header: false,
    })
}

/// What ended a cell scan.
enum CellEnd {
    Separator,
    Newline,
    /// The window is saturated with no terminator in sight; the cell is
    /// force-extracted and its remainder continues as a fresh cell.
    WindowFull,
    EndOfInput,
}

/// All mutable parse state, scoped to one [`parse`] call.
struct Scanner<'s> {
    buffer: InputBuffer<'s>,
    trie: ContentTrie,
    cells: Vec<u32>,
    unexpected: Vec<UnexpectedCell>,
    columns: usize,
    /// Separator in effect for the current line.
    separator: u8,
    /// Separator from the second line on (TAB after a space-separated
    /// header).
    body_separator: u8,
    cell_cap: usize,
    line_size: usize,
    empty_cells_since_line_start: usize,
}

impl Scanner<'_> {
    fn run(&mut self) -> Result<(), Error> {
        loop {
            let (len, n_quotes, end) = self.scan_cell()?;
            let cell_start = self.buffer.start;
            self.emit_cell(cell_start, cell_start + len, n_quotes);
            match end {
                CellEnd::Separator | CellEnd::Newline => self.buffer.start += len + 1,
                CellEnd::WindowFull | CellEnd::EndOfInput => self.buffer.start += len,
            }
            if matches!(end, CellEnd::Newline | CellEnd::EndOfInput) {
                self.end_line();
            }
            if self.cells.len() >= self.cell_cap {
                break;
            }
            if matches!(end, CellEnd::EndOfInput) {
                break;
            }
        }
        Ok(())
    }

    /// Scan from the current window position to the next cell terminator.
    /// Nothing is consumed; the returned length is relative to
    /// `buffer.start`, which stays valid across the refills the scan itself
    /// performs.
    fn scan_cell(&mut self) -> Result<(usize, u32, CellEnd), Error> {
        let mut i = 0usize;
        let mut in_quote = false;
        let mut n_quotes = 0u32;

        loop {
            if self.buffer.start + i >= self.buffer.end {
                if !self.buffer.is_full() {
                    self.buffer.refill()?;
                    continue;
                }
                if self.buffer.eof() {
                    return Ok((i, n_quotes, CellEnd::EndOfInput));
                }
                return Ok((i, n_quotes, CellEnd::WindowFull));
            }

            let b = self.buffer.data[self.buffer.start + i];

            if in_quote {
                if b == QUOTE {
                    // Escaped-quote lookahead may need one more byte.
                    if self.buffer.start + i + 1 >= self.buffer.end && !self.buffer.is_full() {
                        self.buffer.refill()?;
                        continue;
                    }
                    if self.buffer.start + i + 1 < self.buffer.end
                        && self.buffer.data[self.buffer.start + i + 1] == QUOTE
                    {
                        n_quotes += 1;
                        i += 2;
                    } else {
                        in_quote = false;
                        i += 1;
                    }
                } else {
                    i += 1;
                }
                continue;
            }

            if b == QUOTE && i == 0 {
                in_quote = true;
                n_quotes = 1;
                i += 1;
                continue;
            }

            if b == self.separator {
                return Ok((i, n_quotes, CellEnd::Separator));
            }
            if b == LF || b == CR {
                return Ok((i, n_quotes, CellEnd::Newline));
            }
            i += 1;
        }
    }

    /// Extract, intern and place one cell.
    fn emit_cell(&mut self, raw_start: usize, raw_end: usize, n_quotes: u32) {
        let (start, end) = extract_bounds(&mut self.buffer.data, raw_start, raw_end, n_quotes);

        if start == end {
            // Empty cells before the first non-empty one are deferred so
            // fully empty lines can be dropped.
            if self.line_size == 0 {
                self.empty_cells_since_line_start += 1;
            } else {
                if self.line_size < self.columns {
                    self.push_cell(0);
                }
                self.line_size += 1;
            }
            return;
        }

        while self.empty_cells_since_line_start > 0 {
            if self.line_size < self.columns {
                self.push_cell(0);
            }
            self.line_size += 1;
            self.empty_cells_since_line_start -= 1;
        }

        if self.line_size < self.columns {
            let id = self.trie.intern(&self.buffer.data[start..end]);
            self.push_cell(id);
        } else {
            // Beyond the detected width: keep the bytes as a diagnostic but
            // do not intern them, so identifiers stay dense over the matrix.
            let line = self.cells.len() / self.columns - 1;
            self.unexpected.push(UnexpectedCell {
                line: line as u32,
                column: self.line_size as u32,
                bytes: self.buffer.data[start..end].to_vec(),
            });
        }
        self.line_size += 1;
    }

    fn push_cell(&mut self, id: u32) {
        if self.cells.len() < self.cell_cap {
            self.cells.push(id);
        }
    }

    /// Close the current line: pad active lines to the column count, drop
    /// lines with no non-empty cell, and switch to the body separator.
    fn end_line(&mut self) {
        if self.line_size > 0 {
            while self.line_size < self.columns {
                self.push_cell(0);
                self.line_size += 1;
            }
        }
        self.line_size = 0;
        self.empty_cells_since_line_start = 0;
        self.separator = self.body_separator;
    }
}

/// Strip quoting and whitespace from a raw cell span, collapsing escaped
/// quote pairs in place. Returns the adjusted bounds within `data`.
///
/// A span counts as quoted only when quote scanning saw an opening quote and
/// the span still ends with one; anything else (including a lone `"`) falls
/// back to the raw span, tolerating ill-formed quoting.
fn extract_bounds(data: &mut [u8], mut start: usize, mut end: usize, n_quotes: u32) -> (usize, usize) {
    if n_quotes > 0 && end > start + 1 && data[end - 1] == QUOTE {
        start += 1;
        end -= 1;
        if n_quotes > 1 {
            let mut write = start;
            let mut read = start;
            while read < end {
                let b = data[read];
                data[write] = b;
                write += 1;
                read += 1;
                if b == QUOTE && read < end && data[read] == QUOTE {
                    read += 1;
                }
            }
            end = write;
        }
    }

    while start < end && data[start] == SPACE {
        start += 1;
    }
    while end > start && data[end - 1] == SPACE {
        end -= 1;
    }
    (start, end)
}
