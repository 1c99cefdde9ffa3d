//! Byte-packed wire format for [`CellMatrix`].
//!
//! Layout (all integers little-endian):
//!
//! 1. `u8` format version ([`WIRE_VERSION`]).
//! 2. `u16` column count.
//! 3. `u32` cell count.
//! 4. `u32` content count.
//! 5. Cell-count identifiers, each a varint.
//! 6. Content-count records: a varint byte length followed by the raw bytes.
//!
//! Because identifiers are assigned in first-seen order, a reader can rebuild
//! the matrix in a single forward pass. Diagnostics (separator, header flag,
//! encoding, truncation) are not part of the format; decoded matrices carry
//! defaults.
//!
//! Varints are little-endian base-128: each byte holds 7 payload bits, the
//! high bit is set on every byte except the last. Values up to `u32::MAX`
//! take 1–5 bytes.

use std::io::{self, Read, Write};

use crate::error::Error;
use crate::matrix::CellMatrix;

pub const WIRE_VERSION: u8 = 1;

const MAX_VARINT_BYTES: usize = 5;

fn unexpected_eof(context: &'static str) -> io::Error {
    io::Error::new(io::ErrorKind::UnexpectedEof, context)
}

/// Write `value` to `w` as a base-128 varint.
pub fn write_varint_u32(w: &mut impl Write, mut value: u32) -> io::Result<()> {
    loop {
        let mut byte = (value & 0x7F) as u8;
        value >>= 7;
        if value != 0 {
            byte |= 0x80;
        }
        w.write_all(&[byte])?;
        if value == 0 {
            return Ok(());
        }
    }
}

/// Read a base-128 varint from `r`.
///
/// Returns `Ok(None)` when `r` is at EOF before reading any bytes.
pub fn read_varint_u32(r: &mut impl Read) -> io::Result<Option<u32>> {
    let mut v: u32 = 0;
    for i in 0..MAX_VARINT_BYTES {
        let mut buf = [0u8; 1];
        match r.read(&mut buf)? {
            0 if i == 0 => return Ok(None),
            0 => return Err(unexpected_eof("unexpected EOF inside varint")),
            _ => {}
        }

        let byte = buf[0];
        // The fifth byte carries only the top four bits of a u32.
        if i == MAX_VARINT_BYTES - 1 && byte & 0xF0 != 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "varint does not fit in 32 bits",
            ));
        }
        v |= ((byte & 0x7F) as u32) << (7 * i);
        if byte & 0x80 == 0 {
            return Ok(Some(v));
        }
    }

    unreachable!("loop returns on the fifth byte")
}

/// Serialize `matrix` to `w`.
///
/// Matrices wider than `u16::MAX` columns or larger than `u32::MAX` cells or
/// contents are not representable and fail with `InvalidInput`.
pub fn write_matrix(w: &mut impl Write, matrix: &CellMatrix) -> io::Result<()> {
    let too_large = |what: &str| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{what} not representable in the wire format"),
        )
    };

    let columns = u16::try_from(matrix.columns).map_err(|_| too_large("column count"))?;
    let cell_count = u32::try_from(matrix.cells.len()).map_err(|_| too_large("cell count"))?;
    let content_count =
        u32::try_from(matrix.contents.len()).map_err(|_| too_large("content count"))?;

    w.write_all(&[WIRE_VERSION])?;
    w.write_all(&columns.to_le_bytes())?;
    w.write_all(&cell_count.to_le_bytes())?;
    w.write_all(&content_count.to_le_bytes())?;

    for &id in &matrix.cells {
        write_varint_u32(w, id)?;
    }
    for content in &matrix.contents {
        let len = u32::try_from(content.len()).map_err(|_| too_large("content length"))?;
        write_varint_u32(w, len)?;
        w.write_all(content)?;
    }
    Ok(())
}

/// Deserialize a matrix from `r` and verify its structural invariants.
pub fn read_matrix(r: &mut impl Read) -> Result<CellMatrix, Error> {
    let mut version = [0u8; 1];
    r.read_exact(&mut version)?;
    if version[0] != WIRE_VERSION {
        return Err(Error::UnknownVersion(version[0]));
    }

    let mut u16_buf = [0u8; 2];
    r.read_exact(&mut u16_buf)?;
    let columns = u16::from_le_bytes(u16_buf) as usize;

    let mut u32_buf = [0u8; 4];
    r.read_exact(&mut u32_buf)?;
    let cell_count = u32::from_le_bytes(u32_buf) as usize;
    r.read_exact(&mut u32_buf)?;
    let content_count = u32::from_le_bytes(u32_buf) as usize;

    let mut cells = Vec::with_capacity(cell_count.min(1 << 20));
    for _ in 0..cell_count {
        let id = read_varint_u32(r)?.ok_or_else(|| unexpected_eof("truncated cell vector"))?;
        cells.push(id);
    }

    // Lengths are untrusted; read incrementally instead of preallocating.
    let mut contents = Vec::with_capacity(content_count.min(1 << 20));
    for _ in 0..content_count {
        let len = read_varint_u32(r)?.ok_or_else(|| unexpected_eof("truncated content table"))?;
        let mut content = vec![0u8; len as usize];
        r.read_exact(&mut content)?;
        contents.push(content);
    }

    let matrix = CellMatrix {
        columns,
        cells,
        contents,
        ..CellMatrix::empty()
    };
    matrix.check_consistency()?;
    Ok(matrix)
}
