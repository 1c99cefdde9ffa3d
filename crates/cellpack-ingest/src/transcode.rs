//! Streaming UTF-16 → UTF-8 transcoding.
//!
//! Decoding a whole UTF-16 file up front would defeat the bounded-memory
//! design of the input window, so the adapter translates in fixed-size
//! blocks behind the `Read` trait and the tokenizer never notices.

use std::io::{self, Read};

use encoding_rs::{CoderResult, Decoder, UTF_16BE, UTF_16LE};

/// Raw block size per inner read; a small multiple of the code-unit size.
const RAW_BLOCK_BYTES: usize = 4096;

/// Read adapter exposing a UTF-16LE/BE source as UTF-8 bytes.
///
/// Decoding is incremental: a code unit split across two blocks is carried
/// inside the decoder, and decoded bytes exceeding the caller's request wait
/// in a pending buffer for the next read. Unpaired surrogates decode to
/// U+FFFD. Read-only; no seek.
pub struct Utf16Reader<R> {
    inner: R,
    decoder: Decoder,
    raw: Vec<u8>,
    pending: Vec<u8>,
    pending_pos: usize,
    eof: bool,
    /// The decoder has been flushed with `last = true` and must not run again.
    finished: bool,
}

impl<R: Read> Utf16Reader<R> {
    pub fn little_endian(inner: R) -> Self {
        Self::with_decoder(inner, UTF_16LE.new_decoder_without_bom_handling())
    }

    pub fn big_endian(inner: R) -> Self {
        Self::with_decoder(inner, UTF_16BE.new_decoder_without_bom_handling())
    }

    fn with_decoder(inner: R, decoder: Decoder) -> Self {
        Self {
            inner,
            decoder,
            raw: vec![0u8; RAW_BLOCK_BYTES],
            pending: Vec::new(),
            pending_pos: 0,
            eof: false,
            finished: false,
        }
    }

    /// Pull one raw block and decode it into the pending buffer.
    fn refill_pending(&mut self) -> io::Result<()> {
        self.pending.clear();
        self.pending_pos = 0;

        let mut filled = 0usize;
        while !self.eof && filled < self.raw.len() {
            let n = self.inner.read(&mut self.raw[filled..])?;
            if n == 0 {
                self.eof = true;
                break;
            }
            filled += n;
        }
        let last = self.eof;

        // Sized for the worst case, so one call always drains the block.
        let capacity = self
            .decoder
            .max_utf8_buffer_length(filled)
            .unwrap_or(RAW_BLOCK_BYTES * 3);
        self.pending.resize(capacity.max(4), 0);
        let (result, read, written, _had_errors) =
            self.decoder
                .decode_to_utf8(&self.raw[..filled], &mut self.pending, last);
        debug_assert!(matches!(result, CoderResult::InputEmpty));
        debug_assert_eq!(read, filled);
        self.pending.truncate(written);
        self.finished = last;
        Ok(())
    }
}

impl<R: Read> Read for Utf16Reader<R> {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        if out.is_empty() {
            return Ok(0);
        }
        loop {
            let available = self.pending.len() - self.pending_pos;
            if available > 0 {
                let n = available.min(out.len());
                out[..n].copy_from_slice(&self.pending[self.pending_pos..self.pending_pos + n]);
                self.pending_pos += n;
                return Ok(n);
            }
            if self.finished {
                return Ok(0);
            }
            self.refill_pending()?;
        }
    }
}
