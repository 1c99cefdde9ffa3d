//! Fixed-capacity input window with byte-order-mark detection.

use std::io::{self, Read};

use cellpack_model::Encoding;

use crate::error::Error;
use crate::transcode::Utf16Reader;

/// Smallest usable window; BOM sniffing alone needs three bytes.
pub(crate) const MIN_WINDOW_BYTES: usize = 4;

/// Byte window over a `Read` source.
///
/// The tokenizer consumes by advancing `start`; only [`refill`](Self::refill)
/// advances `end`. Invariant: `0 <= start <= end <= capacity`.
pub(crate) struct InputBuffer<'s> {
    source: Box<dyn Read + 's>,
    pub(crate) data: Vec<u8>,
    pub(crate) start: usize,
    pub(crate) end: usize,
    eof: bool,
    encoding: Option<Encoding>,
}

impl<'s> std::fmt::Debug for InputBuffer<'s> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputBuffer")
            .field("data", &self.data)
            .field("start", &self.start)
            .field("end", &self.end)
            .field("eof", &self.eof)
            .field("encoding", &self.encoding)
            .finish()
    }
}

impl<'s> InputBuffer<'s> {
    /// Wrap `source`, sniffing a leading byte-order mark. A UTF-16 BOM swaps
    /// the source for a transcoding adapter; a UTF-8 BOM is stripped; other
    /// leading bytes become the first window contents.
    pub(crate) fn new(source: impl Read + 's, capacity: usize) -> Result<Self, Error> {
        if capacity < MIN_WINDOW_BYTES {
            return Err(Error::BufferTooSmall {
                requested: capacity,
                minimum: MIN_WINDOW_BYTES,
            });
        }
        let mut buffer = Self {
            source: Box::new(source),
            data: vec![0u8; capacity],
            start: 0,
            end: 0,
            eof: false,
            encoding: None,
        };
        buffer.sniff_bom()?;
        Ok(buffer)
    }

    fn sniff_bom(&mut self) -> io::Result<()> {
        let mut head = [0u8; 3];
        let mut got = 0usize;
        while got < 2 {
            let n = self.source.read(&mut head[got..2])?;
            if n == 0 {
                break;
            }
            got += n;
        }

        match &head[..got] {
            [0xFF, 0xFE] => {
                self.encoding = Some(Encoding::Utf16Le);
                let inner = std::mem::replace(&mut self.source, Box::new(io::empty()));
                self.source = Box::new(Utf16Reader::little_endian(inner));
                return Ok(());
            }
            [0xFE, 0xFF] => {
                self.encoding = Some(Encoding::Utf16Be);
                let inner = std::mem::replace(&mut self.source, Box::new(io::empty()));
                self.source = Box::new(Utf16Reader::big_endian(inner));
                return Ok(());
            }
            [0xEF, 0xBB] => {
                let n = self.source.read(&mut head[2..])?;
                if n == 1 && head[2] == 0xBF {
                    self.encoding = Some(Encoding::Utf8);
                    return Ok(());
                }
                got += n;
            }
            _ => {}
        }

        self.data[..got].copy_from_slice(&head[..got]);
        self.end = got;
        Ok(())
    }

    /// Compact the live span to the front, then top up from the source until
    /// the window is full or the source is exhausted.
    pub(crate) fn refill(&mut self) -> io::Result<()> {
        self.data.copy_within(self.start..self.end, 0);
        self.end -= self.start;
        self.start = 0;
        while self.end < self.data.len() {
            let n = self.source.read(&mut self.data[self.end..])?;
            if n == 0 {
                self.eof = true;
                break;
            }
            self.end += n;
        }
        Ok(())
    }

    /// No refill can add bytes: the window is saturated or the source ended.
    pub(crate) fn is_full(&self) -> bool {
        self.end - self.start == self.data.len() || self.eof
    }

    pub(crate) fn eof(&self) -> bool {
        self.eof
    }

    pub(crate) fn live(&self) -> &[u8] {
        &self.data[self.start..self.end]
    }

    pub(crate) fn encoding(&self) -> Option<Encoding> {
        self.encoding
    }
}
