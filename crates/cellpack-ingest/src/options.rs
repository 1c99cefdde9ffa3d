use crate::error::Error;

/// Floor for [`ParseOptions::read_buffer_size`].
pub const MIN_READ_BUFFER_SIZE: usize = 4096;

/// Limits for a single parse.
#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    /// Upper bound on data lines; the header line is not counted.
    pub max_line_count: usize,
    /// Upper bound on data cells; the header line is not counted.
    pub max_cell_count: usize,
    /// Input window capacity. Cells longer than the window are split at its
    /// boundary, so size it for the longest cell that must stay intact.
    pub read_buffer_size: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_line_count: usize::MAX,
            max_cell_count: usize::MAX,
            read_buffer_size: 64 * 1024,
        }
    }
}

impl ParseOptions {
    pub fn validate(&self) -> Result<(), Error> {
        if self.read_buffer_size < MIN_READ_BUFFER_SIZE {
            return Err(Error::OptionOutOfRange {
                name: "read_buffer_size",
                value: self.read_buffer_size,
                minimum: MIN_READ_BUFFER_SIZE,
            });
        }
        Ok(())
    }

    /// Cell budget once the column count is known. The extra `columns` keeps
    /// a header line in range even with a zero cell cap.
    pub(crate) fn effective_cell_cap(&self, columns: usize) -> usize {
        self.max_cell_count
            .min(self.max_line_count.saturating_mul(columns))
            .saturating_add(columns)
    }
}
