use std::io::Write;

use crate::{chunk::ChunkPool, Result};

/// Writes records held in a [`ChunkPool`] to an output stream
///
/// Each active chunk contributes exactly its `length` bytes, in chunk order.
/// The writer adds no buffering of its own; wrap the sink in a
/// [`BufWriter`](std::io::BufWriter) when writing to a file or terminal.
pub struct StrandWriter<W: Write> {
    /// Inner writer
    inner: W,

    /// Number of records written
    records_written: usize,

    /// Number of bytes written
    bytes_written: u64,
}
impl<W: Write> StrandWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            records_written: 0,
            bytes_written: 0,
        }
    }

    /// Writes the record held by the active chunks of `pool`
    ///
    /// Returns the number of bytes written.
    pub fn write_record(&mut self, pool: &ChunkPool) -> Result<usize> {
        let mut written = 0;
        for chunk in pool.chunks() {
            self.inner.write_all(chunk.data())?;
            written += chunk.length();
        }
        self.records_written += 1;
        self.bytes_written += written as u64;
        Ok(written)
    }

    #[must_use]
    pub fn records_written(&self) -> usize {
        self.records_written
    }

    #[must_use]
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    pub fn by_ref(&mut self) -> &mut W {
        &mut self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    pub fn flush(&mut self) -> Result<()> {
        self.inner.flush()?;
        Ok(())
    }
}
