//! Record-at-a-time reading into a [`ChunkPool`]
//!
//! [`StrandReader`] pulls bytes from any [`Read`] source into pool chunks until
//! it has seen one complete record. Bytes read past the end of the record stay
//! in the last chunk (between its `length` and `capacity`) and are moved to the
//! front of the pool by [`carry_over`] once the record has been written.

use std::io::{ErrorKind, Read};

use crate::{
    chunk::{ChunkPool, HEADER_MARKER},
    error::{ReadError, Result},
};

/// Reads whole records from an input stream into reusable chunks
pub struct StrandReader<R: Read> {
    /// The source of FASTA records
    reader: R,

    /// Total number of bytes pulled from the source
    bytes_read: u64,
}
impl<R: Read> StrandReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            bytes_read: 0,
        }
    }

    /// Total number of bytes pulled from the source so far
    #[must_use]
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Consumes the reader and returns the inner source
    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Reads the next record into the pool
    ///
    /// Returns the number of chunks holding the record, or `None` once the
    /// stream is exhausted. The pool must have been reset with [`carry_over`]
    /// after the previous record.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// * There is an I/O error when reading from the source
    /// * The record does not start with `>`
    pub fn read_record(&mut self, pool: &mut ChunkPool) -> Result<Option<usize>> {
        let mut count = 0;
        loop {
            let index = count;
            let previous = if index == 0 {
                None
            } else {
                pool.get(index - 1).and_then(|c| c.data().last().copied())
            };

            let chunk = pool.acquire(index);
            count += 1;
            if index > 0 {
                chunk.clear();
            } else if chunk.is_last() {
                // carried-over chunk already holds a whole record
                pool.set_active(count);
                return Ok(Some(count));
            }

            let start = chunk.capacity();
            let n = fill(&mut self.reader, chunk.spare_mut())?;
            self.bytes_read += n as u64;

            if index == 0 && start == 0 {
                if n == 0 {
                    pool.set_active(0);
                    return Ok(None);
                }
                let first = chunk.spare_mut()[0];
                if first != HEADER_MARKER {
                    return Err(ReadError::MissingHeader(first).into());
                }
            }
            chunk.advance(n);

            // the record's own marker is never a boundary
            let from = if index == 0 { start.max(1) } else { start };
            chunk.correct_length(from, previous);

            if chunk.is_last() || !chunk.is_full() {
                pool.set_active(count);
                return Ok(Some(count));
            }
        }
    }
}

/// Reads until `buf` is full or the source is exhausted
fn fill<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(filled)
}

/// Resets the pool after a record has been written
///
/// If the last active chunk holds the start of the next record, those bytes
/// are moved into chunk 0 and rescanned for a further boundary so the next
/// [`StrandReader::read_record`] can resume without touching the source.
/// Every other chunk is cleared.
pub fn carry_over(pool: &mut ChunkPool) {
    let active = pool.active();
    if active == 0 {
        return;
    }
    let (head, tail_chunk) = pool.split_at_mut(active - 1);

    let carried = if !tail_chunk.is_last() {
        false
    } else if let Some(first) = head.first_mut() {
        first.load_front(tail_chunk.tail());
        first.correct_length(1, None);
        true
    } else {
        tail_chunk.shift_tail_to_front();
        tail_chunk.correct_length(1, None);
        true
    };

    // chunk 0 survives when it holds the carried bytes
    for index in usize::from(carried)..active {
        pool.clear(index);
    }
    pool.set_active(0);
}
