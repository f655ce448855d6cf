//! Record geometry
//!
//! A record occupies a run of physical bytes `[title][data lines]` spread over
//! equally sized chunks, where every chunk but the last is full. Three
//! coordinate systems are in play:
//!
//! * **data index** `d`: position among the newline-free sequence symbols
//! * **raw offset**: position inside the data region, newlines included
//!   (`raw(d) = d + d / line_width`)
//! * **physical position**: position inside the record (`title_len + raw`),
//!   which maps to a [`Cursor`] as `(p / chunk_size, p % chunk_size)`

use memchr::{memchr, memchr_iter};

use crate::{
    chunk::{ChunkPool, NEW_LINE},
    error::{ReadError, Result},
};

/// Default number of sequence symbols per line
pub const DEFAULT_LINE_WIDTH: usize = 60;

/// A physical position expressed as a chunk index and an offset within it
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cursor {
    pub chunk: usize,
    pub offset: usize,
}
impl Cursor {
    #[must_use]
    pub fn new(chunk: usize, offset: usize) -> Self {
        Self { chunk, offset }
    }

    #[must_use]
    pub fn from_position(position: usize, chunk_size: usize) -> Self {
        Self {
            chunk: position / chunk_size,
            offset: position % chunk_size,
        }
    }

    /// The next physical position, rolling over into the next chunk
    #[must_use]
    pub fn step_forward(self, chunk_size: usize) -> Self {
        if self.offset + 1 == chunk_size {
            Self::new(self.chunk + 1, 0)
        } else {
            Self::new(self.chunk, self.offset + 1)
        }
    }
}

/// Title and data lengths of the record currently held in a [`ChunkPool`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordLayout {
    /// Header length including its newline
    title_len: usize,

    /// Number of sequence symbols (newlines excluded)
    data_len: usize,

    /// Number of newlines in the data region
    newlines: usize,

    /// Total record length in bytes
    total_len: usize,

    line_width: usize,
    chunk_size: usize,
}
impl RecordLayout {
    /// Layout of a well-formed record whose final line is newline-terminated
    #[must_use]
    pub fn new(title_len: usize, data_len: usize, line_width: usize, chunk_size: usize) -> Self {
        let newlines = data_len.div_ceil(line_width);
        Self {
            title_len,
            data_len,
            newlines,
            total_len: title_len + data_len + newlines,
            line_width,
            chunk_size,
        }
    }

    /// Measures the record held by the active chunks of `pool`
    ///
    /// # Errors
    ///
    /// Returns [`ReadError::IrregularLineWidth`] if the line breaks in the data
    /// region do not close lines of exactly `line_width` symbols (the final
    /// line may be shorter).
    pub fn analyze(pool: &ChunkPool, line_width: usize) -> Result<Self> {
        let chunks = pool.chunks();
        let total_len = pool.total_length();

        let mut title_len = total_len;
        let mut offset = 0;
        for chunk in chunks {
            if let Some(pos) = memchr(NEW_LINE, chunk.data()) {
                title_len = offset + pos + 1;
                break;
            }
            offset += chunk.length();
        }

        // every line break must close a full line, except one ending the record
        let region_len = total_len - title_len;
        let mut misplaced = false;
        let mut newlines = 0;
        let mut offset = 0;
        for chunk in chunks {
            let data = chunk.data();
            let start = title_len.saturating_sub(offset).min(data.len());
            for pos in memchr_iter(NEW_LINE, &data[start..]) {
                let raw = offset + start + pos - title_len;
                let line_start = newlines * (line_width + 1);
                let full_line = raw == line_start + line_width;
                let short_last_line =
                    raw + 1 == region_len && raw > line_start && raw < line_start + line_width;
                misplaced |= !(full_line || short_last_line);
                newlines += 1;
            }
            offset += data.len();
        }

        let data_len = region_len - newlines;
        let lines = data_len.div_ceil(line_width);
        if misplaced || newlines > lines || newlines + 1 < lines {
            return Err(ReadError::IrregularLineWidth {
                lines,
                newlines,
                line_width,
            }
            .into());
        }

        Ok(Self {
            title_len,
            data_len,
            newlines,
            total_len,
            line_width,
            chunk_size: pool.chunk_size(),
        })
    }

    #[must_use]
    pub fn title_len(&self) -> usize {
        self.title_len
    }

    #[must_use]
    pub fn data_len(&self) -> usize {
        self.data_len
    }

    #[must_use]
    pub fn newlines(&self) -> usize {
        self.newlines
    }

    #[must_use]
    pub fn total_len(&self) -> usize {
        self.total_len
    }

    #[must_use]
    pub fn line_width(&self) -> usize {
        self.line_width
    }

    #[must_use]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Offset of data index `d` within the data region
    #[must_use]
    pub fn raw_offset(&self, d: usize) -> usize {
        d + d / self.line_width
    }

    /// Position of data index `d` within the record
    #[must_use]
    pub fn physical(&self, d: usize) -> usize {
        self.title_len + self.raw_offset(d)
    }

    /// Chunk and offset of data index `d`
    #[must_use]
    pub fn locate(&self, d: usize) -> Cursor {
        Cursor::from_position(self.physical(d), self.chunk_size)
    }

    /// First data index at or after physical position `position`
    #[must_use]
    pub fn data_index_at(&self, position: usize) -> usize {
        if position <= self.title_len {
            return 0;
        }
        let raw = position - self.title_len;
        (raw - raw / (self.line_width + 1)).min(self.data_len)
    }
}
