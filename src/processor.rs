//! # Record pipeline
//!
//! [`Revcomp`] ties the pieces together. For every record it runs, strictly in
//! sequence:
//!
//! 1. [`StrandReader::read_record`] to load the record into the chunk pool
//! 2. [`RecordLayout::analyze`] to measure the title and sequence
//! 3. [`reverse_record`] to reverse-complement the sequence on the worker pool
//! 4. [`StrandWriter::write_record`] to drain the chunks
//! 5. [`carry_over`] to move the start of the next record to the front
//!
//! The worker pool is created once by [`RevcompBuilder::build`] and reused for
//! every record until the processor is dropped.

use std::io::{Read, Write};

use log::{debug, info};
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::{
    chunk::{ChunkPool, DEFAULT_CHUNK_SIZE},
    error::ConfigError,
    layout::{RecordLayout, DEFAULT_LINE_WIDTH},
    reader::{carry_over, StrandReader},
    reverse::reverse_record,
    writer::StrandWriter,
    Result,
};

/// Measurements of one processed record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordStats {
    /// Header length including its newline
    pub title_len: usize,
    /// Number of sequence symbols
    pub data_len: usize,
    /// Record length in bytes, as read and as written
    pub total_len: usize,
    /// Number of chunks the record occupied
    pub chunks: usize,
}

/// Totals for a whole stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub records: usize,
    pub bytes: u64,
}
impl RunStats {
    fn add(&mut self, record: &RecordStats) {
        self.records += 1;
        self.bytes += record.total_len as u64;
    }
}

/// Builder for creating configured [`Revcomp`] processors
///
/// # Examples
///
/// ```
/// # use revcomp::{Result, RevcompBuilder};
/// # fn main() -> Result<()> {
/// let mut revcomp = RevcompBuilder::default()
///     .line_width(4)
///     .threads(2)
///     .build()?;
///
/// let mut output = Vec::new();
/// let stats = revcomp.process(&b">seq1\nAACG\nTTA\n"[..], &mut output)?;
/// assert_eq!(stats.records, 1);
/// assert_eq!(output, b">seq1\nTAAC\nGTT\n");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default, Clone)]
pub struct RevcompBuilder {
    /// Number of sequence symbols per line
    line_width: Option<usize>,
    /// Physical size of each chunk in bytes
    chunk_size: Option<usize>,
    /// Number of worker threads (0 uses all available cores)
    threads: Option<usize>,
}
impl RevcompBuilder {
    #[must_use]
    pub fn line_width(mut self, line_width: usize) -> Self {
        self.line_width = Some(line_width);
        self
    }

    #[must_use]
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = Some(chunk_size);
        self
    }

    #[must_use]
    pub fn threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    /// Validates the configuration and starts the worker pool
    ///
    /// # Errors
    ///
    /// Returns an error if the line width or chunk size is zero, or if the
    /// worker threads cannot be spawned.
    pub fn build(self) -> Result<Revcomp> {
        let line_width = self.line_width.unwrap_or(DEFAULT_LINE_WIDTH);
        if line_width == 0 {
            return Err(ConfigError::InvalidLineWidth(line_width).into());
        }
        let chunk_size = self.chunk_size.unwrap_or(DEFAULT_CHUNK_SIZE);
        if chunk_size == 0 {
            return Err(ConfigError::InvalidChunkSize(chunk_size).into());
        }
        let partitions = match self.threads.unwrap_or(0) {
            0 => num_cpus::get(),
            n => n,
        };

        let workers = ThreadPoolBuilder::new()
            .num_threads(partitions)
            .thread_name(|i| format!("revcomp-worker-{i}"))
            .build()?;

        debug!(
            "revcomp: line width {line_width}, chunk size {chunk_size}, {partitions} workers"
        );
        Ok(Revcomp {
            line_width,
            partitions,
            pool: ChunkPool::new(chunk_size),
            workers,
        })
    }
}

/// Streaming reverse-complement processor
///
/// Owns the reusable chunks and the worker pool. One processor can be used for
/// any number of streams, one at a time.
pub struct Revcomp {
    line_width: usize,
    partitions: usize,
    pool: ChunkPool,
    workers: ThreadPool,
}
impl Revcomp {
    /// Processor with the default line width, chunk size and thread count
    pub fn new() -> Result<Self> {
        RevcompBuilder::default().build()
    }

    #[must_use]
    pub fn line_width(&self) -> usize {
        self.line_width
    }

    #[must_use]
    pub fn chunk_size(&self) -> usize {
        self.pool.chunk_size()
    }

    /// Number of tasks each record is split into
    #[must_use]
    pub fn threads(&self) -> usize {
        self.partitions
    }

    /// Number of chunks allocated so far
    #[must_use]
    pub fn allocated_chunks(&self) -> usize {
        self.pool.allocated()
    }

    /// Reads, reverse-complements and writes the next record
    ///
    /// Returns `None` once the source is exhausted.
    ///
    /// # Errors
    ///
    /// Returns an error if reading or writing fails, or if the record is
    /// malformed. The pool is left in an unspecified state after an error.
    pub fn process_record<R: Read, W: Write>(
        &mut self,
        reader: &mut StrandReader<R>,
        writer: &mut StrandWriter<W>,
    ) -> Result<Option<RecordStats>> {
        let Some(chunks) = reader.read_record(&mut self.pool)? else {
            return Ok(None);
        };

        let layout = RecordLayout::analyze(&self.pool, self.line_width)?;
        reverse_record(&mut self.pool, &layout, &self.workers, self.partitions);
        let written = writer.write_record(&self.pool)?;
        carry_over(&mut self.pool);

        debug!(
            "record: title {} bytes, {} symbols, {} chunks",
            layout.title_len(),
            layout.data_len(),
            chunks
        );
        debug_assert_eq!(written, layout.total_len());

        Ok(Some(RecordStats {
            title_len: layout.title_len(),
            data_len: layout.data_len(),
            total_len: written,
            chunks,
        }))
    }

    /// Processes every record of `reader` into `writer`, then flushes it
    ///
    /// # Errors
    ///
    /// Fails on the first I/O error or malformed record.
    pub fn process<R: Read, W: Write>(&mut self, reader: R, writer: W) -> Result<RunStats> {
        let mut reader = StrandReader::new(reader);
        let mut writer = StrandWriter::new(writer);

        let mut stats = RunStats::default();
        while let Some(record) = self.process_record(&mut reader, &mut writer)? {
            stats.add(&record);
        }
        writer.flush()?;

        info!(
            "reverse-complemented {} records ({} bytes), {} chunks allocated",
            stats.records,
            stats.bytes,
            self.pool.allocated()
        );
        Ok(stats)
    }
}

/// Reverse-complements every record of `reader` with default settings
///
/// # Errors
///
/// Fails if the worker pool cannot be started, on the first I/O error, or on
/// a malformed record.
pub fn reverse_complement_stream<R: Read, W: Write>(reader: R, writer: W) -> Result<RunStats> {
    Revcomp::new()?.process(reader, writer)
}
