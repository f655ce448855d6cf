//! # revcomp
//!
//! Streaming, parallel reverse-complement of multi-record FASTA streams.
//!
//! Every record (a `>` header line followed by fixed-width sequence lines) is
//! written back with its header untouched and its sequence
//! reverse-complemented in place, keeping the line breaks where they were. The
//! byte count of each record is preserved.
//!
//! Records are read into a pool of reusable fixed-size chunks, so memory is
//! bounded by the largest record rather than by the stream. The reversal of a
//! record is split over a fixed worker pool; the result does not depend on the
//! number of workers.
//!
//! ```
//! # use revcomp::Result;
//! # fn main() -> Result<()> {
//! let input = b">R1 first\nACGTA\n>R2 second\nAAAA\n";
//! let mut output = Vec::new();
//! let stats = revcomp::reverse_complement_stream(&input[..], &mut output)?;
//!
//! assert_eq!(stats.records, 2);
//! assert_eq!(output, b">R1 first\nTACGT\n>R2 second\nTTTT\n");
//! # Ok(())
//! # }
//! ```

mod chunk;
mod complement;
mod error;
mod layout;
mod processor;
mod reader;
mod reverse;
mod writer;

pub use chunk::{Chunk, ChunkPool, DEFAULT_CHUNK_SIZE, HEADER_MARKER, NEW_LINE};
pub use complement::{complement, ComplementTable, COMPLEMENT};
pub use error::{ConfigError, Error, ReadError, Result};
pub use layout::{Cursor, RecordLayout, DEFAULT_LINE_WIDTH};
pub use processor::{reverse_complement_stream, RecordStats, Revcomp, RevcompBuilder, RunStats};
pub use reader::{carry_over, StrandReader};
pub use reverse::{partition, reverse_record, MirrorJob, MirrorPlan, MirrorSpan, MirrorTask};
pub use writer::StrandWriter;
