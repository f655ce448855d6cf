//! # Parallel mirror reversal
//!
//! Reverse-complements the sequence of the record held in a [`ChunkPool`] in
//! place, without moving any newline.
//!
//! ## Partitioning
//!
//! With `n` sequence symbols, data index `d < n / 2` is paired with its mirror
//! `n - 1 - d`. The chunks holding the left half (`0..=left_end_chunk`) are
//! split into contiguous, equally sized ranges, one per worker. For each chunk
//! index `i` in its range a worker derives, purely from `i`:
//!
//! 1. the left data range stored in chunk `i` (clamped to `n / 2`)
//! 2. the mirrored right data range, which may live in other chunks
//!
//! and then walks the two ranges inward, skipping newlines on both sides.
//! When `n` is odd the middle symbol has no partner and is complemented by the
//! task that owns the boundary chunk.
//!
//! ## Ownership
//!
//! Left ranges of different chunks are disjoint and the mirror map is strictly
//! decreasing, so every range is a distinct set of bytes. [`MirrorPlan::carve`]
//! turns the ranges into exclusive sub-slices taken in physical order, so each
//! worker only ever holds `&mut` borrows nobody else has. The only
//! synchronisation is the fork-join barrier at the end of
//! [`rayon::ThreadPool::scope`].

mod segments;

use std::ops::Range;

use log::trace;
use rayon::ThreadPool;

pub(crate) use segments::{Carver, Segments};

use crate::{
    chunk::{Chunk, ChunkPool},
    complement::{ComplementTable, COMPLEMENT},
    layout::RecordLayout,
};

/// Splits `count` chunk indices into `workers` contiguous ranges
///
/// Every range has `ceil(count / workers)` indices except the trailing ones,
/// which may be shorter or empty.
#[must_use]
pub fn partition(count: usize, workers: usize) -> Vec<Range<usize>> {
    let workers = workers.max(1);
    let per_worker = count.div_ceil(workers);
    (0..workers)
        .map(|tid| {
            let start = (tid * per_worker).min(count);
            let end = (start + per_worker).min(count);
            start..end
        })
        .collect()
}

/// Left data range held by one chunk and the mirrored right range it swaps with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorSpan {
    pub chunk: usize,
    pub left: Range<usize>,
    pub right: Range<usize>,
}

/// The spans assigned to one worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorTask {
    pub chunks: Range<usize>,
    pub spans: Vec<MirrorSpan>,
}

/// Static assignment of a record's mirrored swaps to workers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorPlan {
    tasks: Vec<MirrorTask>,
    middle: Option<usize>,
    left_end_chunk: Option<usize>,
}
impl MirrorPlan {
    #[must_use]
    pub fn new(layout: &RecordLayout, workers: usize) -> Self {
        let n = layout.data_len();
        let half = n / 2;
        let middle = (n % 2 == 1).then_some(half);
        if half == 0 {
            return Self {
                tasks: Vec::new(),
                middle,
                left_end_chunk: None,
            };
        }

        let left_end_chunk = layout.locate(half - 1).chunk;
        let tasks = partition(left_end_chunk + 1, workers)
            .into_iter()
            .map(|chunks| MirrorTask {
                spans: chunks.clone().map(|i| Self::span(layout, i, half)).collect(),
                chunks,
            })
            .collect();

        Self {
            tasks,
            middle,
            left_end_chunk: Some(left_end_chunk),
        }
    }

    fn span(layout: &RecordLayout, chunk: usize, half: usize) -> MirrorSpan {
        let n = layout.data_len();
        let size = layout.chunk_size();
        let lo = layout.data_index_at(chunk * size).min(half);
        let hi = layout.data_index_at((chunk + 1) * size).min(half);
        MirrorSpan {
            chunk,
            left: lo..hi,
            right: n - hi..n - lo,
        }
    }

    #[must_use]
    pub fn tasks(&self) -> &[MirrorTask] {
        &self.tasks
    }

    /// Data index of the unpaired middle symbol, if the length is odd
    #[must_use]
    pub fn middle(&self) -> Option<usize> {
        self.middle
    }

    /// Chunk holding the last left-half symbol
    #[must_use]
    pub fn left_end_chunk(&self) -> Option<usize> {
        self.left_end_chunk
    }

    /// Borrows every planned range out of `chunks`, one job per task
    ///
    /// `chunks` are the record bytes of each active chunk, in order. Ranges are
    /// carved in physical order: all left spans, the middle symbol, then all
    /// right spans (which appear in reverse task order).
    #[must_use]
    pub fn carve<'a>(&self, layout: &RecordLayout, chunks: Vec<&'a mut [u8]>) -> Vec<MirrorJob<'a>> {
        let mut carver = Carver::new(chunks);

        let mut lefts = Vec::with_capacity(self.tasks.len());
        for task in &self.tasks {
            let segments: Vec<_> = task
                .spans
                .iter()
                .map(|span| take_range(&mut carver, layout, &span.left))
                .collect();
            lefts.push(segments);
        }

        let middle = self
            .middle
            .map(|m| take_range(&mut carver, layout, &(m..m + 1)));

        let mut rights = Vec::with_capacity(self.tasks.len());
        for task in self.tasks.iter().rev() {
            let mut segments: Vec<_> = task
                .spans
                .iter()
                .rev()
                .map(|span| take_range(&mut carver, layout, &span.right))
                .collect();
            segments.reverse();
            rights.push(segments);
        }
        rights.reverse();

        let mut jobs: Vec<MirrorJob<'a>> = lefts
            .into_iter()
            .zip(rights)
            .map(|(left, right)| MirrorJob {
                pairs: left.into_iter().zip(right).collect(),
                middle: None,
            })
            .collect();

        if let Some(middle) = middle {
            let owner = self
                .left_end_chunk
                .and_then(|c| self.tasks.iter().position(|t| t.chunks.contains(&c)));
            match owner {
                Some(tid) => jobs[tid].middle = Some(middle),
                None => jobs.push(MirrorJob {
                    pairs: Vec::new(),
                    middle: Some(middle),
                }),
            }
        }

        jobs
    }
}

/// Carves the physical bytes spanned by a data range
fn take_range<'a>(
    carver: &mut Carver<'a>,
    layout: &RecordLayout,
    range: &Range<usize>,
) -> Segments<'a> {
    if range.is_empty() {
        return Segments::default();
    }
    let from = layout.locate(range.start);
    let to = layout.locate(range.end - 1).step_forward(layout.chunk_size());
    carver.take(from, to)
}

/// The bytes one worker mutates, exclusively borrowed
#[derive(Debug)]
pub struct MirrorJob<'a> {
    pairs: Vec<(Segments<'a>, Segments<'a>)>,
    middle: Option<Segments<'a>>,
}
impl MirrorJob<'_> {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty() && self.middle.is_none()
    }

    pub fn run(mut self, table: &ComplementTable) {
        for (left, right) in &mut self.pairs {
            debug_assert_eq!(left.symbols(), right.symbols());
            left.swap_mirrored(right, table);
        }
        if let Some(middle) = &mut self.middle {
            middle.complement_in_place(table);
        }
    }
}

/// Reverse-complements the record held by the active chunks of `pool`
///
/// The work is split into `partitions` tasks executed on `workers`; this call
/// returns once every task has finished.
pub fn reverse_record(
    pool: &mut ChunkPool,
    layout: &RecordLayout,
    workers: &ThreadPool,
    partitions: usize,
) {
    let plan = MirrorPlan::new(layout, partitions);
    trace!(
        "mirror plan: {} symbols, boundary chunk {:?}, {} tasks",
        layout.data_len(),
        plan.left_end_chunk(),
        plan.tasks().len()
    );

    let chunks = pool.chunks_mut().iter_mut().map(Chunk::data_mut).collect();
    let jobs = plan.carve(layout, chunks);

    workers.scope(|scope| {
        for job in jobs.into_iter().filter(|job| !job.is_empty()) {
            scope.spawn(move |_| job.run(&COMPLEMENT));
        }
    });
}
