//! Reusable fixed-size byte buffers
//!
//! A record is held as a prefix of the chunks in a [`ChunkPool`]. Chunks are
//! allocated lazily the first time a record needs them and are only ever
//! cleared afterwards, so memory stays bounded by the largest record seen
//! rather than by the length of the stream.

use memchr::memchr_iter;

/// Default physical size of a chunk (64 KiB)
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Record header marker
pub const HEADER_MARKER: u8 = b'>';

/// Line terminator
pub const NEW_LINE: u8 = b'\n';

/// A fixed-size buffer holding a contiguous slice of one record
///
/// * `capacity` is the number of bytes read into the chunk this cycle
/// * `length` is the number of those bytes belonging to the current record
///
/// The bytes in `length..capacity` are the start of the next record.
#[derive(Debug)]
pub struct Chunk {
    bytes: Box<[u8]>,
    capacity: usize,
    length: usize,
}
impl Chunk {
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self {
            bytes: vec![0; size].into_boxed_slice(),
            capacity: 0,
            length: 0,
        }
    }

    /// Physical size of the backing buffer
    #[must_use]
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn length(&self) -> usize {
        self.length
    }

    /// Whether every physical byte has been read into
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.capacity == self.bytes.len()
    }

    /// Whether a record boundary was found inside this chunk
    #[must_use]
    pub fn is_last(&self) -> bool {
        self.length != self.capacity
    }

    /// Bytes belonging to the current record
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.bytes[..self.length]
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.bytes[..self.length]
    }

    /// Bytes read past the current record
    #[must_use]
    pub fn tail(&self) -> &[u8] {
        &self.bytes[self.length..self.capacity]
    }

    /// The unread part of the buffer
    pub(crate) fn spare_mut(&mut self) -> &mut [u8] {
        &mut self.bytes[self.capacity..]
    }

    /// Records `n` freshly read bytes
    pub(crate) fn advance(&mut self, n: usize) {
        self.capacity += n;
        debug_assert!(self.capacity <= self.bytes.len());
    }

    /// Resets the chunk without releasing its buffer
    pub fn clear(&mut self) {
        self.capacity = 0;
        self.length = 0;
    }

    /// Sets `length` to the first record boundary in `from..capacity`.
    ///
    /// A boundary is a `>` at the start of a line. `previous` is the byte
    /// preceding offset 0 (the last byte of the previous chunk), if any.
    /// Without a boundary the whole of `capacity` belongs to the record.
    pub(crate) fn correct_length(&mut self, from: usize, previous: Option<u8>) {
        let from = from.min(self.capacity);
        let region = &self.bytes[from..self.capacity];
        let boundary = memchr_iter(HEADER_MARKER, region)
            .map(|pos| pos + from)
            .find(|&pos| {
                let before = if pos == 0 {
                    previous
                } else {
                    Some(self.bytes[pos - 1])
                };
                before == Some(NEW_LINE)
            });
        self.length = boundary.unwrap_or(self.capacity);
    }

    /// Moves `bytes` to the front of this chunk as a carried-over record start
    pub(crate) fn load_front(&mut self, bytes: &[u8]) {
        self.bytes[..bytes.len()].copy_from_slice(bytes);
        self.capacity = bytes.len();
        self.length = bytes.len();
    }

    /// Moves this chunk's own tail to its front
    pub(crate) fn shift_tail_to_front(&mut self) {
        let tail = self.capacity - self.length;
        self.bytes.copy_within(self.length..self.capacity, 0);
        self.capacity = tail;
        self.length = tail;
    }
}

/// An arena of [`Chunk`]s addressed by index
///
/// The first [`active`](ChunkPool::active) chunks hold the current record.
/// Chunks are never freed until the pool itself is dropped.
#[derive(Debug)]
pub struct ChunkPool {
    chunks: Vec<Chunk>,
    chunk_size: usize,
    active: usize,
}
impl ChunkPool {
    #[must_use]
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunks: Vec::new(),
            chunk_size,
            active: 0,
        }
    }

    #[must_use]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Number of chunks holding the current record
    #[must_use]
    pub fn active(&self) -> usize {
        self.active
    }

    pub(crate) fn set_active(&mut self, active: usize) {
        debug_assert!(active <= self.chunks.len());
        self.active = active;
    }

    /// Number of chunks allocated so far
    #[must_use]
    pub fn allocated(&self) -> usize {
        self.chunks.len()
    }

    /// Returns the chunk at `index`, allocating new chunks as needed
    pub fn acquire(&mut self, index: usize) -> &mut Chunk {
        while self.chunks.len() <= index {
            self.chunks.push(Chunk::new(self.chunk_size));
        }
        &mut self.chunks[index]
    }

    /// Resets the chunk at `index`, keeping its buffer
    pub fn clear(&mut self, index: usize) {
        if let Some(chunk) = self.chunks.get_mut(index) {
            chunk.clear();
        }
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Chunk> {
        self.chunks.get(index)
    }

    /// The chunks holding the current record
    #[must_use]
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks[..self.active]
    }

    pub fn chunks_mut(&mut self) -> &mut [Chunk] {
        &mut self.chunks[..self.active]
    }

    /// Sum of the active chunks' record lengths
    #[must_use]
    pub fn total_length(&self) -> usize {
        self.chunks().iter().map(Chunk::length).sum()
    }

    /// Splits the pool at `index` into the chunks before it and the chunk itself
    pub(crate) fn split_at_mut(&mut self, index: usize) -> (&mut [Chunk], &mut Chunk) {
        let (head, rest) = self.chunks.split_at_mut(index);
        (head, &mut rest[0])
    }
}
