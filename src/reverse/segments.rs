use std::mem;

use crate::{chunk::NEW_LINE, complement::ComplementTable, layout::Cursor};

/// A run of physical bytes, possibly spread over several chunks
///
/// The pieces are exclusive borrows of disjoint parts of the chunk buffers,
/// in physical order.
#[derive(Debug, Default)]
pub struct Segments<'a> {
    pieces: Vec<&'a mut [u8]>,
}
impl Segments<'_> {
    /// Total number of bytes, newlines included
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.pieces.iter().map(|p| p.len()).sum()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.pieces.iter().all(|p| p.is_empty())
    }

    /// Number of sequence symbols (newlines excluded)
    #[must_use]
    pub fn symbols(&self) -> usize {
        self.pieces
            .iter()
            .map(|p| p.iter().filter(|&&b| b != NEW_LINE).count())
            .sum()
    }

    /// Complements every non-newline byte in place
    pub fn complement_in_place(&mut self, table: &ComplementTable) {
        self.pieces
            .iter_mut()
            .flat_map(|p| p.iter_mut())
            .filter(|b| **b != NEW_LINE)
            .for_each(|b| *b = table.complement(*b));
    }

    /// Walks `self` forward and `right` backward, skipping newlines on both
    /// sides, and swaps the complements of every aligned pair of symbols.
    pub fn swap_mirrored(&mut self, right: &mut Segments<'_>, table: &ComplementTable) {
        let forward = self
            .pieces
            .iter_mut()
            .flat_map(|p| p.iter_mut())
            .filter(|b| **b != NEW_LINE);
        let backward = right
            .pieces
            .iter_mut()
            .rev()
            .flat_map(|p| p.iter_mut().rev())
            .filter(|b| **b != NEW_LINE);

        for (l, r) in forward.zip(backward) {
            let original = *l;
            *l = table.complement(*r);
            *r = table.complement(original);
        }
    }
}

/// Hands out consecutive, non-overlapping byte ranges of a record's chunks
///
/// Ranges must be requested in increasing physical order; every range taken is
/// an exclusive borrow that can be sent to a different worker.
pub struct Carver<'a> {
    chunks: std::vec::IntoIter<&'a mut [u8]>,
    current: &'a mut [u8],
    at: Cursor,
}
impl<'a> Carver<'a> {
    /// `chunks` are the record bytes of each active chunk, in order
    #[must_use]
    pub fn new(chunks: Vec<&'a mut [u8]>) -> Self {
        let mut chunks = chunks.into_iter();
        let current = chunks.next().unwrap_or_default();
        Self {
            chunks,
            current,
            at: Cursor::new(0, 0),
        }
    }

    /// Takes the bytes in `[from, to)`, discarding anything before `from`
    pub fn take(&mut self, from: Cursor, to: Cursor) -> Segments<'a> {
        self.advance(from);
        Segments {
            pieces: self.advance(to),
        }
    }

    /// Moves the cursor up to `to`, returning the bytes passed over
    fn advance(&mut self, to: Cursor) -> Vec<&'a mut [u8]> {
        let mut pieces = Vec::new();
        while self.at < to {
            if self.at.chunk < to.chunk {
                let rest = mem::take(&mut self.current);
                if !rest.is_empty() {
                    pieces.push(rest);
                }
                match self.chunks.next() {
                    Some(next) => {
                        self.current = next;
                        self.at = Cursor::new(self.at.chunk + 1, 0);
                    }
                    None => break,
                }
            } else {
                let n = (to.offset - self.at.offset).min(self.current.len());
                if n == 0 {
                    break;
                }
                let (head, tail) = mem::take(&mut self.current).split_at_mut(n);
                self.current = tail;
                self.at.offset += n;
                pieces.push(head);
            }
        }
        pieces
    }
}

#[cfg(test)]
mod testing {
    use super::*;
    use crate::complement::COMPLEMENT;

    fn bytes(segments: &Segments) -> Vec<u8> {
        segments
            .pieces
            .iter()
            .flat_map(|p| p.iter().copied())
            .collect()
    }

    #[test]
    fn test_carve_across_chunks() {
        let mut a = *b"0123";
        let mut b = *b"4567";
        let mut c = *b"89";
        let mut carver = Carver::new(vec![&mut a[..], &mut b[..], &mut c[..]]);

        let first = carver.take(Cursor::new(0, 1), Cursor::new(0, 3));
        let second = carver.take(Cursor::new(0, 3), Cursor::new(2, 1));
        let third = carver.take(Cursor::new(2, 1), Cursor::new(2, 2));
        assert_eq!(bytes(&first), b"12");
        assert_eq!(bytes(&second), b"345678");
        assert_eq!(second.pieces.len(), 3);
        assert_eq!(bytes(&third), b"9");
    }

    #[test]
    fn test_carve_to_chunk_end() {
        let mut a = *b"0123";
        let mut b = *b"45";
        let mut carver = Carver::new(vec![&mut a[..], &mut b[..]]);

        let whole = carver.take(Cursor::new(0, 2), Cursor::new(0, 3).step_forward(4));
        assert_eq!(bytes(&whole), b"23");
        let next = carver.take(Cursor::new(1, 0), Cursor::new(1, 2));
        assert_eq!(bytes(&next), b"45");
    }

    #[test]
    fn test_carve_past_end_is_clamped() {
        let mut a = *b"01";
        let mut carver = Carver::new(vec![&mut a[..]]);
        let all = carver.take(Cursor::new(0, 0), Cursor::new(3, 0));
        assert_eq!(bytes(&all), b"01");
        assert!(carver.take(Cursor::new(4, 0), Cursor::new(5, 0)).is_empty());
    }

    #[test]
    fn test_swap_mirrored_skips_newlines() {
        let mut left = *b"AAC\nG";
        let mut right = *b"T\nGGA";
        let mut l = Segments {
            pieces: vec![&mut left[..]],
        };
        let mut r = Segments {
            pieces: vec![&mut right[..]],
        };
        l.swap_mirrored(&mut r, &COMPLEMENT);
        assert_eq!(&left, b"TCC\nA");
        assert_eq!(&right, b"C\nGTT");
    }

    #[test]
    fn test_swap_mirrored_across_pieces() {
        let mut left = *b"AC\nG";
        let mut right_a = *b"TT";
        let mut right_b = *b"\nA";
        let mut l = Segments {
            pieces: vec![&mut left[..]],
        };
        let mut r = Segments {
            pieces: vec![&mut right_a[..], &mut right_b[..]],
        };
        l.swap_mirrored(&mut r, &COMPLEMENT);
        // left ACG pairs with right A, T, T (walking backward)
        assert_eq!(&left, b"TA\nA");
        assert_eq!(&right_a, b"CG");
        assert_eq!(&right_b, b"\nT");
    }

    #[test]
    fn test_complement_in_place() {
        let mut buf = *b"AC\nGT";
        let mut segments = Segments {
            pieces: vec![&mut buf[..]],
        };
        segments.complement_in_place(&COMPLEMENT);
        assert_eq!(segments.len(), 5);
        assert_eq!(&buf, b"TG\nCA");
    }
}
