//! Nucleotide complement lookup
//!
//! A 128-entry table mapping each ASCII symbol to its complementary symbol.
//! Both cases and the IUPAC ambiguity codes are covered; case is preserved so
//! the table is an involution. Bytes without a defined partner (including every
//! byte at or above 128) map to themselves.

/// Symbol pairs, upper case only; lower case is derived.
const PAIRS: [(u8, u8); 9] = [
    (b'A', b'T'),
    (b'C', b'G'),
    (b'R', b'Y'),
    (b'K', b'M'),
    (b'B', b'V'),
    (b'D', b'H'),
    (b'S', b'S'),
    (b'W', b'W'),
    (b'N', b'N'),
];

/// Process-wide complement table
pub static COMPLEMENT: ComplementTable = ComplementTable::new();

/// Immutable symbol-to-complement lookup table
#[derive(Debug, Clone, Copy)]
pub struct ComplementTable {
    table: [u8; 128],
}
impl ComplementTable {
    /// Builds the table at compile time
    #[must_use]
    pub const fn new() -> Self {
        let mut table = [0u8; 128];
        let mut i = 0;
        while i < table.len() {
            table[i] = i as u8;
            i += 1;
        }

        let mut p = 0;
        while p < PAIRS.len() {
            let (a, b) = PAIRS[p];
            table[a as usize] = b;
            table[b as usize] = a;
            table[a.to_ascii_lowercase() as usize] = b.to_ascii_lowercase();
            table[b.to_ascii_lowercase() as usize] = a.to_ascii_lowercase();
            p += 1;
        }

        Self { table }
    }

    /// Retrieves the complement for `byte`.
    #[inline]
    #[must_use]
    pub fn complement(&self, byte: u8) -> u8 {
        match self.table.get(byte as usize) {
            Some(&c) => c,
            None => byte,
        }
    }

    /// Returns `true` if `byte` has a partner other than itself or is a
    /// self-paired symbol (S, W, N).
    #[must_use]
    pub fn is_defined(&self, byte: u8) -> bool {
        let upper = byte.to_ascii_uppercase();
        PAIRS.iter().any(|&(a, b)| a == upper || b == upper)
    }
}
impl Default for ComplementTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Complements a single symbol using the process-wide table
#[inline]
#[must_use]
pub fn complement(byte: u8) -> u8 {
    COMPLEMENT.complement(byte)
}

#[cfg(test)]
mod testing {
    use super::*;

    #[test]
    fn test_watson_crick_pairs() {
        assert_eq!(complement(b'A'), b'T');
        assert_eq!(complement(b'T'), b'A');
        assert_eq!(complement(b'C'), b'G');
        assert_eq!(complement(b'G'), b'C');
    }

    #[test]
    fn test_case_is_preserved() {
        assert_eq!(complement(b'a'), b't');
        assert_eq!(complement(b'g'), b'c');
        assert_eq!(complement(b'y'), b'r');
        assert_eq!(complement(b'n'), b'n');
    }

    #[test]
    fn test_ambiguity_codes() {
        for (a, b) in [(b'R', b'Y'), (b'K', b'M'), (b'B', b'V'), (b'D', b'H')] {
            assert_eq!(complement(a), b);
            assert_eq!(complement(b), a);
        }
        for s in [b'S', b'W', b'N'] {
            assert_eq!(complement(s), s);
        }
    }

    #[test]
    fn test_involution_over_all_bytes() {
        for b in 0..=u8::MAX {
            assert_eq!(complement(complement(b)), b, "byte {b:#04x}");
        }
    }

    #[test]
    fn test_undefined_bytes_pass_through() {
        for b in [b'\n', b'>', b'U', b'u', b'X', b'-', b'*', 0x00, 0x7f, 0x80, 0xff] {
            assert!(!COMPLEMENT.is_defined(b));
            assert_eq!(complement(b), b);
        }
    }

    #[test]
    fn test_defined_alphabet() {
        let defined = (0..=u8::MAX)
            .filter(|&b| COMPLEMENT.is_defined(b))
            .count();
        // 15 symbols, both cases
        assert_eq!(defined, 30);
    }
}
