//! Property-based tests for the streaming reverse-complement transformer.
//!
//! Random multi-record streams are pushed through the transformer with small
//! chunk sizes, so most records span several chunks, and compared against a
//! naive single-threaded reference.

mod common;

use common::{expected, fasta, run, Record};
use proptest::prelude::*;
use revcomp::{complement, COMPLEMENT};

const ALPHABET: &[u8] = b"ACGTACGTACGTNacgtnRYKMBDHVSWU";

/// Header text, `>` included to check it is not taken for a record start
fn arb_header() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_ |>.:-]{0,24}"
}

fn arb_seq(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(prop::sample::select(ALPHABET.to_vec()), 0..max_len)
}

fn arb_records(max_len: usize) -> impl Strategy<Value = Vec<Record>> {
    prop::collection::vec(
        (arb_header(), arb_seq(max_len)).prop_map(|(header, seq)| Record {
            header: header.into_bytes(),
            seq,
        }),
        1..5,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(96))]

    #[test]
    fn prop_complement_is_an_involution(b in any::<u8>()) {
        prop_assert_eq!(complement(complement(b)), b);
        if b >= 128 {
            prop_assert_eq!(complement(b), b);
        }
        if !COMPLEMENT.is_defined(b) {
            prop_assert_eq!(complement(b), b);
        }
    }

    #[test]
    fn prop_matches_reference(
        records in arb_records(300),
        width in 1usize..24,
        chunk_size in 4usize..72,
        threads in 1usize..6,
        last_terminated in any::<bool>(),
    ) {
        let input = fasta(&records, width, last_terminated);
        let output = run(&input, width, chunk_size, threads).unwrap();
        prop_assert_eq!(output.len(), input.len());
        prop_assert_eq!(output, expected(&records, width, last_terminated));
    }

    #[test]
    fn prop_reverse_twice_restores_input(
        records in arb_records(400),
        width in 1usize..70,
        chunk_size in 8usize..128,
        threads in 1usize..9,
    ) {
        let input = fasta(&records, width, true);
        let once = run(&input, width, chunk_size, threads).unwrap();
        let twice = run(&once, width, chunk_size, threads).unwrap();
        prop_assert_eq!(twice, input);
    }

    #[test]
    fn prop_worker_count_does_not_change_output(
        records in arb_records(600),
        width in 1usize..61,
        chunk_size in 16usize..96,
    ) {
        let input = fasta(&records, width, true);
        let single = run(&input, width, chunk_size, 1).unwrap();
        for threads in [2, 8] {
            let parallel = run(&input, width, chunk_size, threads).unwrap();
            prop_assert_eq!(&parallel, &single);
        }
    }

    #[test]
    fn prop_headers_and_line_breaks_are_kept(
        records in arb_records(200),
        width in 1usize..30,
        chunk_size in 4usize..48,
    ) {
        let input = fasta(&records, width, true);
        let output = run(&input, width, chunk_size, 3).unwrap();

        let lines_in: Vec<&[u8]> = input.split(|&b| b == b'\n').collect();
        let lines_out: Vec<&[u8]> = output.split(|&b| b == b'\n').collect();
        prop_assert_eq!(lines_in.len(), lines_out.len());
        for (a, b) in lines_in.iter().zip(&lines_out) {
            prop_assert_eq!(a.len(), b.len());
            if a.first() == Some(&b'>') {
                prop_assert_eq!(a, b);
            }
        }
    }
}
