//! Shared fixtures: a naive reverse-complement reference and a FASTA formatter
#![allow(dead_code)]

use revcomp::{Result, RevcompBuilder};

/// A record before formatting: header text (without `>`) and sequence symbols
#[derive(Debug, Clone)]
pub struct Record {
    pub header: Vec<u8>,
    pub seq: Vec<u8>,
}
impl Record {
    pub fn new(header: &str, seq: &[u8]) -> Self {
        Self {
            header: header.as_bytes().to_vec(),
            seq: seq.to_vec(),
        }
    }
}

/// Complement written out pair by pair, independent of the crate's table
pub fn naive_complement(b: u8) -> u8 {
    match b {
        b'A' => b'T',
        b'T' => b'A',
        b'C' => b'G',
        b'G' => b'C',
        b'R' => b'Y',
        b'Y' => b'R',
        b'K' => b'M',
        b'M' => b'K',
        b'B' => b'V',
        b'V' => b'B',
        b'D' => b'H',
        b'H' => b'D',
        b'a' => b't',
        b't' => b'a',
        b'c' => b'g',
        b'g' => b'c',
        b'r' => b'y',
        b'y' => b'r',
        b'k' => b'm',
        b'm' => b'k',
        b'b' => b'v',
        b'v' => b'b',
        b'd' => b'h',
        b'h' => b'd',
        other => other,
    }
}

pub fn naive_reverse_complement(seq: &[u8]) -> Vec<u8> {
    seq.iter().rev().map(|&b| naive_complement(b)).collect()
}

/// Formats records as FASTA wrapped at `width`
///
/// Only the final line of the final record may be left without a newline.
pub fn fasta(records: &[Record], width: usize, last_terminated: bool) -> Vec<u8> {
    let mut out = Vec::new();
    for (r, record) in records.iter().enumerate() {
        out.push(b'>');
        out.extend_from_slice(&record.header);
        out.push(b'\n');

        let lines = record.seq.len().div_ceil(width);
        for (i, line) in record.seq.chunks(width).enumerate() {
            out.extend_from_slice(line);
            let final_line = r + 1 == records.len() && i + 1 == lines;
            if !final_line || last_terminated {
                out.push(b'\n');
            }
        }
    }
    out
}

/// What the transformer must produce for `records`
pub fn expected(records: &[Record], width: usize, last_terminated: bool) -> Vec<u8> {
    let reversed: Vec<Record> = records
        .iter()
        .map(|r| Record {
            header: r.header.clone(),
            seq: naive_reverse_complement(&r.seq),
        })
        .collect();
    fasta(&reversed, width, last_terminated)
}

pub fn run(input: &[u8], width: usize, chunk_size: usize, threads: usize) -> Result<Vec<u8>> {
    let mut revcomp = RevcompBuilder::default()
        .line_width(width)
        .chunk_size(chunk_size)
        .threads(threads)
        .build()?;
    let mut output = Vec::with_capacity(input.len());
    revcomp.process(input, &mut output)?;
    Ok(output)
}
