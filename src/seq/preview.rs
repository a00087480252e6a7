// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Peter Carlton

use std::fmt;
use std::path::Path;

use crate::errors::PipelineError;
use crate::seq::fasta::{read_lossy, RECORD_MARKER};

pub const PREVIEW_BASES: usize = 40;

/// What the user gets to see of an input file after a run: its first header line, the total
/// number of bases (over all records), and the first few bases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeqPreview {
    pub header: String,
    pub length: usize,
    pub prefix: String,
}

impl fmt::Display for SeqPreview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}  (len {}) -> {}...", self.header, self.length, self.prefix)
    }
}

pub fn peek_fasta_str(text: &str, n: usize) -> SeqPreview {
    let header = text
        .lines()
        .find(|l| l.starts_with(RECORD_MARKER))
        .map(|l| l.trim().to_string())
        .unwrap_or_else(|| String::from(">?"));
    let seq: String = text
        .lines()
        .filter(|l| !l.starts_with(RECORD_MARKER))
        .map(str::trim)
        .collect();
    SeqPreview {
        header,
        length: seq.chars().count(),
        prefix: seq.chars().take(n).collect(),
    }
}

pub fn peek_fasta<P: AsRef<Path>>(path: P, n: usize) -> Result<SeqPreview, PipelineError> {
    Ok(peek_fasta_str(&read_lossy(path)?, n))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peek_file() {
        let pv = peek_fasta("tests/data/subject50.fa", 10).expect("Test file not found");
        assert_eq!(pv.header, ">subject1 synthetic 50-mer");
        assert_eq!(pv.length, 50);
        assert_eq!(pv.prefix, "ATGGCTAGCT");
    }

    #[test]
    fn test_peek_counts_all_records() {
        let pv = peek_fasta_str(">a\nACGT\n>b\nGG\n", PREVIEW_BASES);
        assert_eq!(pv.header, ">a");
        assert_eq!(pv.length, 6);
        assert_eq!(pv.prefix, "ACGTGG");
    }

    #[test]
    fn test_peek_no_header() {
        let pv = peek_fasta_str("", PREVIEW_BASES);
        assert_eq!(pv.header, ">?");
        assert_eq!(pv.length, 0);
        assert_eq!(pv.to_string(), ">?  (len 0) -> ...");
    }
}
