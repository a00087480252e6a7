// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

// A FastA record: the header line without its leading '>', and the bases of all following lines
// concatenated.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeqRecord {
    pub header: String,
    pub sequence: String,
}

impl SeqRecord {
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}

// For our purposes, a sequence file is just a Vec of sequence records.
pub type SeqFile = Vec<SeqRecord>;
