// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use std::path::Path;

use crate::errors::PipelineError;
use crate::seq::record::{SeqFile, SeqRecord};

pub const RECORD_MARKER: char = '>';

// Lines before the first header (if any) form a record with an empty header. Blank lines are
// skipped, and surrounding whitespace (including a stray '\r') is removed from sequence lines.
pub fn read_fasta_str(text: &str) -> SeqFile {
    let mut result: SeqFile = Vec::new();
    let mut current_record: Option<SeqRecord> = None;

    for l in text.lines() {
        if let Some(hdr) = l.strip_prefix(RECORD_MARKER) {
            if let Some(rec) = current_record.take() {
                result.push(rec);
            }
            current_record = Some(SeqRecord {
                header: hdr.trim_end().to_string(),
                sequence: String::new(),
            });
        } else {
            let bases = l.trim();
            if bases.is_empty() {
                continue;
            }
            // append line to current record's sequence
            current_record
                .get_or_insert_with(|| SeqRecord {
                    header: String::new(),
                    sequence: String::new(),
                })
                .sequence
                .push_str(bases);
        }
    }
    if let Some(rec) = current_record {
        result.push(rec);
    }
    result
}

/// Reads a FastA file, replacing any invalid UTF-8 rather than failing.
pub fn read_fasta_file<P: AsRef<Path>>(path: P) -> Result<SeqFile, PipelineError> {
    let text = read_lossy(path)?;
    Ok(read_fasta_str(&text))
}

pub fn read_lossy<P: AsRef<Path>>(path: P) -> Result<String, PipelineError> {
    let bytes = std::fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
