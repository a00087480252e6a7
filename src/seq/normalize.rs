// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Peter Carlton

use std::path::Path;
use std::sync::OnceLock;

use log::{debug, warn};
use regex::Regex;

use crate::errors::PipelineError;
use crate::seq::fasta::RECORD_MARKER;

pub const SYNTHETIC_HEADER: &str = ">seq1";

// IUPAC nucleotide codes, plus gap and stop.
fn nucleotide_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^[ACGTUNRYKMSWBDHV*-]+$").expect("valid nucleotide regex"))
}

/// Canonicalizes raw FastA text: CRLF (or lone CR) line endings become LF, surrounding whitespace
/// goes, and a synthetic header is prepended if the text does not start with one.
///
/// Fails with `InvalidInput` if nothing is left after trimming.
pub fn normalize_fasta(text: &str) -> Result<String, PipelineError> {
    let txt = text.replace("\r\n", "\n").replace('\r', "\n");
    let txt = txt.trim();
    if txt.is_empty() {
        return Err(PipelineError::InvalidInput(String::from("Empty FASTA text.")));
    }
    let normalized = if txt.starts_with(RECORD_MARKER) {
        txt.to_string()
    } else {
        debug!("No header line; prepending {}", SYNTHETIC_HEADER);
        format!("{}\n{}", SYNTHETIC_HEADER, txt)
    };
    if let Some(lineno) = first_non_nucleotide_line(&normalized) {
        warn!(
            "Line {} contains characters outside the nucleotide alphabet",
            lineno
        );
    }
    Ok(normalized)
}

/// Normalizes `text` and writes it to `path`, creating parent directories as needed. Returns the
/// normalized text.
pub fn write_fasta<P: AsRef<Path>>(text: &str, path: P) -> Result<String, PipelineError> {
    let normalized = normalize_fasta(text)?;
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, &normalized)?;
    debug!("Wrote {} bytes to {}", normalized.len(), path.display());
    Ok(normalized)
}

/// Number of bases in the first record of `text`: the non-whitespace characters on the lines
/// after the first header, up to the next header. Base lines before any header count as an
/// implicit first record, so the result is the same before and after `normalize_fasta`.
/// Characters outside the nucleotide alphabet are counted too; `normalize_fasta` only warns
/// about them.
pub fn total_bases(text: &str) -> usize {
    let mut count = 0;
    let mut started = false;
    for line in text.lines() {
        if line.starts_with(RECORD_MARKER) {
            if started {
                break;
            }
            started = true;
            continue;
        }
        let bases = line.chars().filter(|c| !c.is_whitespace()).count();
        if bases > 0 {
            started = true;
            count += bases;
        }
    }
    count
}

// 1-based line number of the first sequence line with a non-nucleotide character.
fn first_non_nucleotide_line(text: &str) -> Option<usize> {
    let re = nucleotide_line();
    text.lines()
        .enumerate()
        .filter(|(_, l)| !l.starts_with(RECORD_MARKER))
        .map(|(i, l)| (i, l.trim()))
        .find(|(_, l)| !l.is_empty() && !re.is_match(l))
        .map(|(i, _)| i + 1)
}
