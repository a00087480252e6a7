// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Peter Carlton

// Reading blastn `-outfmt 6` output: tab-separated, no header, one hit per line, columns as in
// OUTFMT6_FIELDS. A cell that is not a number where one is expected is not an error; the field is
// just missing.

use std::{
    fmt,
    fs::File,
    io::{self, Read},
    path::Path,
};

use csv::{ByteRecord, ReaderBuilder};
use log::{debug, info};

use crate::blast::hit::{AlignmentHit, OUTFMT6_FIELDS};
use crate::blast::result::{ResultSet, RunMode};
use crate::errors::PipelineError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseWarning {
    NotNumeric {
        line: u64,
        column: &'static str,
        value: String,
    },
    MissingColumn {
        line: u64,
        column: &'static str,
    },
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseWarning::NotNumeric {
                line,
                column,
                value,
            } => write!(f, "line {}: {} is not a number: '{}'", line, column, value),
            ParseWarning::MissingColumn { line, column } => {
                write!(f, "line {}: no {} column", line, column)
            }
        }
    }
}

/// Hits and absorbed problems from one table.
#[derive(Debug, Default)]
pub struct ParsedTable {
    pub hits: Vec<AlignmentHit>,
    pub warnings: Vec<ParseWarning>,
}

// One line being parsed; collects the warnings of its cells.
struct Row<'a> {
    record: &'a ByteRecord,
    line: u64,
    warnings: Vec<ParseWarning>,
}

impl<'a> Row<'a> {
    fn cell(&self, idx: usize) -> Result<String, ParseWarning> {
        self.record
            .get(idx)
            .map(|b| String::from_utf8_lossy(b).trim().to_string())
            .ok_or(ParseWarning::MissingColumn {
                line: self.line,
                column: OUTFMT6_FIELDS[idx],
            })
    }

    fn text(&mut self, idx: usize) -> String {
        self.absorb(self.cell(idx)).unwrap_or_default()
    }

    fn float(&mut self, idx: usize) -> Option<f64> {
        let line = self.line;
        let parsed = self.cell(idx).and_then(|c| coerce_float(&c, line, idx));
        self.absorb(parsed)
    }

    fn int(&mut self, idx: usize) -> Option<u64> {
        let line = self.line;
        let parsed = self.cell(idx).and_then(|c| coerce_int(&c, line, idx));
        self.absorb(parsed)
    }

    fn absorb<T>(&mut self, res: Result<T, ParseWarning>) -> Option<T> {
        match res {
            Ok(v) => Some(v),
            Err(w) => {
                debug!("{}", w);
                self.warnings.push(w);
                None
            }
        }
    }
}

// NaN counts as missing; infinities are kept.
fn coerce_float(cell: &str, line: u64, idx: usize) -> Result<f64, ParseWarning> {
    match cell.parse::<f64>() {
        Ok(v) if !v.is_nan() => Ok(v),
        _ => Err(ParseWarning::NotNumeric {
            line,
            column: OUTFMT6_FIELDS[idx],
            value: cell.to_string(),
        }),
    }
}

// Accepts "12" as well as "12.0", but not "12.5" or "-3".
fn coerce_int(cell: &str, line: u64, idx: usize) -> Result<u64, ParseWarning> {
    if let Ok(v) = cell.parse::<u64>() {
        return Ok(v);
    }
    match cell.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v <= u64::MAX as f64 => {
            Ok(v as u64)
        }
        _ => Err(ParseWarning::NotNumeric {
            line,
            column: OUTFMT6_FIELDS[idx],
            value: cell.to_string(),
        }),
    }
}

fn parse_row(record: &ByteRecord, line: u64) -> (AlignmentHit, Vec<ParseWarning>) {
    let mut row = Row {
        record,
        line,
        warnings: Vec::new(),
    };
    let hit = AlignmentHit {
        query_id: row.text(0),
        subject_id: row.text(1),
        percent_identity: row.float(2),
        align_length: row.int(3),
        mismatches: row.int(4),
        gap_openings: row.int(5),
        query_start: row.int(6),
        query_end: row.int(7),
        subject_start: row.int(8),
        subject_end: row.int(9),
        evalue: row.float(10),
        bit_score: row.float(11),
    };
    (hit, row.warnings)
}

/// Parses a whole table. Only a failure to read from `reader` is an error; any content parses.
pub fn parse_outfmt6<R: Read>(reader: R) -> Result<ParsedTable, PipelineError> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(reader);
    let mut table = ParsedTable::default();
    let mut record = ByteRecord::new();
    loop {
        match rdr.read_byte_record(&mut record) {
            Ok(true) => {
                let line = record.position().map(|p| p.line()).unwrap_or(0);
                let (hit, warnings) = parse_row(&record, line);
                table.hits.push(hit);
                table.warnings.extend(warnings);
            }
            Ok(false) => break,
            Err(e) => {
                return Err(match e.into_kind() {
                    csv::ErrorKind::Io(io_err) => PipelineError::Io(io_err),
                    other => PipelineError::Io(io::Error::new(
                        io::ErrorKind::InvalidData,
                        format!("{:?}", other),
                    )),
                })
            }
        }
    }
    Ok(table)
}

pub fn parse_outfmt6_bytes(bytes: &[u8]) -> ParsedTable {
    // Reading from a slice cannot fail, and nothing else in parse_outfmt6() can.
    parse_outfmt6(bytes).unwrap_or_default()
}

/// Reads the raw output of a search into a `ResultSet`. A missing or empty file gives an empty
/// set, not an error.
pub fn read_results(path: &Path, mode: RunMode) -> Result<ResultSet, PipelineError> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!("No output at {}; no hits", path.display());
            return Ok(ResultSet::empty(mode, path.to_path_buf()));
        }
        Err(e) => return Err(e.into()),
    };
    if file.metadata()?.len() == 0 {
        info!("Empty output at {}; no hits", path.display());
        return Ok(ResultSet::empty(mode, path.to_path_buf()));
    }
    let table = parse_outfmt6(file)?;
    info!(
        "Parsed {} hit(s) from {} ({} unreadable cell(s))",
        table.hits.len(),
        path.display(),
        table.warnings.len()
    );
    Ok(ResultSet::new(
        mode,
        path.to_path_buf(),
        table.hits,
        table.warnings,
    ))
}
