// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Peter Carlton

use serde::Serialize;

/// The `-outfmt 6` columns requested from blastn, in output order.
pub const OUTFMT6_FIELDS: [&str; 12] = [
    "qseqid", "sseqid", "pident", "length", "mismatch", "gapopen", "qstart", "qend", "sstart",
    "send", "evalue", "bitscore",
];

/// Column labels for display and export; same order as `OUTFMT6_FIELDS`.
pub const COLUMN_LABELS: [&str; 12] = [
    "Query ID",
    "Subject ID",
    "% Identity",
    "Alignment Length",
    "Mismatches",
    "Gap Openings",
    "Query Start",
    "Query End",
    "Subject Start",
    "Subject End",
    "E-value",
    "Bit Score",
];

pub fn column_label(field: &str) -> Option<&'static str> {
    OUTFMT6_FIELDS
        .iter()
        .position(|f| *f == field)
        .map(|i| COLUMN_LABELS[i])
}

/// One line of blastn tabular output. Numeric fields are `None` when the cell could not be read
/// as a number.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignmentHit {
    #[serde(rename = "qseqid")]
    pub query_id: String,
    #[serde(rename = "sseqid")]
    pub subject_id: String,
    #[serde(rename = "pident")]
    pub percent_identity: Option<f64>,
    #[serde(rename = "length")]
    pub align_length: Option<u64>,
    #[serde(rename = "mismatch")]
    pub mismatches: Option<u64>,
    #[serde(rename = "gapopen")]
    pub gap_openings: Option<u64>,
    #[serde(rename = "qstart")]
    pub query_start: Option<u64>,
    #[serde(rename = "qend")]
    pub query_end: Option<u64>,
    #[serde(rename = "sstart")]
    pub subject_start: Option<u64>,
    #[serde(rename = "send")]
    pub subject_end: Option<u64>,
    pub evalue: Option<f64>,
    #[serde(rename = "bitscore")]
    pub bit_score: Option<f64>,
}

impl AlignmentHit {
    /// Cells in `OUTFMT6_FIELDS` order, as they go into an export. Missing values are empty.
    pub fn cells(&self) -> [String; 12] {
        [
            self.query_id.clone(),
            self.subject_id.clone(),
            fmt_float(self.percent_identity),
            fmt_int(self.align_length),
            fmt_int(self.mismatches),
            fmt_int(self.gap_openings),
            fmt_int(self.query_start),
            fmt_int(self.query_end),
            fmt_int(self.subject_start),
            fmt_int(self.subject_end),
            fmt_float(self.evalue),
            fmt_float(self.bit_score),
        ]
    }

    /// Subject coordinates run backwards on a minus-strand hit.
    pub fn is_minus_strand(&self) -> Option<bool> {
        match (self.subject_start, self.subject_end) {
            (Some(s), Some(e)) => Some(s > e),
            _ => None,
        }
    }

    pub fn missing_fields(&self) -> usize {
        let floats = [self.percent_identity, self.evalue, self.bit_score];
        let ints = [
            self.align_length,
            self.mismatches,
            self.gap_openings,
            self.query_start,
            self.query_end,
            self.subject_start,
            self.subject_end,
        ];
        floats.iter().filter(|v| v.is_none()).count() + ints.iter().filter(|v| v.is_none()).count()
    }
}

// Shortest representation that reads back to the same f64 (Debug, not Display: Display would
// spell out 1e-150 in full).
fn fmt_float(v: Option<f64>) -> String {
    v.map(|x| format!("{:?}", x)).unwrap_or_default()
}

fn fmt_int(v: Option<u64>) -> String {
    v.map(|x| x.to_string()).unwrap_or_default()
}

#[cfg(test)]
pub(crate) fn sample_hit(query_id: &str, pident: f64, length: u64, evalue: f64) -> AlignmentHit {
    AlignmentHit {
        query_id: query_id.to_string(),
        subject_id: String::from("subject1"),
        percent_identity: Some(pident),
        align_length: Some(length),
        mismatches: Some(0),
        gap_openings: Some(0),
        query_start: Some(1),
        query_end: Some(length),
        subject_start: Some(11),
        subject_end: Some(10 + length),
        evalue: Some(evalue),
        bit_score: Some(20.1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_line_up() {
        assert_eq!(column_label("qseqid"), Some("Query ID"));
        assert_eq!(column_label("pident"), Some("% Identity"));
        assert_eq!(column_label("bitscore"), Some("Bit Score"));
        assert_eq!(column_label("staxids"), None);
    }

    #[test]
    fn test_cells() {
        let mut hit = sample_hit("q1", 100.0, 10, 1.2e-5);
        hit.bit_score = None;
        let cells = hit.cells();
        assert_eq!(cells[0], "q1");
        assert_eq!(cells[2], "100.0");
        assert_eq!(cells[3], "10");
        assert_eq!(cells[10], "1.2e-5");
        assert_eq!(cells[11], "");
        assert_eq!(hit.missing_fields(), 1);
    }

    #[test]
    fn test_strand() {
        let mut hit = sample_hit("q1", 100.0, 10, 0.001);
        assert_eq!(hit.is_minus_strand(), Some(false));
        hit.subject_start = Some(20);
        hit.subject_end = Some(11);
        assert_eq!(hit.is_minus_strand(), Some(true));
        hit.subject_end = None;
        assert_eq!(hit.is_minus_strand(), None);
    }
}
