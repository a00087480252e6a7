// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Peter Carlton

use std::io::Write;

use itertools::Itertools;

use crate::blast::filter::FilteredView;
use crate::blast::hit::COLUMN_LABELS;
use crate::errors::PipelineError;

pub const NO_MATCHES: &str = "No hits match the current filters.";

/// Writes the view as CSV: a row of column labels, then one row per hit.
pub fn write_csv<W: Write>(view: &FilteredView, writer: W) -> Result<(), PipelineError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(COLUMN_LABELS)?;
    for hit in view.iter() {
        wtr.write_record(hit.cells())?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes the view as a JSON array of hits, keyed by the outfmt 6 field names.
pub fn write_json<W: Write>(view: &FilteredView, mut writer: W) -> Result<(), PipelineError> {
    let hits: Vec<_> = view.iter().collect();
    serde_json::to_writer_pretty(&mut writer, &hits)?;
    writeln!(writer)?;
    Ok(())
}

/// Plain-text table, columns padded to their widest cell.
pub fn render_table(view: &FilteredView) -> String {
    if view.is_empty() {
        return format!("{}\n", NO_MATCHES);
    }
    let rows: Vec<[String; 12]> = view.iter().map(|h| h.cells()).collect();
    let widths: Vec<usize> = (0..COLUMN_LABELS.len())
        .map(|i| {
            rows.iter()
                .map(|r| r[i].chars().count())
                .chain(std::iter::once(COLUMN_LABELS[i].chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();
    let fmt_row = |cells: &[&str]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<w$}", c, w = *w))
            .join("  ")
            .trim_end()
            .to_string()
    };
    let mut out = String::new();
    out.push_str(&fmt_row(&COLUMN_LABELS));
    out.push('\n');
    for row in &rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        out.push_str(&fmt_row(&cells));
        out.push('\n');
    }
    out
}
