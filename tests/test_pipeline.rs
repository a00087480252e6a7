// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Peter Carlton

mod common;

use approx::assert_relative_eq;

use crate::common::utils;

use blastpipe::{
    app::{RunInput, RunState},
    blast::{
        export::{render_table, write_csv},
        filter::{parse_evalue_threshold, FilterCriteria, DEFAULT_MAX_EVALUE},
        parse::parse_outfmt6_bytes,
        result::RunMode,
    },
    errors::PipelineError,
    seq::normalize::total_bases,
    testing::ExactMatchBlast,
};

#[test]
fn pasted_run_filter_and_export() {
    let (mut pipeline, _dir) = utils::with_pipeline(ExactMatchBlast::new());
    let rs = pipeline
        .run(RunInput::Pasted {
            query: utils::fixture("query10.fa"),
            subject: utils::fixture("subject50.fa"),
        })
        .expect("run");
    assert_eq!(rs.mode(), RunMode::Pasted);
    assert_eq!(rs.len(), 1);
    assert_relative_eq!(rs.hits()[0].percent_identity.unwrap(), 100.0);
    assert_eq!(rs.hits()[0].align_length, Some(10));

    let criteria = FilterCriteria {
        max_evalue: parse_evalue_threshold("1e6", DEFAULT_MAX_EVALUE),
        ..Default::default()
    };
    let view = pipeline.filtered(&criteria).expect("results");
    let mut csv = Vec::new();
    write_csv(&view, &mut csv).expect("csv");
    let csv = String::from_utf8(csv).unwrap();
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("Query ID,Subject ID,% Identity,Alignment Length,Mismatches,Gap Openings,Query Start,Query End,Subject Start,Subject End,E-value,Bit Score")
    );
    assert!(lines.next().unwrap().starts_with("query1,subject1,100.0,10,0,0,1,10,11,20,"));
    assert_eq!(lines.next(), None);
}

#[test]
fn min_length_above_best_hit_gives_empty_view() {
    let (mut pipeline, _dir) = utils::with_pipeline(ExactMatchBlast::new());
    pipeline
        .run(RunInput::Pasted {
            query: utils::fixture("query10.fa"),
            subject: utils::fixture("subject50.fa"),
        })
        .expect("run");
    let criteria = FilterCriteria {
        min_align_length: 1000,
        ..Default::default()
    };
    let view = pipeline.filtered(&criteria).expect("results");
    assert!(view.is_empty());
    assert_eq!(render_table(&view), "No hits match the current filters.\n");
}

#[test]
fn search_failure_is_reported_with_output() {
    let (mut pipeline, _dir) = utils::with_pipeline(ExactMatchBlast::failing("blastn"));
    let err = pipeline
        .run(RunInput::Pasted {
            query: String::from("TACGGATCCG"),
            subject: utils::fixture("subject50.fa"),
        })
        .map(|_| ())
        .unwrap_err();
    assert!(matches!(err, PipelineError::ExternalTool { .. }));
    let msg = err.to_string();
    assert!(msg.starts_with("Command failed: blastn -query "));
    assert!(msg.contains("STDERR:\nblastn: simulated failure"));
    assert!(matches!(pipeline.state(), RunState::Error(_)));
}

#[test]
fn malformed_cells_do_not_lose_hits() {
    let table = parse_outfmt6_bytes(utils::fixture("hits.tsv").as_bytes());
    assert_eq!(table.hits.len(), 4);
    assert_eq!(table.warnings.len(), 1);
    let odd = &table.hits[2];
    assert_eq!(odd.evalue, None);
    assert_eq!(odd.align_length, Some(7));
    assert_relative_eq!(odd.percent_identity.unwrap(), 85.714);
}

#[test]
fn base_count_ignores_second_record() {
    let text = format!("{}{}", utils::fixture("query10.fa"), utils::fixture("subject50.fa"));
    assert_eq!(total_bases(&text), 10);
    assert_eq!(total_bases(""), 0);
}
