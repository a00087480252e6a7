// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Peter Carlton

use std::{io, path::Path};

use itertools::Itertools;
use log::{debug, info};

use crate::blast::hit::OUTFMT6_FIELDS;
use crate::blast::parse::read_results;
use crate::blast::result::{ResultSet, RunMode};
use crate::blast::tools::BlastTools;
use crate::errors::PipelineError;
use crate::external::{run_checked, ToolInvocation, ToolRunner};

/// Queries of at most this many bases are searched in short mode.
pub const SHORT_QUERY_MAX_BASES: usize = 30;
pub const SHORT_TASK: &str = "blastn-short";
pub const SHORT_WORD_SIZE: u32 = 4;

/// blastn parameters that depend on the query. Only the short-query switch for now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchParams {
    pub short_mode: bool,
}

impl SearchParams {
    pub fn for_query_length(bases: usize) -> Self {
        let short_mode = bases <= SHORT_QUERY_MAX_BASES;
        debug!("Query has {} bases; short mode: {}", bases, short_mode);
        SearchParams { short_mode }
    }

    pub fn task(&self) -> Option<&'static str> {
        self.short_mode.then_some(SHORT_TASK)
    }

    pub fn word_size(&self) -> Option<u32> {
        self.short_mode.then_some(SHORT_WORD_SIZE)
    }

    /// Low-complexity (DUST) filtering is off for short queries, and left at blastn's default
    /// otherwise.
    pub fn dust(&self) -> bool {
        !self.short_mode
    }
}

pub fn outfmt_spec() -> String {
    format!("6 {}", OUTFMT6_FIELDS.iter().join(" "))
}

pub fn blastn_invocation(
    tools: &BlastTools,
    query: &Path,
    db_prefix: &Path,
    out: &Path,
    params: SearchParams,
) -> ToolInvocation {
    let mut inv = ToolInvocation::new(&tools.blastn)
        .arg("-query")
        .arg(query)
        .arg("-db")
        .arg(db_prefix)
        .arg("-outfmt")
        .arg(outfmt_spec())
        .arg("-out")
        .arg(out);
    if let Some(task) = params.task() {
        inv = inv.args(["-task", task]);
    }
    if let Some(ws) = params.word_size() {
        inv = inv.arg("-word_size").arg(ws.to_string());
    }
    if !params.dust() {
        inv = inv.args(["-dust", "no"]);
    }
    inv
}

/// Searches `query` against the database at `db_prefix`, writing the raw table to `out`, and
/// parses it. No hits (blastn writing nothing, or nothing at all) gives an empty `ResultSet`.
pub fn run_search<R: ToolRunner + ?Sized>(
    runner: &R,
    tools: &BlastTools,
    query: &Path,
    db_prefix: &Path,
    out: &Path,
    params: SearchParams,
    mode: RunMode,
) -> Result<ResultSet, PipelineError> {
    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent)?;
    }
    // A previous run's table must not pass for this run's.
    match std::fs::remove_file(out) {
        Ok(()) => debug!("Removed stale {}", out.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }
    run_checked(runner, &blastn_invocation(tools, query, db_prefix, out, params))?;
    let results = read_results(out, mode)?;
    info!("Search done: {} hit(s)", results.len());
    Ok(results)
}
