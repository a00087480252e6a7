// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Peter Carlton

use std::path::Path;

use log::info;

use crate::blast::tools::BlastTools;
use crate::errors::PipelineError;
use crate::external::{run_checked, ToolInvocation, ToolRunner};

pub fn makeblastdb_invocation(
    tools: &BlastTools,
    subject: &Path,
    db_prefix: &Path,
) -> ToolInvocation {
    ToolInvocation::new(&tools.makeblastdb)
        .arg("-in")
        .arg(subject)
        .args(["-dbtype", "nucl"])
        .arg("-out")
        .arg(db_prefix)
}

/// Builds a nucleotide BLAST database at `db_prefix` from the FastA file `subject`. Not retried:
/// a failure here ends the run.
pub fn build_index<R: ToolRunner + ?Sized>(
    runner: &R,
    tools: &BlastTools,
    subject: &Path,
    db_prefix: &Path,
) -> Result<(), PipelineError> {
    if let Some(parent) = db_prefix.parent() {
        std::fs::create_dir_all(parent)?;
    }
    run_checked(runner, &makeblastdb_invocation(tools, subject, db_prefix))?;
    info!("Built database {}", db_prefix.display());
    Ok(())
}
