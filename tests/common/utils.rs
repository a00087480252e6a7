// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Peter Carlton

use std::process::{Command, Stdio};

use tempfile::TempDir;

use blastpipe::{
    app::Pipeline,
    blast::tools::{BlastTools, BLASTN, MAKEBLASTDB},
    external::ToolRunner,
    workspace::WorkLayout,
};

#[allow(dead_code)]
pub fn fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/data/{}", name)).expect("fixture")
}

/// Pipeline working in a fresh temporary directory. Keep the TempDir alive for as long as the
/// pipeline is used.
#[allow(dead_code)]
pub fn with_pipeline<R: ToolRunner>(runner: R) -> (Pipeline<R>, TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let layout = WorkLayout::new(dir.path(), None).expect("layout");
    (Pipeline::new(runner, BlastTools::default(), layout), dir)
}

/// Whether BLAST+ is installed (on PATH).
#[allow(dead_code)]
pub fn blast_available() -> bool {
    [MAKEBLASTDB, BLASTN].iter().all(|prog| {
        Command::new(prog)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    })
}
