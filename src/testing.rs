// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Peter Carlton

//! Stand-in for BLAST+ in tests: a `ToolRunner` that answers makeblastdb and blastn invocations
//! itself, reporting exact (ungapped, forward-strand) matches of each query in each subject.

use std::{
    cell::RefCell,
    ffi::OsStr,
    path::{Path, PathBuf},
};

use crate::blast::tools::{BLASTN, MAKEBLASTDB};
use crate::errors::PipelineError;
use crate::external::{ToolInvocation, ToolOutput, ToolRunner};
use crate::seq::fasta::read_fasta_file;

/// Copy of the subject kept next to the "database".
const DB_SUFFIX: &str = "fake.fa";

#[derive(Debug, Default)]
pub struct ExactMatchBlast {
    calls: RefCell<Vec<ToolInvocation>>,
    /// Name of a program that should exit non-zero.
    pub fail: Option<&'static str>,
}

impl ExactMatchBlast {
    pub fn new() -> Self {
        ExactMatchBlast::default()
    }

    pub fn failing(program: &'static str) -> Self {
        ExactMatchBlast {
            calls: RefCell::new(Vec::new()),
            fail: Some(program),
        }
    }

    pub fn calls(&self) -> Vec<ToolInvocation> {
        self.calls.borrow().clone()
    }

    fn makeblastdb(&self, inv: &ToolInvocation) -> Result<ToolOutput, PipelineError> {
        let (Some(input), Some(out)) = (inv.flag_value("-in"), inv.flag_value("-out")) else {
            return Ok(failure("makeblastdb: -in and -out are required"));
        };
        std::fs::copy(input, db_copy(Path::new(out)))?;
        Ok(success("Building a new DB\n"))
    }

    fn blastn(&self, inv: &ToolInvocation) -> Result<ToolOutput, PipelineError> {
        let (Some(query), Some(db), Some(out)) = (
            inv.flag_value("-query"),
            inv.flag_value("-db"),
            inv.flag_value("-out"),
        ) else {
            return Ok(failure("blastn: -query, -db and -out are required"));
        };
        let db_file = db_copy(Path::new(db));
        if !db_file.exists() {
            return Ok(failure(&format!(
                "BLAST Database error: No alias or index file found for nucleotide database [{}]",
                Path::new(db).display()
            )));
        }
        let queries = read_fasta_file(query)?;
        let subjects = read_fasta_file(&db_file)?;
        let mut table = String::new();
        for q in &queries {
            let qseq = q.sequence.to_ascii_uppercase();
            if qseq.is_empty() {
                continue;
            }
            for s in &subjects {
                let sseq = s.sequence.to_ascii_uppercase();
                for (pos, _) in sseq.match_indices(&qseq) {
                    let len = qseq.len();
                    table.push_str(&format!(
                        "{}\t{}\t100.000\t{}\t0\t0\t1\t{}\t{}\t{}\t{:.2e}\t{:.1}\n",
                        first_word(&q.header),
                        first_word(&s.header),
                        len,
                        len,
                        pos + 1,
                        pos + len,
                        (sseq.len() as f64) * 2f64.powi(-(len as i32)),
                        1.8 * len as f64 + 2.1,
                    ));
                }
            }
        }
        std::fs::write(out, table)?;
        Ok(success(""))
    }
}

impl ToolRunner for ExactMatchBlast {
    fn run(&self, inv: &ToolInvocation) -> Result<ToolOutput, PipelineError> {
        self.calls.borrow_mut().push(inv.clone());
        let program = inv
            .program
            .file_name()
            .and_then(OsStr::to_str)
            .unwrap_or_default();
        if self.fail == Some(program) {
            return Ok(failure(&format!("{}: simulated failure", program)));
        }
        match program {
            MAKEBLASTDB => self.makeblastdb(inv),
            BLASTN => self.blastn(inv),
            other => Err(PipelineError::ToolLaunch {
                program: other.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not a BLAST program"),
            }),
        }
    }
}

fn db_copy(prefix: &Path) -> PathBuf {
    let mut name = prefix.as_os_str().to_os_string();
    name.push(".");
    name.push(DB_SUFFIX);
    PathBuf::from(name)
}

fn first_word(header: &str) -> &str {
    header.split_whitespace().next().unwrap_or("")
}

fn success(stdout: &str) -> ToolOutput {
    ToolOutput {
        success: true,
        code: Some(0),
        stdout: stdout.to_string(),
        stderr: String::new(),
    }
}

fn failure(stderr: &str) -> ToolOutput {
    ToolOutput {
        success: false,
        code: Some(1),
        stdout: String::new(),
        stderr: stderr.to_string(),
    }
}
