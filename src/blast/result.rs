// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Peter Carlton

use std::{
    fmt,
    path::{Path, PathBuf},
};

use crate::blast::hit::AlignmentHit;
use crate::blast::parse::ParseWarning;

/// How the run's inputs were supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Pasted,
    Uploaded,
}

impl RunMode {
    /// Lower-case tag used in working file names.
    pub fn slug(&self) -> &'static str {
        match self {
            RunMode::Pasted => "pasted",
            RunMode::Uploaded => "uploaded",
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunMode::Pasted => "PASTED",
            RunMode::Uploaded => "UPLOADED",
        };
        write!(f, "{}", s)
    }
}

/// The hits of one search, in the order blastn reported them. Built once per run and never
/// modified afterwards; filtering produces views over it.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet {
    mode: RunMode,
    raw_path: PathBuf,
    hits: Vec<AlignmentHit>,
    warnings: Vec<ParseWarning>,
}

impl ResultSet {
    pub fn new(
        mode: RunMode,
        raw_path: PathBuf,
        hits: Vec<AlignmentHit>,
        warnings: Vec<ParseWarning>,
    ) -> Self {
        ResultSet {
            mode,
            raw_path,
            hits,
            warnings,
        }
    }

    /// No hits: no output file, an empty one, or nothing found.
    pub fn empty(mode: RunMode, raw_path: PathBuf) -> Self {
        Self::new(mode, raw_path, Vec::new(), Vec::new())
    }

    pub fn mode(&self) -> RunMode {
        self.mode
    }

    pub fn raw_path(&self) -> &Path {
        &self.raw_path
    }

    pub fn hits(&self) -> &[AlignmentHit] {
        &self.hits
    }

    /// Cells that could not be read as numbers and were set to missing.
    pub fn warnings(&self) -> &[ParseWarning] {
        &self.warnings
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Hit with the highest bit score (first one on ties); hits without a score are ignored.
    pub fn best_hit(&self) -> Option<&AlignmentHit> {
        self.hits
            .iter()
            .filter(|h| h.bit_score.is_some())
            .fold(None, |best: Option<&AlignmentHit>, h| match best {
                Some(b) if b.bit_score >= h.bit_score => Some(b),
                _ => Some(h),
            })
    }
}
