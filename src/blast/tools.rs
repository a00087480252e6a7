// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Peter Carlton

use std::path::{Path, PathBuf};

pub const MAKEBLASTDB: &str = "makeblastdb";
pub const BLASTN: &str = "blastn";

/// Where the BLAST+ programs are. Bare names are looked up on PATH.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlastTools {
    pub makeblastdb: PathBuf,
    pub blastn: PathBuf,
}

impl Default for BlastTools {
    fn default() -> Self {
        BlastTools {
            makeblastdb: PathBuf::from(MAKEBLASTDB),
            blastn: PathBuf::from(BLASTN),
        }
    }
}

impl BlastTools {
    pub fn from_bin_dir(bin_dir: Option<&Path>) -> Self {
        match bin_dir {
            Some(dir) => BlastTools {
                makeblastdb: dir.join(MAKEBLASTDB),
                blastn: dir.join(BLASTN),
            },
            None => BlastTools::default(),
        }
    }
}
