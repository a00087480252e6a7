// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Peter Carlton

// File layout under the working root. Two runs sharing a root overwrite each other's files; give
// each concurrent user their own session.

use std::path::{Path, PathBuf};

use log::debug;

use crate::blast::result::RunMode;
use crate::errors::PipelineError;

pub const DEFAULT_WORK_DIR: &str = ".work";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkLayout {
    root: PathBuf,
}

impl WorkLayout {
    /// `<base>/sessions/<session>` if a session is given, else `base`.
    pub fn new(base: &Path, session: Option<&str>) -> Result<Self, PipelineError> {
        let root = match session {
            Some(id) => {
                if id.is_empty()
                    || !id
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
                {
                    return Err(PipelineError::InvalidInput(format!(
                        "session id '{}' may only contain letters, digits, '_' and '-'",
                        id
                    )));
                }
                base.join("sessions").join(id)
            }
            None => base.to_path_buf(),
        };
        Ok(WorkLayout { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn db_dir(&self) -> PathBuf {
        self.root.join("db")
    }

    pub fn results_dir(&self) -> PathBuf {
        self.root.join("results")
    }

    pub fn query_fasta(&self, mode: RunMode) -> PathBuf {
        self.root.join(format!("query_{}.fasta", mode.slug()))
    }

    pub fn subject_fasta(&self, mode: RunMode) -> PathBuf {
        self.root.join(format!("subject_{}.fasta", mode.slug()))
    }

    pub fn db_prefix(&self, mode: RunMode) -> PathBuf {
        self.db_dir().join(format!("subject_db_{}", mode.slug()))
    }

    pub fn raw_output(&self, mode: RunMode) -> PathBuf {
        self.results_dir()
            .join(format!("blast_results_{}.txt", mode.slug()))
    }

    pub fn prepare(&self) -> Result<(), PipelineError> {
        std::fs::create_dir_all(self.db_dir())?;
        std::fs::create_dir_all(self.results_dir())?;
        debug!("Working root: {}", self.root.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        let wl = WorkLayout::new(Path::new("/w"), None).unwrap();
        assert_eq!(
            wl.query_fasta(RunMode::Pasted),
            PathBuf::from("/w/query_pasted.fasta")
        );
        assert_eq!(
            wl.subject_fasta(RunMode::Uploaded),
            PathBuf::from("/w/subject_uploaded.fasta")
        );
        assert_eq!(
            wl.db_prefix(RunMode::Pasted),
            PathBuf::from("/w/db/subject_db_pasted")
        );
        assert_eq!(
            wl.raw_output(RunMode::Uploaded),
            PathBuf::from("/w/results/blast_results_uploaded.txt")
        );
    }

    #[test]
    fn test_session_namespace() {
        let wl = WorkLayout::new(Path::new("/w"), Some("run-7_b")).unwrap();
        assert_eq!(wl.root(), Path::new("/w/sessions/run-7_b"));
        assert_eq!(
            wl.raw_output(RunMode::Pasted),
            PathBuf::from("/w/sessions/run-7_b/results/blast_results_pasted.txt")
        );
    }

    #[test]
    fn test_bad_session() {
        for id in ["", "../up", "a b", "x/y"] {
            let res = WorkLayout::new(Path::new("/w"), Some(id));
            assert!(matches!(res, Err(PipelineError::InvalidInput(_))), "{}", id);
        }
    }

    #[test]
    fn test_prepare() {
        let dir = tempfile::tempdir().unwrap();
        let wl = WorkLayout::new(dir.path(), Some("s")).unwrap();
        wl.prepare().unwrap();
        assert!(wl.db_dir().is_dir());
        assert!(wl.results_dir().is_dir());
    }
}
