// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Peter Carlton

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::errors::PipelineError;

pub const CONFIG_FILE_NAME: &str = ".blastpipeconfig";

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// Directory containing makeblastdb and blastn.
    pub blast_bin_dir: Option<PathBuf>,
}

/// Contents of a `.blastpipeconfig` file (JSON). Every key is optional.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub tools: ToolsConfig,
    pub work_dir: Option<PathBuf>,
    pub session: Option<String>,
}

impl PipelineConfig {
    pub fn from_json(text: &str) -> Result<Self, PipelineError> {
        serde_json::from_str(text).map_err(|e| PipelineError::Config(e.to_string()))
    }

    pub fn from_file(path: &Path) -> Result<Self, PipelineError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}

/// Looks for a config file in $HOME, then in the current directory.
pub fn find_config() -> Option<PathBuf> {
    let home = std::env::var_os("HOME").map(PathBuf::from);
    let cwd = std::env::current_dir().ok();
    home.into_iter()
        .chain(cwd)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|path| path.exists())
}
