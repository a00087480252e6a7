// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier
// Modifications (c) 2026 Peter Carlton

use std::{fmt, io};

#[derive(Debug)]
pub enum PipelineError {
    Io(io::Error),
    /// Empty or unusable sequence text (or another bad user-supplied value). Raised before any
    /// external tool is started.
    InvalidInput(String),
    /// The external program could not be started at all (not found, not executable, ...).
    ToolLaunch { program: String, source: io::Error },
    /// The external program ran and exited non-zero. Carries everything it printed.
    ExternalTool {
        command: String,
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },
    Config(String),
    Export(String),
}

// These allow conversion to PipelineError, required for main() to return Result<()> and for '?'
// to work.

impl From<io::Error> for PipelineError {
    fn from(e: io::Error) -> Self {
        PipelineError::Io(e)
    }
}

impl From<csv::Error> for PipelineError {
    fn from(e: csv::Error) -> Self {
        PipelineError::Export(e.to_string())
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(e: serde_json::Error) -> Self {
        PipelineError::Export(e.to_string())
    }
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Io(e) => write!(f, "I/O error: {}", e),
            PipelineError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            PipelineError::ToolLaunch { program, source } => {
                write!(f, "Failed to run {}: {}", program, source)
            }
            PipelineError::ExternalTool {
                command,
                code,
                stdout,
                stderr,
            } => {
                write!(f, "Command failed: {}", command)?;
                if let Some(c) = code {
                    write!(f, " (exit status {})", c)?;
                }
                write!(f, "\nSTDOUT:\n{}\n\nSTDERR:\n{}", stdout, stderr)
            }
            PipelineError::Config(msg) => write!(f, "Config error: {}", msg),
            PipelineError::Export(msg) => write!(f, "Export error: {}", msg),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::Io(e) => Some(e),
            PipelineError::ToolLaunch { source, .. } => Some(source),
            _ => None,
        }
    }
}
