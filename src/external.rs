// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Peter Carlton

// Running external programs: blocking, output captured, exit status checked. Nothing else (no
// timeouts, no cancellation, no streaming).

use std::{
    ffi::{OsStr, OsString},
    path::{Path, PathBuf},
    process::Command,
};

use itertools::Itertools;
use log::{debug, info};

use crate::errors::PipelineError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    pub program: PathBuf,
    pub args: Vec<OsString>,
}

impl ToolInvocation {
    pub fn new<P: AsRef<Path>>(program: P) -> Self {
        ToolInvocation {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
        }
    }

    pub fn arg<S: AsRef<OsStr>>(mut self, arg: S) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    /// Value following `flag`, if the flag is present.
    pub fn flag_value(&self, flag: &str) -> Option<&OsStr> {
        self.args
            .iter()
            .position(|a| a == flag)
            .and_then(|i| self.args.get(i + 1))
            .map(|a| a.as_os_str())
    }

    /// Human-readable command line, for logs and error messages. Not shell-quoted.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_os_str())
            .chain(self.args.iter().map(|a| a.as_os_str()))
            .map(|a| a.to_string_lossy())
            .join(" ")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

pub trait ToolRunner {
    /// Runs the invocation to completion. An `Err` means the program could not be run at all; a
    /// program that ran and failed is an `Ok` with `success == false`.
    fn run(&self, invocation: &ToolInvocation) -> Result<ToolOutput, PipelineError>;
}

/// Runs programs as child processes of this one.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemToolRunner;

impl ToolRunner for SystemToolRunner {
    fn run(&self, invocation: &ToolInvocation) -> Result<ToolOutput, PipelineError> {
        let output = Command::new(&invocation.program)
            .args(&invocation.args)
            .output()
            .map_err(|e| PipelineError::ToolLaunch {
                program: invocation.program.display().to_string(),
                source: e,
            })?;
        Ok(ToolOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Runs `invocation` and turns a non-zero exit into `PipelineError::ExternalTool`.
pub fn run_checked<R: ToolRunner + ?Sized>(
    runner: &R,
    invocation: &ToolInvocation,
) -> Result<ToolOutput, PipelineError> {
    let command = invocation.command_line();
    info!("Running: {}", command);
    let output = runner.run(invocation)?;
    debug!(
        "{} exited with {:?} ({} bytes stdout, {} bytes stderr)",
        invocation.program.display(),
        output.code,
        output.stdout.len(),
        output.stderr.len()
    );
    if !output.success {
        return Err(PipelineError::ExternalTool {
            command,
            code: output.code,
            stdout: output.stdout,
            stderr: output.stderr,
        });
    }
    Ok(output)
}
