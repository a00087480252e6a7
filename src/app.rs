// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier
// Modifications (c) 2026 Peter Carlton

use std::{
    fmt,
    path::{Path, PathBuf},
};

use log::info;

use crate::{
    blast::{
        filter::{FilterCriteria, FilteredView},
        index::build_index,
        result::{ResultSet, RunMode},
        search::{run_search, SearchParams},
        tools::BlastTools,
    },
    errors::PipelineError,
    external::ToolRunner,
    seq::{
        normalize::{total_bases, write_fasta},
        preview::{peek_fasta, SeqPreview, PREVIEW_BASES},
    },
    workspace::WorkLayout,
};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Idle,
    Normalizing,
    IndexBuilding,
    SearchRunning,
    Parsed,
    Error(String),
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self {
            RunState::Idle => "idle",
            RunState::Normalizing => "normalizing",
            RunState::IndexBuilding => "building index",
            RunState::SearchRunning => "searching",
            RunState::Parsed => "parsed",
            RunState::Error(_) => "error",
        };
        write!(f, "{}", state)
    }
}

/// The two sequence sets of a run, either as typed text or as file contents.
#[derive(Debug, Clone)]
pub enum RunInput {
    Pasted { query: String, subject: String },
    Uploaded { query: Vec<u8>, subject: Vec<u8> },
}

impl RunInput {
    pub fn from_files(query: &Path, subject: &Path) -> Result<Self, PipelineError> {
        Ok(RunInput::Uploaded {
            query: std::fs::read(query)?,
            subject: std::fs::read(subject)?,
        })
    }

    pub fn mode(&self) -> RunMode {
        match self {
            RunInput::Pasted { .. } => RunMode::Pasted,
            RunInput::Uploaded { .. } => RunMode::Uploaded,
        }
    }

    // Uploaded bytes go through the same normalization as pasted text.
    fn texts(&self) -> (String, String) {
        match self {
            RunInput::Pasted { query, subject } => (query.clone(), subject.clone()),
            RunInput::Uploaded { query, subject } => (
                String::from_utf8_lossy(query).into_owned(),
                String::from_utf8_lossy(subject).into_owned(),
            ),
        }
    }
}

/// What was fed to blastn, for the user's benefit.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub query: SeqPreview,
    pub subject: SeqPreview,
    pub query_bases: usize,
    pub params: SearchParams,
}

/// Everything a run leaves behind. Replaced as a whole by the next run, or emptied by `clear()`.
#[derive(Debug, Default)]
pub struct PipelineRunContext {
    state: RunState,
    results: Option<ResultSet>,
    report: Option<RunReport>,
}

impl PipelineRunContext {
    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn results(&self) -> Option<&ResultSet> {
        self.results.as_ref()
    }

    pub fn report(&self) -> Option<&RunReport> {
        self.report.as_ref()
    }

    pub fn mode(&self) -> Option<RunMode> {
        self.results.as_ref().map(|r| r.mode())
    }

    pub fn raw_path(&self) -> Option<&Path> {
        self.results.as_ref().map(|r| r.raw_path())
    }
}

/// Runs makeblastdb and blastn over one query/subject pair at a time and keeps the outcome.
pub struct Pipeline<R: ToolRunner> {
    runner: R,
    tools: BlastTools,
    layout: WorkLayout,
    context: PipelineRunContext,
}

impl<R: ToolRunner> Pipeline<R> {
    pub fn new(runner: R, tools: BlastTools, layout: WorkLayout) -> Self {
        Pipeline {
            runner,
            tools,
            layout,
            context: PipelineRunContext::default(),
        }
    }

    pub fn state(&self) -> &RunState {
        &self.context.state
    }

    pub fn context(&self) -> &PipelineRunContext {
        &self.context
    }

    pub fn layout(&self) -> &WorkLayout {
        &self.layout
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Back to `Idle`, forgetting the last run's results.
    pub fn clear(&mut self) {
        info!("Clearing previous results");
        self.context = PipelineRunContext::default();
    }

    /// Runs the whole pipeline. Whatever the previous run left is discarded first, so on error
    /// there are no results at all.
    pub fn run(&mut self, input: RunInput) -> Result<&ResultSet, PipelineError> {
        self.context = PipelineRunContext::default();
        info!(
            "Starting {} run in {}",
            input.mode(),
            self.layout.root().display()
        );
        match self.execute(&input) {
            Ok((results, report)) => {
                self.transition(RunState::Parsed);
                self.context.report = Some(report);
                Ok(self.context.results.insert(results))
            }
            Err(e) => {
                self.transition(RunState::Error(e.to_string()));
                Err(e)
            }
        }
    }

    /// The current results passed through `criteria`, or `None` if there are no results.
    pub fn filtered(&self, criteria: &FilterCriteria) -> Option<FilteredView<'_>> {
        self.context.results.as_ref().map(|rs| criteria.apply(rs))
    }

    fn transition(&mut self, next: RunState) {
        info!("{} -> {}", self.context.state, next);
        self.context.state = next;
    }

    fn execute(&mut self, input: &RunInput) -> Result<(ResultSet, RunReport), PipelineError> {
        let mode = input.mode();
        self.transition(RunState::Normalizing);
        let (query, subject) = input.texts();
        if query.trim().is_empty() || subject.trim().is_empty() {
            return Err(PipelineError::InvalidInput(String::from(
                "Please provide both query and subject sequences.",
            )));
        }
        self.layout.prepare()?;
        let query_fa = self.layout.query_fasta(mode);
        let subject_fa = self.layout.subject_fasta(mode);
        let query_text = write_fasta(&query, &query_fa)?;
        write_fasta(&subject, &subject_fa)?;

        self.transition(RunState::IndexBuilding);
        let db_prefix = self.layout.db_prefix(mode);
        build_index(&self.runner, &self.tools, &subject_fa, &db_prefix)?;

        self.transition(RunState::SearchRunning);
        let query_bases = total_bases(&query_text);
        let params = SearchParams::for_query_length(query_bases);
        if params.short_mode {
            info!("Short query ({} bases): using blastn-short", query_bases);
        }
        let out = self.layout.raw_output(mode);
        let results = run_search(
            &self.runner,
            &self.tools,
            &query_fa,
            &db_prefix,
            &out,
            params,
            mode,
        )?;

        let report = RunReport {
            query: peek_fasta(&query_fa, PREVIEW_BASES)?,
            subject: peek_fasta(&subject_fa, PREVIEW_BASES)?,
            query_bases,
            params,
        };
        Ok((results, report))
    }
}

/// Absolute form of the raw output path, for display. Falls back to the path as given.
pub fn display_path(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Reads query and subject files as an uploaded-mode input, checking first that both are there.
pub fn uploaded_input(query: &Path, subject: &Path) -> Result<RunInput, PipelineError> {
    for (what, path) in [("query", query), ("subject", subject)] {
        if !path.is_file() {
            return Err(PipelineError::InvalidInput(format!(
                "{} file {} not found",
                what,
                path.display()
            )));
        }
    }
    RunInput::from_files(query, subject)
}
