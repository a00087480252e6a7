// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier
// Modifications (c) 2026 Peter Carlton

use std::{
    fmt,
    fs::File,
    io::{stdout, Write},
    path::{Path, PathBuf},
};

use clap::{Parser, ValueEnum};
use log::{info, warn};

use crate::app::{display_path, uploaded_input, Pipeline, RunInput};
use crate::blast::{
    export::{render_table, write_csv, write_json},
    filter::{parse_evalue_threshold, FilterCriteria, FilteredView, DEFAULT_MAX_EVALUE},
    tools::BlastTools,
};
use crate::config::{find_config, PipelineConfig};
use crate::errors::PipelineError;
use crate::external::SystemToolRunner;
use crate::workspace::{WorkLayout, DEFAULT_WORK_DIR};

#[derive(Debug, Parser)]
#[command(version, about, long_about = None) ]
pub struct Cli {
    /// Query FastA file
    #[arg(requires = "subject_file", conflicts_with_all = ["query_seq", "subject_seq"])]
    pub query_file: Option<PathBuf>,

    /// Subject FastA file (the database is built from it)
    pub subject_file: Option<PathBuf>,

    /// Query sequence text, instead of a file
    #[arg(long = "query-seq", requires = "subject_seq")]
    pub query_seq: Option<String>,

    /// Subject sequence text, instead of a file
    #[arg(long = "subject-seq", requires = "query_seq")]
    pub subject_seq: Option<String>,

    /// Minimum alignment length
    #[arg(short = 'l', long = "min-length", default_value_t = 0)]
    pub min_length: u64,

    /// Minimum % identity
    #[arg(short = 'p', long = "min-identity", default_value_t = 0.0)]
    pub min_identity: f64,

    /// Maximum e-value (scientific or decimal); unreadable values are ignored
    #[arg(short = 'e', long = "max-evalue", default_value = "1e6")]
    pub max_evalue: String,

    /// Output format
    #[arg(short, long = "format", default_value_t = OutputFormat::Table,
        help = "Output format [table|csv|json] (or just t|c|j); default: table",
        hide_default_value = true,
        hide_possible_values = true,
    )]
    pub format: OutputFormat,

    /// Write filtered results here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Working directory (default: ./.work)
    #[arg(short, long = "work-dir")]
    pub work_dir: Option<PathBuf>,

    /// Keep this run's files apart from other sessions'
    #[arg(short, long)]
    pub session: Option<String>,

    /// Directory containing makeblastdb and blastn
    #[arg(short, long = "blast-bin-dir")]
    pub blast_bin_dir: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[clap(name = "table")]
    #[clap(alias = "t")]
    Table,
    #[clap(name = "csv")]
    #[clap(alias = "c")]
    Csv,
    #[clap(name = "json")]
    #[clap(alias = "j")]
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OutputFormat::Table => "table",
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        };
        write!(f, "{}", s)
    }
}

/// Settings after merging the config file (if any) with the command line, which wins.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub tools: BlastTools,
    pub work_dir: PathBuf,
    pub session: Option<String>,
    pub criteria: FilterCriteria,
}

impl Settings {
    pub fn merge(cli: &Cli, config: PipelineConfig, cwd: &Path) -> Result<Self, PipelineError> {
        let bin_dir = cli.blast_bin_dir.clone().or(config.tools.blast_bin_dir);
        let work_dir = cli
            .work_dir
            .clone()
            .or(config.work_dir)
            .unwrap_or_else(|| cwd.join(DEFAULT_WORK_DIR));
        let max_evalue = parse_evalue_threshold(&cli.max_evalue, DEFAULT_MAX_EVALUE);
        Ok(Settings {
            tools: BlastTools::from_bin_dir(bin_dir.as_deref()),
            work_dir,
            session: cli.session.clone().or(config.session),
            criteria: FilterCriteria::new(cli.min_length, cli.min_identity, max_evalue)?,
        })
    }
}

impl Cli {
    pub fn input(&self) -> Result<RunInput, PipelineError> {
        match (
            &self.query_file,
            &self.subject_file,
            &self.query_seq,
            &self.subject_seq,
        ) {
            (Some(q), Some(s), None, None) => uploaded_input(q, s),
            (None, None, Some(q), Some(s)) => Ok(RunInput::Pasted {
                query: q.clone(),
                subject: s.clone(),
            }),
            _ => Err(PipelineError::InvalidInput(String::from(
                "Please provide both query and subject, either as files or with --query-seq/--subject-seq.",
            ))),
        }
    }
}

fn load_config() -> PipelineConfig {
    match find_config() {
        Some(path) => match PipelineConfig::from_file(&path) {
            Ok(cfg) => {
                info!("Read config from {}", path.display());
                cfg
            }
            Err(e) => {
                warn!("Error reading {}: {}; using defaults", path.display(), e);
                PipelineConfig::default()
            }
        },
        None => PipelineConfig::default(),
    }
}

fn write_view<W: Write>(
    format: OutputFormat,
    view: &FilteredView,
    mut writer: W,
) -> Result<(), PipelineError> {
    match format {
        OutputFormat::Table => writer.write_all(render_table(view).as_bytes())?,
        OutputFormat::Csv => write_csv(view, writer)?,
        OutputFormat::Json => write_json(view, writer)?,
    }
    Ok(())
}

pub fn run() -> Result<(), PipelineError> {
    env_logger::init();
    info!("Starting log");

    let cli = Cli::parse();
    let input = cli.input()?;
    let cwd = std::env::current_dir()?;
    let settings = Settings::merge(&cli, load_config(), &cwd)?;
    let layout = WorkLayout::new(&settings.work_dir, settings.session.as_deref())?;

    let mut pipeline = Pipeline::new(SystemToolRunner, settings.tools.clone(), layout);
    let mode = input.mode();
    pipeline.run(input)?;

    if let Some(raw_path) = pipeline.context().raw_path() {
        eprintln!(
            "Mode: {} - Raw results saved at: {}",
            mode,
            display_path(raw_path).display()
        );
    }
    if let Some(report) = pipeline.context().report() {
        eprintln!("BLAST complete ({})!", mode);
        eprintln!("Query used:   {}", report.query);
        eprintln!("Subject used: {}", report.subject);
    }

    let Some(view) = pipeline.filtered(&settings.criteria) else {
        println!("Run BLAST to see results here.");
        return Ok(());
    };
    match &cli.output {
        Some(path) => {
            write_view(cli.format, &view, File::create(path)?)?;
            eprintln!("Wrote {} hit(s) to {}", view.len(), path.display());
        }
        None => write_view(cli.format, &view, stdout().lock())?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("blastpipe").chain(args.iter().copied()))
            .expect("valid args")
    }

    #[test]
    fn test_files_mode() {
        let cli = parse(&["q.fa", "s.fa"]);
        assert_eq!(cli.query_file, Some(PathBuf::from("q.fa")));
        assert_eq!(cli.format, OutputFormat::Table);
    }

    #[test]
    fn test_seq_mode() {
        let cli = parse(&["--query-seq", "ACGT", "--subject-seq", ">s\nACGTACGT"]);
        match cli.input().unwrap() {
            RunInput::Pasted { query, subject } => {
                assert_eq!(query, "ACGT");
                assert_eq!(subject, ">s\nACGTACGT");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_missing_subject_is_rejected() {
        assert!(Cli::try_parse_from(["blastpipe", "q.fa"]).is_err());
        assert!(Cli::try_parse_from(["blastpipe", "--query-seq", "ACGT"]).is_err());
        let mixed = [
            "blastpipe",
            "q.fa",
            "s.fa",
            "--query-seq",
            "A",
            "--subject-seq",
            "C",
        ];
        assert!(Cli::try_parse_from(mixed).is_err());
    }

    #[test]
    fn test_no_input() {
        let cli = parse(&[]);
        assert!(matches!(cli.input(), Err(PipelineError::InvalidInput(_))));
    }

    #[test]
    fn test_format_aliases() {
        assert_eq!(parse(&["-f", "c"]).format, OutputFormat::Csv);
        assert_eq!(parse(&["--format", "json"]).format, OutputFormat::Json);
        assert_eq!(OutputFormat::Csv.to_string(), "csv");
    }

    #[test]
    fn test_settings_cli_wins() {
        let cli = parse(&[
            "-w",
            "/tmp/cli-work",
            "-b",
            "/cli/bin",
            "-e",
            "1e-5",
            "-l",
            "20",
            "-p",
            "97.5",
        ]);
        let config = PipelineConfig::from_json(
            r#"{ "tools": { "blast_bin_dir": "/cfg/bin" }, "work_dir": "/cfg/work", "session": "s1" }"#,
        )
        .unwrap();
        let settings = Settings::merge(&cli, config, Path::new("/cwd")).unwrap();
        assert_eq!(settings.work_dir, PathBuf::from("/tmp/cli-work"));
        assert_eq!(settings.tools.blastn, PathBuf::from("/cli/bin/blastn"));
        assert_eq!(settings.session.as_deref(), Some("s1"));
        assert_eq!(settings.criteria.min_align_length, 20);
        assert_relative_eq!(settings.criteria.min_percent_identity, 97.5);
        assert_relative_eq!(settings.criteria.max_evalue, 1e-5);
    }

    #[test]
    fn test_settings_defaults() {
        let cli = parse(&["-e", "lots"]);
        let settings = Settings::merge(&cli, PipelineConfig::default(), Path::new("/cwd")).unwrap();
        assert_eq!(settings.work_dir, PathBuf::from("/cwd/.work"));
        assert_eq!(settings.tools, BlastTools::default());
        assert_eq!(settings.criteria, FilterCriteria::default());
    }

    #[test]
    fn test_negative_identity_is_rejected() {
        let cli = parse(&["--min-identity=-1"]);
        let res = Settings::merge(&cli, PipelineConfig::default(), Path::new("/cwd"));
        assert!(matches!(res, Err(PipelineError::InvalidInput(_))));
    }
}
