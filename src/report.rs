use crate::loader::LoadOutcome;
use crate::locator::SourceFile;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// How a run ended. Only `Exported` leaves an output file behind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunOutcome {
    Exported { path: PathBuf, rows: usize },
    NoSourceFiles,
    EmptyResult,
    ValidationFailed { message: String },
    Failed { message: String },
}

impl RunOutcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            RunOutcome::Exported { .. } => 0,
            RunOutcome::Failed { .. } => 1,
            RunOutcome::ValidationFailed { .. } => 3,
            RunOutcome::NoSourceFiles => 4,
            RunOutcome::EmptyResult => 5,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub chain_id: i64,
    pub date: i64,
    pub source_directory: PathBuf,
    pub pattern: String,
    pub files_found: usize,
    pub files: Vec<LoadOutcome>,
    pub rows: usize,
    pub columns: usize,
    pub outcome: RunOutcome,
    pub duration: Duration,
    pub finished_at: DateTime<Utc>,
    #[serde(skip)]
    started: Instant,
}

impl RunReport {
    pub fn new(chain_id: i64, date: i64, source_directory: &Path, pattern: String) -> Self {
        Self {
            chain_id,
            date,
            source_directory: source_directory.to_path_buf(),
            pattern,
            files_found: 0,
            files: Vec::new(),
            rows: 0,
            columns: 0,
            outcome: RunOutcome::NoSourceFiles,
            duration: Duration::ZERO,
            finished_at: Utc::now(),
            started: Instant::now(),
        }
    }

    pub fn loaded_files(&self) -> usize {
        self.files.iter().filter(|f| f.is_loaded()).count()
    }

    pub fn failed_files(&self) -> usize {
        self.files.len() - self.loaded_files()
    }

    pub fn finish(&mut self, outcome: RunOutcome) {
        self.outcome = outcome;
        self.duration = self.started.elapsed();
        self.finished_at = Utc::now();
    }
}

/// What a run would do, without loading or writing anything.
#[derive(Debug, Clone, Serialize)]
pub struct DryRunPlan {
    pub chain_id: i64,
    pub date: i64,
    pub source_directory: PathBuf,
    pub pattern: String,
    pub text_columns: Vec<String>,
    pub required_columns: Vec<String>,
    pub output_path: PathBuf,
    pub files: Vec<SourceFile>,
}

impl DryRunPlan {
    pub fn exit_code(&self) -> i32 {
        if self.files.is_empty() {
            RunOutcome::NoSourceFiles.exit_code()
        } else {
            0
        }
    }
}
