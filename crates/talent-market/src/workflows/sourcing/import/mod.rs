mod parser;

pub use parser::parse_datetime;

use super::domain::{MatchScoreMap, SourcingSnapshot};
use std::fs::File;
use std::io::Read;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum SnapshotImportError {
    #[error("failed to read snapshot export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid snapshot CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid match score JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("line {line}: unknown job status '{value}'")]
    InvalidStatus { line: usize, value: String },
    #[error("line {line}: unparseable {field} timestamp '{value}'")]
    InvalidTimestamp {
        line: usize,
        field: &'static str,
        value: String,
    },
}

/// Builds a [`SourcingSnapshot`] from data-layer exports: a jobs CSV, an
/// optional candidates CSV and an optional match score JSON object.
pub struct SnapshotImporter;

impl SnapshotImporter {
    pub fn from_paths<P: AsRef<Path>>(
        jobs_csv: P,
        candidates_csv: Option<P>,
        match_scores_json: Option<P>,
    ) -> Result<SourcingSnapshot, SnapshotImportError> {
        let jobs = File::open(jobs_csv)?;
        let candidates = candidates_csv.map(File::open).transpose()?;
        let match_scores = match_scores_json.map(File::open).transpose()?;
        Self::from_readers(jobs, candidates, match_scores)
    }

    pub fn from_readers<J: Read, C: Read, S: Read>(
        jobs_csv: J,
        candidates_csv: Option<C>,
        match_scores_json: Option<S>,
    ) -> Result<SourcingSnapshot, SnapshotImportError> {
        let jobs = parser::parse_jobs(jobs_csv)?;
        let candidates = match candidates_csv {
            Some(reader) => parser::parse_candidates(reader)?,
            None => Vec::new(),
        };
        let match_scores = match match_scores_json {
            Some(reader) => serde_json::from_reader::<_, MatchScoreMap>(reader)?,
            None => MatchScoreMap::new(),
        };

        Ok(SourcingSnapshot {
            jobs,
            candidates,
            match_scores,
            sourcer_names: Default::default(),
        })
    }
}
