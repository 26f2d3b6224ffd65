use super::super::domain::{Candidate, CandidateId, Job, JobId, JobStatus, SourcerId};
use super::SnapshotImportError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};
use std::io::Read;

pub(crate) fn parse_jobs<R: Read>(reader: R) -> Result<Vec<Job>, SnapshotImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut jobs = Vec::new();

    for (index, record) in csv_reader.deserialize::<JobRow>().enumerate() {
        let row = record?;
        let line = index + 2;

        let status = row
            .status
            .parse::<JobStatus>()
            .map_err(|_| SnapshotImportError::InvalidStatus {
                line,
                value: row.status.clone(),
            })?;

        jobs.push(Job {
            id: JobId(row.job_id),
            sourcer_id: row.sourcer_id.map(SourcerId),
            status,
            created_at: timestamp(line, "Created At", &row.created_at)?,
            updated_at: timestamp(line, "Updated At", &row.updated_at)?,
            candidates_requested: row.candidates_requested.unwrap_or(0),
            title: row.title,
            client_id: row.client_id,
        });
    }

    Ok(jobs)
}

pub(crate) fn parse_candidates<R: Read>(reader: R) -> Result<Vec<Candidate>, SnapshotImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut candidates = Vec::new();

    for (index, record) in csv_reader.deserialize::<CandidateRow>().enumerate() {
        let row = record?;
        let line = index + 2;

        candidates.push(Candidate {
            id: CandidateId(row.candidate_id),
            job_id: JobId(row.job_id),
            submitted_at: timestamp(line, "Submitted At", &row.submitted_at)?,
        });
    }

    Ok(candidates)
}

#[derive(Debug, Deserialize)]
struct JobRow {
    #[serde(rename = "Job ID")]
    job_id: String,
    #[serde(
        rename = "Sourcer ID",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    sourcer_id: Option<String>,
    #[serde(rename = "Status")]
    status: String,
    #[serde(rename = "Created At")]
    created_at: String,
    #[serde(rename = "Updated At")]
    updated_at: String,
    #[serde(rename = "Candidates Requested", default)]
    candidates_requested: Option<u32>,
    #[serde(rename = "Title", default, deserialize_with = "empty_string_as_none")]
    title: Option<String>,
    #[serde(
        rename = "Client ID",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    client_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateRow {
    #[serde(rename = "Candidate ID")]
    candidate_id: String,
    #[serde(rename = "Job ID")]
    job_id: String,
    #[serde(rename = "Submitted At")]
    submitted_at: String,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn timestamp(
    line: usize,
    field: &'static str,
    value: &str,
) -> Result<DateTime<Utc>, SnapshotImportError> {
    parse_datetime(value).ok_or_else(|| SnapshotImportError::InvalidTimestamp {
        line,
        field,
        value: value.to_string(),
    })
}

/// Accepts RFC 3339 timestamps or bare `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
