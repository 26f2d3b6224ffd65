use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourcerId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    #[serde(alias = "Unclaimed")]
    Unclaimed,
    #[serde(alias = "Claimed")]
    Claimed,
    #[serde(alias = "Completed")]
    Completed,
}

impl JobStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Unclaimed => "Unclaimed",
            Self::Claimed => "Claimed",
            Self::Completed => "Completed",
        }
    }
}

impl FromStr for JobStatus {
    type Err = UnknownOption;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "unclaimed" => Ok(Self::Unclaimed),
            "claimed" => Ok(Self::Claimed),
            "completed" => Ok(Self::Completed),
            _ => Err(UnknownOption::new("job status", value)),
        }
    }
}

/// Job as published by a client and, once claimed, worked by a sourcer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    #[serde(default)]
    pub sourcer_id: Option<SourcerId>,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub candidates_requested: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
}

impl Job {
    /// Hours between creation and the last update, for completed jobs only.
    pub fn completion_hours(&self) -> Option<f64> {
        if self.status != JobStatus::Completed {
            return None;
        }

        let elapsed = self.updated_at - self.created_at;
        Some(elapsed.num_milliseconds() as f64 / MILLIS_PER_HOUR)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub job_id: JobId,
    pub submitted_at: DateTime<Utc>,
}

/// Cached AI evaluation of a candidate against its job.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MatchScore {
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub reasoning: String,
}

impl MatchScore {
    pub fn new(score: f64, reasoning: impl Into<String>) -> Self {
        Self {
            score: Some(score),
            reasoning: reasoning.into(),
        }
    }

    /// Usable score, or `None` when the evaluation carried no signal.
    ///
    /// Missing, zero, negative and non-finite scores are evaluation failures,
    /// not genuinely low ratings.
    pub fn signal(&self) -> Option<f64> {
        self.score.filter(|score| score.is_finite() && *score > 0.0)
    }
}

pub type MatchScoreMap = HashMap<CandidateId, MatchScore>;

pub type SourcerNames = HashMap<SourcerId, String>;

/// Everything the performance engine reads, as handed over by the data layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourcingSnapshot {
    #[serde(default)]
    pub jobs: Vec<Job>,
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub match_scores: MatchScoreMap,
    #[serde(default)]
    pub sourcer_names: SourcerNames,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeWindow {
    #[serde(rename = "7days")]
    SevenDays,
    #[serde(rename = "30days")]
    ThirtyDays,
    #[serde(rename = "90days")]
    NinetyDays,
    #[serde(rename = "alltime")]
    AllTime,
}

impl TimeWindow {
    pub const fn days(self) -> Option<i64> {
        match self {
            Self::SevenDays => Some(7),
            Self::ThirtyDays => Some(30),
            Self::NinetyDays => Some(90),
            Self::AllTime => None,
        }
    }

    /// Earliest `updated_at` still inside the window; `None` means unbounded.
    pub fn cutoff(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.days().map(|days| now - Duration::days(days))
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::SevenDays => "7days",
            Self::ThirtyDays => "30days",
            Self::NinetyDays => "90days",
            Self::AllTime => "alltime",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::SevenDays => "Last 7 days",
            Self::ThirtyDays => "Last 30 days",
            Self::NinetyDays => "Last 90 days",
            Self::AllTime => "All time",
        }
    }
}

impl FromStr for TimeWindow {
    type Err = UnknownOption;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "7days" | "7d" => Ok(Self::SevenDays),
            "30days" | "30d" => Ok(Self::ThirtyDays),
            "90days" | "90d" => Ok(Self::NinetyDays),
            "alltime" | "all" => Ok(Self::AllTime),
            _ => Err(UnknownOption::new("time window", value)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaderboardSort {
    #[default]
    Performance,
    Speed,
    Rating,
    Completed,
}

impl LeaderboardSort {
    pub const fn key(self) -> &'static str {
        match self {
            Self::Performance => "performance",
            Self::Speed => "speed",
            Self::Rating => "rating",
            Self::Completed => "completed",
        }
    }
}

impl FromStr for LeaderboardSort {
    type Err = UnknownOption;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "performance" => Ok(Self::Performance),
            "speed" => Ok(Self::Speed),
            "rating" => Ok(Self::Rating),
            "completed" => Ok(Self::Completed),
            _ => Err(UnknownOption::new("sort key", value)),
        }
    }
}

/// Raised when a textual selector (window, sort key, preset, status) is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownOption {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownOption {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.trim().to_string(),
        }
    }
}
