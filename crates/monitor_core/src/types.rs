use std::fmt;
use std::str::FromStr;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Opaque job identifier as issued by the server (observed: 32 hex chars).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    /// Trims `raw` and rejects it when nothing is left.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First 8 characters, as shown in job tables.
    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(8) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Queued,
    Running,
    Done,
}

impl JobStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Running => "running",
            JobStatus::Done => "done",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl FromStr for JobStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        if value.eq_ignore_ascii_case("queued") {
            Ok(JobStatus::Queued)
        } else if value.eq_ignore_ascii_case("running") {
            Ok(JobStatus::Running)
        } else if value.eq_ignore_ascii_case("done") {
            Ok(JobStatus::Done)
        } else {
            Err(UnknownStatus(value.to_string()))
        }
    }
}

pub const PROGRESS_MAX: u8 = 100;

/// Clamps a raw progress value into `0..=100`.
pub fn clamp_progress(value: i64) -> u8 {
    value.clamp(0, i64::from(PROGRESS_MAX)) as u8
}

/// One tracked job. Created on first reference and never removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: JobId,
    pub status: JobStatus,
    pub progress: u8,
    pub summary: Option<String>,
    pub reports: IndexSet<String>,
}

impl JobRecord {
    pub(crate) fn new(id: JobId, status: JobStatus, progress: u8) -> Self {
        let mut record = Self {
            id,
            status,
            progress,
            summary: None,
            reports: IndexSet::new(),
        };
        if status == JobStatus::Done {
            record.progress = PROGRESS_MAX;
        }
        record
    }
}

/// Named push-event kinds understood by the monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    JobCreated,
    Status,
    Progress,
    Finished,
    /// Received but not acted on.
    Log,
}

impl EventKind {
    /// Maps an SSE event name; unnamed (`message`) and unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "job_created" => Some(EventKind::JobCreated),
            "status" => Some(EventKind::Status),
            "progress" => Some(EventKind::Progress),
            "finished" => Some(EventKind::Finished),
            "log" => Some(EventKind::Log),
            _ => None,
        }
    }
}
