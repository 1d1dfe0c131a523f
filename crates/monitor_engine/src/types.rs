use std::time::Duration;

use monitor_core::{Category, JobId};
use url::Url;

/// Endpoints and timeouts for one monitor instance.
#[derive(Debug, Clone)]
pub struct MonitorSettings {
    pub category: Category,
    pub events_url: Url,
    pub submit_url: Url,
    /// Report listing endpoint, queried once at start.
    pub reports_url: Option<Url>,
    pub http: HttpSettings,
    pub stream: StreamSettings,
}

impl MonitorSettings {
    pub fn new(category: Category, events_url: Url, submit_url: Url) -> Self {
        Self {
            category,
            events_url,
            submit_url,
            reports_url: None,
            http: HttpSettings::default(),
            stream: StreamSettings::default(),
        }
    }
}

/// Timeouts for plain request/response calls.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Push channel settings. The stream itself has no total timeout.
#[derive(Debug, Clone)]
pub struct StreamSettings {
    pub connect_timeout: Duration,
    /// Wait before reconnecting; the server may override it with `retry:`.
    pub reconnect_delay: Duration,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            reconnect_delay: Duration::from_secs(3),
        }
    }
}

/// Result of a job submission that reached the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitReport {
    /// A job id was read from the response; the job is now tracked.
    Tracked {
        job_id: JobId,
        summary: Option<String>,
    },
    /// The server accepted the request but no job id could be read.
    /// The job may still appear once the stream mentions it.
    Untracked,
}

impl SubmitReport {
    pub fn job_id(&self) -> Option<&JobId> {
        match self {
            SubmitReport::Tracked { job_id, .. } => Some(job_id),
            SubmitReport::Untracked => None,
        }
    }
}
