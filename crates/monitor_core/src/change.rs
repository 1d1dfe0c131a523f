use crate::{JobId, JobRecord, JobStatus};

/// Notification for the view layer, emitted after a registry mutation
/// that changed observable state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewChange {
    /// Record created, or its summary refreshed. Carries the full record.
    Upserted(JobRecord),
    Progress { job_id: JobId, progress: u8 },
    Status { job_id: JobId, status: JobStatus },
    ReportAttached { job_id: JobId, report: String },
    /// New name in the monitor-wide report catalog.
    ReportListed(String),
}
