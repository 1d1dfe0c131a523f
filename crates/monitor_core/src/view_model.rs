use crate::{Category, JobId, JobStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorViewModel {
    pub category: Category,
    pub jobs: Vec<JobRowView>,
    pub reports: Vec<String>,
}

impl MonitorViewModel {
    pub fn job(&self, job_id: &JobId) -> Option<&JobRowView> {
        self.jobs.iter().find(|row| &row.job_id == job_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRowView {
    pub job_id: JobId,
    pub short_id: String,
    pub status: JobStatus,
    pub progress: u8,
    pub summary: Option<String>,
    pub reports: Vec<String>,
}
