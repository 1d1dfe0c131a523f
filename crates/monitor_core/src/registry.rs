//! Owned store of job records for one monitor.
//!
//! Every operation is total: an unknown id is created, never rejected,
//! because stream events and the submission response race each other.
//! Mutations that change observable state queue a [`ViewChange`]; callers
//! drain them with [`JobRegistry::take_changes`].

use indexmap::{IndexMap, IndexSet};
use monitor_logging::monitor_trace;

use crate::types::{clamp_progress, PROGRESS_MAX};
use crate::{JobId, JobRecord, JobStatus, ViewChange};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobRegistry {
    records: IndexMap<JobId, JobRecord>,
    /// Report names seen before their job existed.
    pending_reports: IndexMap<JobId, IndexSet<String>>,
    report_catalog: IndexSet<String>,
    changes: Vec<ViewChange>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &JobId) -> Option<&JobRecord> {
        self.records.get(id)
    }

    pub fn contains(&self, id: &JobId) -> bool {
        self.records.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in creation order.
    pub fn records(&self) -> impl DoubleEndedIterator<Item = &JobRecord> {
        self.records.values()
    }

    /// Catalog of report names, in the order they were first seen.
    pub fn report_catalog(&self) -> impl DoubleEndedIterator<Item = &String> {
        self.report_catalog.iter()
    }

    pub fn pending_report_count(&self) -> usize {
        self.pending_reports.values().map(IndexSet::len).sum()
    }

    /// Creates the record if absent. An existing record only has its
    /// summary refreshed; established status and progress are kept.
    pub fn upsert_on_create(
        &mut self,
        id: &JobId,
        status: JobStatus,
        progress: i64,
        summary: Option<String>,
    ) {
        self.ensure(id, status, clamp_progress(progress), summary);
    }

    /// Sets the status; `done` forces progress to 100.
    pub fn apply_status(&mut self, id: &JobId, status: JobStatus, summary: Option<String>) {
        self.ensure(id, JobStatus::default(), 0, summary);
        self.set_status(id, status);
    }

    /// Refreshes the summary of a record, creating it if needed. Used by
    /// events that carry no usable status.
    pub fn touch(&mut self, id: &JobId, summary: Option<String>) {
        self.ensure(id, JobStatus::default(), 0, summary);
    }

    /// Stores `value` clamped to `0..=100`. Status is left alone and
    /// backwards moves are accepted.
    pub fn apply_progress(&mut self, id: &JobId, value: i64) {
        self.ensure(id, JobStatus::default(), 0, None);
        self.set_progress(id, clamp_progress(value));
    }

    pub fn apply_finished(&mut self, id: &JobId) {
        self.ensure(id, JobStatus::Done, PROGRESS_MAX, None);
        self.set_status(id, JobStatus::Done);
    }

    /// Adds `name` to the job's reports. For an unknown job the name is
    /// held back and attached when the record is created.
    pub fn attach_report(&mut self, id: &JobId, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            return;
        }
        let Some(record) = self.records.get_mut(id) else {
            monitor_trace!("Buffering report {} for unseen job {}", name, id);
            self.pending_reports
                .entry(id.clone())
                .or_default()
                .insert(name.to_string());
            return;
        };
        if record.reports.insert(name.to_string()) {
            self.push(ViewChange::ReportAttached {
                job_id: id.clone(),
                report: name.to_string(),
            });
        }
    }

    /// Adds a name to the monitor-wide report catalog.
    pub fn list_report(&mut self, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            return;
        }
        if self.report_catalog.insert(name.to_string()) {
            self.push(ViewChange::ReportListed(name.to_string()));
        }
    }

    pub fn take_changes(&mut self) -> Vec<ViewChange> {
        std::mem::take(&mut self.changes)
    }

    fn ensure(&mut self, id: &JobId, status: JobStatus, progress: u8, summary: Option<String>) {
        let summary = summary.filter(|text| !text.trim().is_empty());

        if let Some(record) = self.records.get_mut(id) {
            let refreshed = match summary {
                Some(text) if record.summary.as_deref() != Some(text.as_str()) => {
                    record.summary = Some(text);
                    true
                }
                _ => false,
            };
            if refreshed {
                let snapshot = record.clone();
                self.push(ViewChange::Upserted(snapshot));
            }
            return;
        }

        let mut record = JobRecord::new(id.clone(), status, progress);
        record.summary = summary;
        if let Some(pending) = self.pending_reports.shift_remove(id) {
            record.reports.extend(pending);
        }
        let snapshot = record.clone();
        self.records.insert(id.clone(), record);
        self.push(ViewChange::Upserted(snapshot));
    }

    fn set_status(&mut self, id: &JobId, status: JobStatus) {
        let Some(record) = self.records.get_mut(id) else {
            return;
        };
        let status_changed = record.status != status;
        record.status = status;
        let progress_forced = status == JobStatus::Done && record.progress != PROGRESS_MAX;
        if progress_forced {
            record.progress = PROGRESS_MAX;
        }

        if status_changed {
            self.push(ViewChange::Status {
                job_id: id.clone(),
                status,
            });
        }
        if progress_forced {
            self.push(ViewChange::Progress {
                job_id: id.clone(),
                progress: PROGRESS_MAX,
            });
        }
    }

    fn set_progress(&mut self, id: &JobId, progress: u8) {
        let Some(record) = self.records.get_mut(id) else {
            return;
        };
        if record.progress == progress {
            return;
        }
        record.progress = progress;
        self.push(ViewChange::Progress {
            job_id: id.clone(),
            progress,
        });
    }

    fn push(&mut self, change: ViewChange) {
        self.changes.push(change);
    }
}
