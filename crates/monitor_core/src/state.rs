use crate::view_model::{JobRowView, MonitorViewModel};
use crate::{Category, DomainProfile, JobRegistry};

/// State owned by one monitor: its category rules and its registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorState {
    profile: DomainProfile,
    registry: JobRegistry,
}

impl MonitorState {
    pub fn new(category: Category) -> Self {
        Self::with_profile(category.profile())
    }

    pub fn with_profile(profile: DomainProfile) -> Self {
        Self {
            profile,
            registry: JobRegistry::new(),
        }
    }

    pub fn category(&self) -> Category {
        self.profile.category
    }

    pub fn profile(&self) -> &DomainProfile {
        &self.profile
    }

    pub fn registry(&self) -> &JobRegistry {
        &self.registry
    }

    pub(crate) fn parts_mut(&mut self) -> (&DomainProfile, &mut JobRegistry) {
        (&self.profile, &mut self.registry)
    }

    /// Newest jobs and reports first, the way the job table grows.
    pub fn view(&self) -> MonitorViewModel {
        let jobs = self
            .registry
            .records()
            .rev()
            .map(|record| JobRowView {
                job_id: record.id.clone(),
                short_id: record.id.short().to_string(),
                status: record.status,
                progress: record.progress,
                summary: record.summary.clone(),
                reports: record.reports.iter().cloned().collect(),
            })
            .collect();
        let reports = self.registry.report_catalog().rev().cloned().collect();

        MonitorViewModel {
            category: self.profile.category,
            jobs,
            reports,
        }
    }
}
