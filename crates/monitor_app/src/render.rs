use std::fmt::Write as _;

use chrono::Local;
use monitor_core::{Category, MonitorViewModel, ViewChange};
use monitor_engine::ViewProjector;

/// Prints one line per view change.
pub struct TerminalProjector {
    category: Category,
}

impl TerminalProjector {
    pub fn new(category: Category) -> Self {
        Self { category }
    }
}

impl ViewProjector for TerminalProjector {
    fn project(&mut self, change: &ViewChange) {
        let stamp = Local::now().format("%H:%M:%S");
        println!("{stamp} [{}] {}", self.category, describe_change(change));
    }
}

pub fn describe_change(change: &ViewChange) -> String {
    match change {
        ViewChange::Upserted(record) => {
            let mut line = format!(
                "job {} {} {}%",
                record.id.short(),
                record.status,
                record.progress
            );
            if let Some(summary) = &record.summary {
                let _ = write!(line, " ({summary})");
            }
            line
        }
        ViewChange::Progress { job_id, progress } => {
            format!("job {} {}%", job_id.short(), progress)
        }
        ViewChange::Status { job_id, status } => format!("job {} {}", job_id.short(), status),
        ViewChange::ReportAttached { job_id, report } => {
            format!("job {} report {}", job_id.short(), report)
        }
        ViewChange::ReportListed(name) => format!("report {name}"),
    }
}

/// Shown when a submission was accepted but the response named no job.
pub fn untracked_notice(category: Category) -> String {
    format!("warning: {category} job accepted but the response carried no job id; it will not be followed")
}

/// Job table followed by the report list.
pub fn render_view(view: &MonitorViewModel) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {} jobs ==", view.category);
    if view.jobs.is_empty() {
        out.push_str("(no jobs)\n");
    }
    for row in &view.jobs {
        let _ = write!(
            out,
            "{:<8}  {:<7}  {:>3}%  {}",
            row.short_id,
            row.status.as_str(),
            row.progress,
            row.summary.as_deref().unwrap_or("")
        );
        if !row.reports.is_empty() {
            let _ = write!(out, "  [{}]", row.reports.join(", "));
        }
        out.push('\n');
    }
    if !view.reports.is_empty() {
        let _ = writeln!(out, "== reports ==");
        for name in &view.reports {
            let _ = writeln!(out, "{name}");
        }
    }
    out
}
