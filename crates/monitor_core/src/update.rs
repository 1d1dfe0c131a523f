use monitor_logging::{monitor_debug, monitor_trace};

use crate::ingest::{ingest, Disposition};
use crate::{JobStatus, MonitorState, Msg, ViewChange};

/// Pure update function: applies a message to state and returns the view
/// changes it produced.
///
/// Stream events and submission results both land here, so the two racing
/// sources share one mutation surface.
pub fn update(mut state: MonitorState, msg: Msg) -> (MonitorState, Vec<ViewChange>) {
    let category = state.category();
    let (profile, registry) = state.parts_mut();

    match msg {
        Msg::Stream(event) => match ingest(registry, profile, &event) {
            Disposition::Applied { kind, job_id } => {
                monitor_trace!("[{}] applied {:?} for job {}", category, kind, job_id);
            }
            Disposition::Ignored => {
                monitor_trace!("[{}] ignored event '{}'", category, event.name);
            }
            other => {
                monitor_debug!(
                    "[{}] discarded event '{}': {:?}",
                    category,
                    event.name,
                    other
                );
            }
        },
        Msg::SubmissionAccepted { job_id, summary } => {
            registry.upsert_on_create(&job_id, JobStatus::Running, 0, summary);
        }
        Msg::ReportsListed(names) => {
            for name in &names {
                registry.list_report(name);
            }
        }
        Msg::NoOp => {}
    }

    let changes = registry.take_changes();
    (state, changes)
}
