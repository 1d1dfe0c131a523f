//! Per-event pipeline: decode, resolve identity, classify, dispatch.

use std::str::FromStr;

use crate::classify::{classify, Verdict};
use crate::identity::resolve_job_id;
use crate::payload::EventBody;
use crate::{DomainProfile, EventKind, JobId, JobRegistry, JobStatus, StreamEvent};

/// What happened to one received event. Only `Applied` touches the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    Applied { kind: EventKind, job_id: JobId },
    /// Unnamed, unknown or `log` event.
    Ignored,
    /// Body was not valid JSON.
    Malformed,
    /// No job id could be resolved.
    Unidentified,
    /// Belongs to another category.
    Foreign(Verdict),
}

pub fn ingest(
    registry: &mut JobRegistry,
    profile: &DomainProfile,
    event: &StreamEvent,
) -> Disposition {
    let kind = match EventKind::from_name(&event.name) {
        Some(EventKind::Log) | None => return Disposition::Ignored,
        Some(kind) => kind,
    };

    let Ok(body) = EventBody::decode(&event.data) else {
        return Disposition::Malformed;
    };

    let Some(job_id) = resolve_job_id(&body, event.last_event_id.as_deref()) else {
        return Disposition::Unidentified;
    };

    let verdict = classify(&body, profile, registry.contains(&job_id));
    if !verdict.is_owned() {
        return Disposition::Foreign(verdict);
    }

    dispatch(registry, profile, kind, &job_id, &body);
    Disposition::Applied { kind, job_id }
}

fn dispatch(
    registry: &mut JobRegistry,
    profile: &DomainProfile,
    kind: EventKind,
    job_id: &JobId,
    body: &EventBody,
) {
    let summary = profile.summary_of(body);
    let status = body
        .status
        .as_deref()
        .and_then(|raw| JobStatus::from_str(raw).ok());

    match kind {
        EventKind::JobCreated => {
            registry.upsert_on_create(
                job_id,
                status.unwrap_or_default(),
                body.progress.unwrap_or(0),
                summary,
            );
        }
        EventKind::Status => {
            // Report goes first: on an unseen job it is held back and lands
            // in the record created just below.
            if let Some(report) = body.report.as_deref() {
                registry.attach_report(job_id, report);
                registry.list_report(report);
            }
            match status {
                Some(status) => registry.apply_status(job_id, status, summary),
                None => registry.touch(job_id, summary),
            }
        }
        EventKind::Progress => {
            registry.touch(job_id, summary);
            if let Some(value) = body.progress {
                registry.apply_progress(job_id, value);
            }
        }
        EventKind::Finished => registry.apply_finished(job_id),
        EventKind::Log => {}
    }
}
