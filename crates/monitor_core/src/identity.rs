use crate::payload::EventBody;
use crate::JobId;

/// Resolves the job an event refers to.
///
/// Order: top-level `job_id`, then `meta.job_id`, then the transport-level
/// event id. `None` means the event must be discarded.
pub fn resolve_job_id(body: &EventBody, transport_id: Option<&str>) -> Option<JobId> {
    body.job_id
        .as_deref()
        .and_then(JobId::parse)
        .or_else(|| body.meta.job_id.as_deref().and_then(JobId::parse))
        .or_else(|| transport_id.and_then(JobId::parse))
}
