//! Monitor core: pure job-state reconciliation for push-event monitors.
mod change;
mod classify;
mod identity;
mod ingest;
mod msg;
mod payload;
mod profile;
mod registry;
mod state;
mod types;
mod update;
mod view_model;

pub use change::ViewChange;
pub use classify::{classify, Verdict};
pub use identity::resolve_job_id;
pub use ingest::{ingest, Disposition};
pub use msg::{Msg, StreamEvent};
pub use payload::{EventBody, EventMeta};
pub use profile::{Category, DomainProfile, SummaryField};
pub use registry::JobRegistry;
pub use state::MonitorState;
pub use types::{
    clamp_progress, EventKind, JobId, JobRecord, JobStatus, UnknownStatus, PROGRESS_MAX,
};
pub use update::update;
pub use view_model::{JobRowView, MonitorViewModel};
