//! Monitor engine: push-channel subscription, job submission and the
//! monitor actor that feeds both into the core state machine.
mod error;
mod monitor;
mod reports;
mod sse;
mod stream;
mod submit;
mod types;

pub use error::{EngineError, ReportsError, StreamError, SubmitError};
pub use monitor::{build_http_client, MonitorHandle, ViewProjector};
pub use reports::fetch_report_names;
pub use sse::SseDecoder;
pub use stream::{EventSink, EventStreamClient};
pub use submit::{extract_job_id_from_text, parse_submission_response, JobSubmitter, ReqwestSubmitter};
pub use types::{HttpSettings, MonitorSettings, StreamSettings, SubmitReport};
