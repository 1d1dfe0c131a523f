/// Raw named event as delivered by the push channel, before decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamEvent {
    /// SSE event name (`message` when the frame had none).
    pub name: String,
    pub data: String,
    /// Last event id known to the transport when this event was dispatched.
    pub last_event_id: Option<String>,
}

impl StreamEvent {
    pub fn new(name: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
            last_event_id: None,
        }
    }

    pub fn with_last_event_id(mut self, id: impl Into<String>) -> Self {
        self.last_event_id = Some(id.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Event received on the shared push channel.
    Stream(StreamEvent),
    /// Submission response yielded a job id.
    SubmissionAccepted {
        job_id: crate::JobId,
        summary: Option<String>,
    },
    /// Startup listing of previously generated reports.
    ReportsListed(Vec<String>),
    NoOp,
}
