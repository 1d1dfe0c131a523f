use std::sync::Arc;
use std::time::Duration;

use monitor_core::{update, Category, MonitorState, MonitorViewModel, Msg, StreamEvent, ViewChange};
use monitor_logging::{monitor_debug, monitor_info, monitor_warn};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::reports::fetch_report_names;
use crate::stream::{EventSink, EventStreamClient};
use crate::submit::{JobSubmitter, ReqwestSubmitter};
use crate::{EngineError, HttpSettings, MonitorSettings, SubmitError, SubmitReport};

/// Commands buffered between the producers and the actor. A full queue
/// pauses stream reading.
const COMMAND_QUEUE_CAPACITY: usize = 256;

/// Receives every view change, in the order the registry produced them.
/// Must not feed anything back into the monitor.
pub trait ViewProjector: Send {
    fn project(&mut self, change: &ViewChange);
}

enum MonitorCommand {
    Apply(Msg),
    Snapshot(oneshot::Sender<MonitorViewModel>),
}

struct ChannelEventSink {
    tx: mpsc::Sender<MonitorCommand>,
    connected: watch::Sender<bool>,
}

#[async_trait::async_trait]
impl EventSink for ChannelEventSink {
    async fn deliver(&self, event: StreamEvent) {
        let _ = self.tx.send(MonitorCommand::Apply(Msg::Stream(event))).await;
    }

    fn connected(&self) {
        self.connected.send_replace(true);
    }

    fn disconnected(&self) {
        self.connected.send_replace(false);
    }
}

/// A running monitor: one subscription, one registry, one actor task that
/// applies every mutation in order.
///
/// The subscription lives exactly as long as the handle; dropping it
/// cancels everything.
pub struct MonitorHandle {
    category: Category,
    cmd_tx: mpsc::Sender<MonitorCommand>,
    connected: watch::Receiver<bool>,
    submitter: Arc<dyn JobSubmitter>,
    cancel: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
}

impl MonitorHandle {
    /// Starts the actor, the subscription and the report bootstrap.
    /// Must be called from within a tokio runtime.
    pub fn start(
        settings: MonitorSettings,
        projector: Box<dyn ViewProjector>,
    ) -> Result<Self, EngineError> {
        let http = build_http_client(&settings.http)?;
        let submitter = Arc::new(ReqwestSubmitter::new(
            http.clone(),
            settings.submit_url.clone(),
            settings.category.profile(),
        ));
        Self::start_with_submitter(settings, projector, http, submitter)
    }

    pub fn start_with_submitter(
        settings: MonitorSettings,
        projector: Box<dyn ViewProjector>,
        http: reqwest::Client,
        submitter: Arc<dyn JobSubmitter>,
    ) -> Result<Self, EngineError> {
        let stream = EventStreamClient::new(settings.events_url.clone(), settings.stream.clone())?;
        let category = settings.category;
        let cancel = CancellationToken::new();
        let (cmd_tx, cmd_rx) = mpsc::channel(COMMAND_QUEUE_CAPACITY);
        let (connected_tx, connected) = watch::channel(false);

        let mut tasks = Vec::with_capacity(3);
        tasks.push(tokio::spawn(run_actor(
            MonitorState::new(category),
            cmd_rx,
            projector,
            cancel.clone(),
        )));

        let sink = ChannelEventSink {
            tx: cmd_tx.clone(),
            connected: connected_tx,
        };
        let stream_cancel = cancel.clone();
        tasks.push(tokio::spawn(async move {
            stream.run(&sink, stream_cancel).await;
        }));

        if let Some(reports_url) = settings.reports_url.clone() {
            let tx = cmd_tx.clone();
            let bootstrap_cancel = cancel.clone();
            tasks.push(tokio::spawn(async move {
                let names = tokio::select! {
                    _ = bootstrap_cancel.cancelled() => return,
                    result = fetch_report_names(&http, &reports_url) => result,
                };
                match names {
                    Ok(names) => {
                        let _ = tx.send(MonitorCommand::Apply(Msg::ReportsListed(names))).await;
                    }
                    Err(err) => monitor_warn!("[{}] report listing skipped: {}", category, err),
                }
            }));
        }

        monitor_info!("[{}] monitor started on {}", category, settings.events_url);
        Ok(Self {
            category,
            cmd_tx,
            connected,
            submitter,
            cancel,
            tasks,
        })
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// Submits a job. A tracked result is routed through the same update
    /// path as stream events, so the two converge whichever lands first.
    pub async fn submit(&self, fields: &[(String, String)]) -> Result<SubmitReport, SubmitError> {
        let report = self.submitter.submit(fields).await?;
        match &report {
            SubmitReport::Tracked { job_id, summary } => {
                let msg = Msg::SubmissionAccepted {
                    job_id: job_id.clone(),
                    summary: summary.clone(),
                };
                if self.cmd_tx.send(MonitorCommand::Apply(msg)).await.is_err() {
                    monitor_warn!("[{}] job {} submitted after monitor stopped", self.category, job_id);
                }
            }
            SubmitReport::Untracked => {
                monitor_debug!("[{}] submission response carried no job id", self.category);
            }
        }
        Ok(report)
    }

    /// Waits until the subscription holds an open connection. Events sent
    /// before that are never seen, so submit only after this returns.
    pub async fn wait_connected(&self, timeout: Duration) -> Result<(), EngineError> {
        let mut connected = self.connected.clone();
        let result = match tokio::time::timeout(timeout, connected.wait_for(|open| *open)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(_)) => Err(EngineError::Stopped),
            Err(_) => Err(EngineError::NotConnected(timeout)),
        };
        result
    }

    /// Current view, after every message queued so far has been applied.
    pub async fn view(&self) -> Result<MonitorViewModel, EngineError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.cmd_tx
            .send(MonitorCommand::Snapshot(reply_tx))
            .await
            .map_err(|_| EngineError::Stopped)?;
        reply_rx.await.map_err(|_| EngineError::Stopped)
    }

    /// Cancels the subscription and waits for all tasks to finish.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        for task in std::mem::take(&mut self.tasks) {
            let _ = task.await;
        }
        monitor_info!("[{}] monitor stopped", self.category);
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

pub fn build_http_client(settings: &HttpSettings) -> Result<reqwest::Client, EngineError> {
    reqwest::Client::builder()
        .connect_timeout(settings.connect_timeout)
        .timeout(settings.request_timeout)
        .build()
        .map_err(EngineError::Client)
}

async fn run_actor(
    mut state: MonitorState,
    mut cmd_rx: mpsc::Receiver<MonitorCommand>,
    mut projector: Box<dyn ViewProjector>,
    cancel: CancellationToken,
) {
    loop {
        let command = tokio::select! {
            _ = cancel.cancelled() => break,
            command = cmd_rx.recv() => match command {
                Some(command) => command,
                None => break,
            },
        };

        match command {
            MonitorCommand::Apply(msg) => {
                let (next, changes) = update(state, msg);
                state = next;
                for change in &changes {
                    projector.project(change);
                }
            }
            MonitorCommand::Snapshot(reply) => {
                let _ = reply.send(state.view());
            }
        }
    }
}
