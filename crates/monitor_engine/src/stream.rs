use futures_util::StreamExt;
use monitor_core::StreamEvent;
use monitor_logging::{monitor_debug, monitor_info, monitor_warn};
use reqwest::header::{ACCEPT, CACHE_CONTROL};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::sse::SseDecoder;
use crate::{EngineError, StreamError, StreamSettings};

const LAST_EVENT_ID: &str = "Last-Event-ID";

/// Receives decoded events. `deliver` may wait, which holds back reading
/// from the connection until the consumer catches up.
#[async_trait::async_trait]
pub trait EventSink: Send + Sync {
    async fn deliver(&self, event: StreamEvent);

    /// A connection was accepted with a success status.
    fn connected(&self) {}

    /// The current connection ended or could not be opened.
    fn disconnected(&self) {}
}

/// One persistent subscription to a push endpoint.
///
/// Drops are retried after the reconnect delay. Events missed while
/// disconnected are not recovered.
#[derive(Debug, Clone)]
pub struct EventStreamClient {
    client: reqwest::Client,
    url: Url,
    settings: StreamSettings,
}

impl EventStreamClient {
    pub fn new(url: Url, settings: StreamSettings) -> Result<Self, EngineError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .build()
            .map_err(EngineError::Client)?;
        Ok(Self {
            client,
            url,
            settings,
        })
    }

    /// Runs until `cancel` fires.
    pub async fn run(&self, sink: &dyn EventSink, cancel: CancellationToken) {
        let mut decoder = SseDecoder::new();
        let mut delay = self.settings.reconnect_delay;

        while !cancel.is_cancelled() {
            match self.connect_once(&mut decoder, sink, &cancel).await {
                Ok(()) if cancel.is_cancelled() => break,
                Ok(()) => monitor_debug!("Event stream {} closed by server", self.url),
                Err(err) => monitor_warn!("Event stream {} dropped: {}", self.url, err),
            }
            sink.disconnected();

            if let Some(retry) = decoder.take_retry() {
                delay = retry;
            }
            decoder.reset_connection();

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(delay) => {}
            }
        }
        monitor_info!("Event stream {} unsubscribed", self.url);
    }

    async fn connect_once(
        &self,
        decoder: &mut SseDecoder,
        sink: &dyn EventSink,
        cancel: &CancellationToken,
    ) -> Result<(), StreamError> {
        let mut request = self
            .client
            .get(self.url.clone())
            .header(ACCEPT, "text/event-stream")
            .header(CACHE_CONTROL, "no-cache");
        if let Some(id) = decoder.last_event_id() {
            request = request.header(LAST_EVENT_ID, id);
        }

        let response = tokio::select! {
            _ = cancel.cancelled() => return Ok(()),
            response = request.send() => response.map_err(StreamError::Connect)?,
        };

        let status = response.status();
        if !status.is_success() {
            return Err(StreamError::HttpStatus(status.as_u16()));
        }
        monitor_info!("Event stream {} connected", self.url);
        sink.connected();

        let mut body = response.bytes_stream();
        loop {
            let chunk = tokio::select! {
                _ = cancel.cancelled() => return Ok(()),
                chunk = body.next() => chunk,
            };
            match chunk {
                Some(Ok(bytes)) => {
                    for event in decoder.feed(&bytes) {
                        sink.deliver(event).await;
                    }
                }
                Some(Err(err)) => return Err(StreamError::Body(err)),
                None => return Ok(()),
            }
        }
    }
}
