use std::time::Duration;

use eventsource_stream::{EventStreamError, Eventsource};
use futures_util::StreamExt;
use paywatch_logging::watch_debug;
use reqwest::header::ACCEPT;
use tokio_util::sync::CancellationToken;

use crate::{EngineEvent, SessionId, StreamError, StreamFailureKind};

pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// A server-push channel delivering signal payloads for one session.
#[async_trait::async_trait]
pub trait SignalChannel: Send + Sync {
    /// Streams events into `sink` until `cancel` fires (`Ok`) or the channel fails.
    async fn stream(
        &self,
        session: SessionId,
        signal_count: u32,
        sink: &dyn EventSink,
        cancel: CancellationToken,
    ) -> Result<(), StreamError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestSignalChannel {
    base_url: String,
    connect_timeout: Duration,
}

impl ReqwestSignalChannel {
    pub fn new(base_url: impl Into<String>, connect_timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            connect_timeout,
        }
    }

    pub fn stream_url(&self, signal_count: u32) -> Result<url::Url, StreamError> {
        let mut url = url::Url::parse(&self.base_url)
            .and_then(|base| base.join("/api/stream"))
            .map_err(|err| StreamError::new(StreamFailureKind::InvalidUrl, err.to_string()))?;
        url.query_pairs_mut()
            .append_pair("count", &signal_count.to_string());
        Ok(url)
    }

    fn build_client(&self) -> Result<reqwest::Client, StreamError> {
        // No overall timeout: the channel stays open for the whole session.
        reqwest::Client::builder()
            .connect_timeout(self.connect_timeout)
            .build()
            .map_err(|err| StreamError::new(StreamFailureKind::Network, err.to_string()))
    }
}

#[async_trait::async_trait]
impl SignalChannel for ReqwestSignalChannel {
    async fn stream(
        &self,
        session: SessionId,
        signal_count: u32,
        sink: &dyn EventSink,
        cancel: CancellationToken,
    ) -> Result<(), StreamError> {
        let url = self.stream_url(signal_count)?;
        let client = self.build_client()?;

        let request = client.get(url).header(ACCEPT, "text/event-stream").send();
        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Ok(()),
            response = request => response.map_err(map_reqwest_error)?,
        };

        let status = response.status();
        if !status.is_success() {
            return Err(StreamError::new(
                StreamFailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let events = response.bytes_stream().eventsource();
        let mut events = std::pin::pin!(events);
        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    watch_debug!("Channel for session {} released", session);
                    return Ok(());
                }
                next = events.next() => next,
            };
            match next {
                Some(Ok(event)) => {
                    if !is_message_event(&event.event) {
                        watch_debug!("Skipping '{}' event on session {}", event.event, session);
                        continue;
                    }
                    sink.emit(EngineEvent::StreamMessage {
                        session,
                        data: event.data,
                    });
                }
                Some(Err(EventStreamError::Transport(err))) => return Err(map_reqwest_error(err)),
                Some(Err(err)) => {
                    return Err(StreamError::new(StreamFailureKind::Protocol, err.to_string()))
                }
                None => {
                    return Err(StreamError::new(
                        StreamFailureKind::EndedEarly,
                        "server closed the stream",
                    ))
                }
            }
        }
    }
}

fn is_message_event(kind: &str) -> bool {
    kind.is_empty() || kind == "message"
}

fn map_reqwest_error(err: reqwest::Error) -> StreamError {
    if err.is_timeout() {
        return StreamError::new(StreamFailureKind::Timeout, err.to_string());
    }
    StreamError::new(StreamFailureKind::Network, err.to_string())
}
