// DocChat Engine — Chat Transport (WebSocket)
//
// One outbound WebSocket to `<server>/ws/chat`. Outgoing chat turns are
// JSON text frames; every incoming text frame is one bot reply.
//
// Architecture:
//   - writer task drains an mpsc queue into the socket sink
//   - reader task forwards replies and terminal events to the owner
//   - close / error is terminal: no reconnect, the user restarts

use crate::atoms::error::{ClientError, ClientResult};
use crate::atoms::traits::ChatChannel;
use crate::atoms::types::ChatRequest;
use futures::{SinkExt, StreamExt};
use log::{debug, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message as WsMessage};

/// Delivered to the owner of the ChatClient, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    Reply(String),
    Closed,
    Failed(String),
}

pub struct Transport {
    outgoing: mpsc::UnboundedSender<WsMessage>,
    open: Arc<AtomicBool>,
    reader: JoinHandle<()>,
    writer: JoinHandle<()>,
}

impl Transport {
    /// Open the socket. The returned receiver yields every reply and the
    /// final Closed/Failed event.
    pub async fn connect(url: &str) -> ClientResult<(Self, mpsc::UnboundedReceiver<TransportEvent>)> {
        info!("[transport] Connecting to {}", url);
        let (ws_stream, _) = connect_async(url)
            .await
            .inspect_err(|e| warn!("[transport] Connect to {} failed: {}", url, e))?;
        let (mut ws_tx, mut ws_rx) = ws_stream.split();

        let open = Arc::new(AtomicBool::new(true));
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (outgoing, mut outgoing_rx) = mpsc::unbounded_channel::<WsMessage>();

        let writer_open = open.clone();
        let writer_events = events_tx.clone();
        let writer = tokio::spawn(async move {
            while let Some(frame) = outgoing_rx.recv().await {
                if let Err(e) = ws_tx.send(frame).await {
                    warn!("[transport] Send failed: {}", e);
                    if writer_open.swap(false, Ordering::Relaxed) {
                        let _ = writer_events.send(TransportEvent::Failed(e.to_string()));
                    }
                    break;
                }
            }
            let _ = ws_tx.close().await;
        });

        let reader_open = open.clone();
        let pong_tx = outgoing.clone();
        let reader = tokio::spawn(async move {
            let terminal = loop {
                match ws_rx.next().await {
                    Some(Ok(WsMessage::Text(text))) => {
                        debug!("[transport] Reply ({} chars)", text.len());
                        if events_tx.send(TransportEvent::Reply(text)).is_err() {
                            break TransportEvent::Closed;
                        }
                    }
                    Some(Ok(WsMessage::Ping(data))) => {
                        let _ = pong_tx.send(WsMessage::Pong(data));
                    }
                    Some(Ok(WsMessage::Close(_))) | None => break TransportEvent::Closed,
                    Some(Err(e)) => {
                        warn!("[transport] WS error: {}", e);
                        break TransportEvent::Failed(e.to_string());
                    }
                    Some(Ok(_)) => continue,
                }
            };
            if reader_open.swap(false, Ordering::Relaxed) {
                info!("[transport] Connection ended: {:?}", terminal);
                let _ = events_tx.send(terminal);
            }
        });

        info!("[transport] Connected");
        Ok((Transport { outgoing, open, reader, writer }, events_rx))
    }
}

impl ChatChannel for Transport {
    fn is_open(&self) -> bool {
        self.open.load(Ordering::Relaxed)
    }

    fn send(&self, request: &ChatRequest) -> ClientResult<()> {
        if !self.is_open() {
            return Err(ClientError::Connection("chat channel is not open".into()));
        }
        let frame = serde_json::to_string(request)?;
        self.outgoing
            .send(WsMessage::Text(frame))
            .map_err(|_| ClientError::Connection("chat channel writer has stopped".into()))
    }
}

impl Drop for Transport {
    fn drop(&mut self) {
        self.reader.abort();
        self.writer.abort();
    }
}
