use anyhow::{anyhow, Context, Result};
use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message as WsMessage};
use url::Url;

use crate::constants::ROOM_PATH_SEGMENTS;
use crate::error::SyncError;

/// Persistent text-frame connection owned by the room client
pub trait Transport {
    fn is_open(&self) -> bool;

    /// Queue one text frame for delivery
    fn send_text(&self, frame: String) -> crate::error::Result<()>;
}

/// Events surfaced by a connection, in arrival order
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    Message(String),
    Error(String),
    /// Connection is gone; carries the close reason when the peer sent one
    Closed(Option<String>),
}

/// Build the secure room endpoint, e.g. `wss://host/ws/room/<room>/`
pub fn room_endpoint(host: &str, room: &str) -> Result<Url> {
    let mut url = Url::parse(&format!("wss://{host}/")).context("Invalid server host")?;
    url.path_segments_mut()
        .map_err(|_| anyhow!("Server host cannot carry a path"))?
        .clear()
        .extend(ROOM_PATH_SEGMENTS)
        .push(room)
        .push("");
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

/// WebSocket-backed [`Transport`]
pub struct WsTransport {
    inner: Arc<TransportState>,
}

struct TransportState {
    tx: Mutex<Option<mpsc::UnboundedSender<WsMessage>>>,
}

impl TransportState {
    fn clear(&self) {
        *self.tx.lock() = None;
    }
}

impl WsTransport {
    /// Connect to the room server. Inbound frames, errors and the final close
    /// are delivered on the returned receiver.
    pub async fn connect(url: &str) -> Result<(Self, mpsc::UnboundedReceiver<TransportEvent>)> {
        let (ws_stream, _) = connect_async(url)
            .await
            .context("Failed to connect to room server")?;

        let (mut ws_sender, mut ws_receiver) = ws_stream.split();
        let (tx, mut rx) = mpsc::unbounded_channel::<WsMessage>();
        let (event_tx, event_rx) = mpsc::unbounded_channel::<TransportEvent>();

        let inner = Arc::new(TransportState {
            tx: Mutex::new(Some(tx)),
        });

        // Sender task
        let send_inner = Arc::clone(&inner);
        let send_events = event_tx.clone();
        tokio::spawn(async move {
            while let Some(msg) = rx.recv().await {
                let closing = matches!(msg, WsMessage::Close(_));
                if let Err(e) = ws_sender.send(msg).await {
                    let _ = send_events.send(TransportEvent::Error(e.to_string()));
                    break;
                }
                if closing {
                    break;
                }
            }
            send_inner.clear();
        });

        // Receiver task
        let recv_inner = Arc::clone(&inner);
        tokio::spawn(async move {
            let mut reason = None;
            while let Some(msg) = ws_receiver.next().await {
                match msg {
                    Ok(WsMessage::Text(text)) => {
                        let _ = event_tx.send(TransportEvent::Message(text.as_str().to_owned()));
                    }
                    Ok(WsMessage::Close(frame)) => {
                        reason = frame.map(|f| format!("{} {}", u16::from(f.code), f.reason.as_str()));
                        break;
                    }
                    Err(e) => {
                        let _ = event_tx.send(TransportEvent::Error(e.to_string()));
                        break;
                    }
                    _ => {}
                }
            }
            recv_inner.clear();
            let _ = event_tx.send(TransportEvent::Closed(reason));
        });

        Ok((Self { inner }, event_rx))
    }

    /// Send a close frame and stop accepting outbound frames
    pub fn close(&self) {
        if let Some(tx) = self.inner.tx.lock().take() {
            let _ = tx.send(WsMessage::Close(None));
        }
    }
}

impl Transport for WsTransport {
    fn is_open(&self) -> bool {
        self.inner.tx.lock().is_some()
    }

    fn send_text(&self, frame: String) -> crate::error::Result<()> {
        let tx = self.inner.tx.lock().clone().ok_or(SyncError::NotOpen)?;
        tx.send(WsMessage::Text(frame.into()))
            .map_err(|e| SyncError::Send(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_endpoint() {
        let url = room_endpoint("example.com", "abc123").unwrap();
        assert_eq!(url.as_str(), "wss://example.com/ws/room/abc123/");

        let url = room_endpoint("localhost:8000", "42").unwrap();
        assert_eq!(url.as_str(), "wss://localhost:8000/ws/room/42/");
    }

    #[test]
    fn test_room_endpoint_escapes_room() {
        let url = room_endpoint("example.com", "a/b c").unwrap();
        assert_eq!(url.as_str(), "wss://example.com/ws/room/a%2Fb%20c/");
    }

    #[test]
    fn test_room_endpoint_rejects_bad_host() {
        assert!(room_endpoint("exa mple.com", "1").is_err());
    }
}
