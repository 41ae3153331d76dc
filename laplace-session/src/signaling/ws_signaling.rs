use crate::error::SessionError;
use crate::signaling::{Endpoint, SignalingConnector, SignalingEvent, SignalingLink, SignalingOutput};
use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use laplace_core::SignalMessage;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, trace, warn};
use url::Url;

/// Websocket signaling client.
#[derive(Debug, Clone)]
pub struct WsSignaling {
    base: Url,
}

impl WsSignaling {
    pub fn new(base: Url) -> Self {
        Self { base }
    }
}

#[async_trait]
impl SignalingConnector for WsSignaling {
    async fn open(&self, endpoint: &Endpoint) -> Result<SignalingLink, SessionError> {
        let url = endpoint.url(&self.base);
        info!("Connecting signaling websocket {}", url);

        let (ws_stream, _) = connect_async(url.as_str())
            .await
            .map_err(|e| SessionError::Transport(e.to_string()))?;
        let (mut ws_write, mut ws_read) = ws_stream.split();

        let (out_tx, mut out_rx) = mpsc::unbounded_channel::<Message>();
        let (event_tx, event_rx) = mpsc::channel::<SignalingEvent>(256);

        tokio::spawn(async move {
            while let Some(msg) = out_rx.recv().await {
                let closing = matches!(msg, Message::Close(_));
                if let Err(e) = ws_write.send(msg).await {
                    error!("Signaling write failed: {}", e);
                    break;
                }
                if closing {
                    break;
                }
            }
            let _ = ws_write.close().await;
            debug!("Signaling writer finished");
        });

        tokio::spawn(async move {
            let mut reason = None;
            while let Some(frame) = ws_read.next().await {
                let msg = match frame {
                    Ok(msg) => msg,
                    Err(e) => {
                        reason = Some(e.to_string());
                        break;
                    }
                };
                match msg {
                    Message::Text(text) => match SignalMessage::decode(text.as_str()) {
                        Ok(SignalMessage::Beat) => trace!("Signaling beat"),
                        Ok(message) => {
                            debug!("Signaling <- {}", message.kind());
                            if event_tx.send(SignalingEvent::Message(message)).await.is_err() {
                                return;
                            }
                        }
                        Err(e) => warn!("Dropping malformed signaling frame: {}", e),
                    },
                    Message::Close(frame) => {
                        debug!("Signaling closed by server: {:?}", frame);
                        break;
                    }
                    _ => {}
                }
            }
            let _ = event_tx.send(SignalingEvent::Closed(reason)).await;
        });

        Ok(SignalingLink {
            output: Arc::new(WsOutput { tx: out_tx }),
            events: event_rx,
        })
    }
}

/// Outbound half of [`WsSignaling`]; frames are queued for the writer task.
#[derive(Clone)]
pub struct WsOutput {
    tx: mpsc::UnboundedSender<Message>,
}

#[async_trait]
impl SignalingOutput for WsOutput {
    async fn send(&self, message: SignalMessage) {
        let text = match message.encode() {
            Ok(text) => text,
            Err(e) => {
                error!("Failed to encode {}: {}", message.kind(), e);
                return;
            }
        };
        debug!("Signaling -> {}", message.kind());
        if self.tx.send(Message::Text(text.into())).is_err() {
            error!("Signaling writer is gone, dropped {}", message.kind());
        }
    }

    async fn close(&self) {
        let _ = self.tx.send(Message::Close(None));
    }
}
