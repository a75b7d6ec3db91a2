//! Native messaging bridge to the browser extension.
//!
//! The bridge implements every browser-side collaborator of the monitor by
//! turning trait calls into [`OutboundFrame::Call`]s and waiting for the
//! matching [`CallReply`]. Replies are matched by call id, so calls from the
//! monitor and from detached sound dispatches may be in flight at once.
//!
//! [`NativeBridge::pump`] owns the read side: it decodes inbound frames,
//! routes replies to their waiting callers and forwards everything else to
//! the monitor's event queue.

use crate::libs::browser::{NotificationSink, PageCommand, PlaybackCommand, PlaybackHost, TabHost, TabId, TabInfo, WindowId};
use crate::libs::messages::Message;
use crate::libs::native::{self, BridgeError, CallReply, HostCall, Inbound, InboundFrame, OutboundFrame};
use crate::libs::nudge::NotificationOptions;
use crate::libs::protocol::{MessageOutcome, MonitorEvent};
use crate::{msg_debug, msg_warning};
use anyhow::Result;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::{mpsc::UnboundedSender, oneshot};

/// Extension page hosting the audio player.
pub const OFFSCREEN_DOCUMENT_PATH: &str = "offscreen.html";
const OFFSCREEN_REASON: &str = "AUDIO_PLAYBACK";
const OFFSCREEN_JUSTIFICATION: &str = "To play audio notifications for Drift extension.";

type Writer = Box<dyn AsyncWrite + Send + Unpin>;

struct Shared {
    writer: tokio::sync::Mutex<Writer>,
    pending: Mutex<HashMap<u64, oneshot::Sender<CallReply>>>,
    next_id: AtomicU64,
    call_timeout: Duration,
}

#[derive(Clone)]
pub struct NativeBridge {
    shared: Arc<Shared>,
}

impl NativeBridge {
    pub fn new<W>(writer: W, call_timeout: Duration) -> Self
    where
        W: AsyncWrite + Send + Unpin + 'static,
    {
        Self {
            shared: Arc::new(Shared {
                writer: tokio::sync::Mutex::new(Box::new(writer)),
                pending: Mutex::new(HashMap::new()),
                next_id: AtomicU64::new(1),
                call_timeout,
            }),
        }
    }

    pub async fn send_frame(&self, frame: &OutboundFrame) -> Result<(), BridgeError> {
        let mut writer = self.shared.writer.lock().await;
        native::write_message(&mut *writer, frame).await
    }

    /// Answers a runtime message forwarded by the extension.
    pub async fn respond(&self, request_id: u64, outcome: MessageOutcome) -> Result<(), BridgeError> {
        self.send_frame(&OutboundFrame::response(request_id, outcome)).await
    }

    /// Performs a browser API call and waits for its result.
    pub async fn call(&self, call: HostCall) -> Result<Value, BridgeError> {
        let id = self.shared.next_id.fetch_add(1, Ordering::Relaxed);
        let method = call.method();
        let (reply_tx, reply_rx) = oneshot::channel();
        self.shared.pending.lock().insert(id, reply_tx);

        if let Err(e) = self.send_frame(&OutboundFrame::Call { id, call }).await {
            self.shared.pending.lock().remove(&id);
            return Err(e);
        }

        match tokio::time::timeout(self.shared.call_timeout, reply_rx).await {
            Ok(Ok(reply)) if reply.ok => Ok(reply.result),
            Ok(Ok(reply)) => Err(BridgeError::Remote(
                method.to_string(),
                reply.error.unwrap_or_else(|| "unknown error".to_string()),
            )),
            Ok(Err(_)) => Err(BridgeError::Closed),
            Err(_) => {
                self.shared.pending.lock().remove(&id);
                Err(BridgeError::Timeout(method.to_string(), self.shared.call_timeout.as_millis() as u64))
            }
        }
    }

    /// Hands a reply to the caller waiting for it. Returns `false` for
    /// replies nobody waits for any more, e.g. after a timeout.
    pub fn deliver(&self, reply: CallReply) -> bool {
        let waiter = self.shared.pending.lock().remove(&reply.id);
        match waiter {
            Some(waiter) => waiter.send(reply).is_ok(),
            None => {
                msg_debug!(Message::OrphanReply(reply.id));
                false
            }
        }
    }

    pub fn pending_calls(&self) -> usize {
        self.shared.pending.lock().len()
    }

    /// Reads frames until the browser closes the stream.
    ///
    /// Malformed frames are logged and skipped. When the stream ends every
    /// call still waiting for a reply fails with [`BridgeError::Closed`].
    pub async fn pump<R>(&self, mut reader: R, events: UnboundedSender<MonitorEvent>) -> Result<(), BridgeError>
    where
        R: AsyncRead + Unpin,
    {
        let result = loop {
            let payload = match native::read_frame(&mut reader).await {
                Ok(Some(payload)) => payload,
                Ok(None) => break Ok(()),
                Err(e) => break Err(e),
            };

            let frame: InboundFrame = match serde_json::from_slice(&payload) {
                Ok(frame) => frame,
                Err(e) => {
                    msg_warning!(Message::MalformedFrame(e.to_string()));
                    continue;
                }
            };

            match Inbound::from(frame) {
                Inbound::Reply(reply) => {
                    self.deliver(reply);
                }
                Inbound::Event(event) => {
                    if events.send(event).is_err() {
                        break Ok(());
                    }
                }
            }
        };

        self.shared.pending.lock().clear();
        result
    }
}

#[async_trait]
impl NotificationSink for NativeBridge {
    async fn show(&self, id: &str, options: &NotificationOptions) -> Result<()> {
        self.call(HostCall::CreateNotification {
            notification_id: id.to_string(),
            options: options.clone(),
        })
        .await?;
        Ok(())
    }

    async fn clear(&self, id: &str) -> Result<bool> {
        let cleared = self
            .call(HostCall::ClearNotification {
                notification_id: id.to_string(),
            })
            .await?;
        Ok(cleared.as_bool().unwrap_or(false))
    }
}

#[async_trait]
impl TabHost for NativeBridge {
    async fn get(&self, tab_id: TabId) -> Result<Option<TabInfo>> {
        let tab = self.call(HostCall::GetTab { tab_id }).await?;
        if tab.is_null() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_value(tab)?))
    }

    async fn focus_window(&self, window_id: WindowId) -> Result<()> {
        self.call(HostCall::FocusWindow { window_id }).await?;
        Ok(())
    }

    async fn activate(&self, tab_id: TabId) -> Result<()> {
        self.call(HostCall::ActivateTab { tab_id }).await?;
        Ok(())
    }

    async fn send_to_page(&self, tab_id: TabId, command: PageCommand) -> Result<()> {
        self.call(HostCall::SendToPage { tab_id, message: command }).await?;
        Ok(())
    }
}

#[async_trait]
impl PlaybackHost for NativeBridge {
    async fn is_running(&self) -> Result<bool> {
        let exists = self
            .call(HostCall::HasOffscreenDocument {
                url: OFFSCREEN_DOCUMENT_PATH.to_string(),
            })
            .await?;
        Ok(exists.as_bool().unwrap_or(false))
    }

    async fn launch(&self) -> Result<()> {
        self.call(HostCall::CreateOffscreenDocument {
            url: OFFSCREEN_DOCUMENT_PATH.to_string(),
            reasons: vec![OFFSCREEN_REASON.to_string()],
            justification: OFFSCREEN_JUSTIFICATION.to_string(),
        })
        .await?;
        Ok(())
    }

    async fn send(&self, command: PlaybackCommand) -> Result<()> {
        self.call(HostCall::SendToPlayback { message: command }).await?;
        Ok(())
    }
}
