//! Native messaging wire format.
//!
//! The browser talks to the host over stdin/stdout. Each message is a 32-bit
//! length in native byte order followed by that many bytes of UTF-8 JSON.
//! The browser refuses host messages above 1 MiB and never sends more than
//! 64 MiB in one message.
//!
//! On top of the framing sits a small envelope protocol:
//!
//! ```text
//! browser ──▶ host   InboundFrame   events, runtime messages, call replies
//! host ──▶ browser   OutboundFrame  message responses, calls into browser APIs
//! ```

use crate::libs::browser::{PageCommand, PlaybackCommand, TabId, WindowId};
use crate::libs::nudge::NotificationOptions;
use crate::libs::protocol::{IdleState, MessageOutcome, MessageResponse, MonitorEvent};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Largest frame the host may send.
pub const MAX_OUTBOUND_FRAME: usize = 1024 * 1024;
/// Largest frame the browser may send.
pub const MAX_INBOUND_FRAME: usize = 64 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("native messaging channel closed")]
    Closed,
    #[error("browser did not answer {0} within {1} ms")]
    Timeout(String, u64),
    #[error("browser call {0} failed: {1}")]
    Remote(String, String),
    #[error("frame of {0} bytes exceeds the {1} byte limit")]
    FrameTooLarge(usize, usize),
    #[error("malformed frame: {0}")]
    Codec(#[from] serde_json::Error),
    #[error("native messaging I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Reads one frame. Returns `Ok(None)` on a clean end of stream between frames;
/// a stream that ends inside a header or payload is an I/O error.
pub async fn read_frame<R>(reader: &mut R) -> Result<Option<Vec<u8>>, BridgeError>
where
    R: AsyncRead + Unpin,
{
    let mut header = [0u8; 4];
    // Only an end of stream before the first header byte is a clean close.
    if reader.read(&mut header[..1]).await? == 0 {
        return Ok(None);
    }
    reader.read_exact(&mut header[1..]).await?;

    let len = u32::from_ne_bytes(header) as usize;
    if len > MAX_INBOUND_FRAME {
        return Err(BridgeError::FrameTooLarge(len, MAX_INBOUND_FRAME));
    }

    let mut payload = vec![0u8; len];
    reader.read_exact(&mut payload).await?;
    Ok(Some(payload))
}

/// Writes one frame and flushes it.
pub async fn write_frame<W>(writer: &mut W, payload: &[u8]) -> Result<(), BridgeError>
where
    W: AsyncWrite + Unpin,
{
    if payload.len() > MAX_OUTBOUND_FRAME {
        return Err(BridgeError::FrameTooLarge(payload.len(), MAX_OUTBOUND_FRAME));
    }
    writer.write_all(&(payload.len() as u32).to_ne_bytes()).await?;
    writer.write_all(payload).await?;
    writer.flush().await?;
    Ok(())
}

pub async fn read_message<R, T>(reader: &mut R) -> Result<Option<T>, BridgeError>
where
    R: AsyncRead + Unpin,
    T: DeserializeOwned,
{
    match read_frame(reader).await? {
        Some(payload) => Ok(Some(serde_json::from_slice(&payload)?)),
        None => Ok(None),
    }
}

pub async fn write_message<W, T>(writer: &mut W, message: &T) -> Result<(), BridgeError>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let payload = serde_json::to_vec(message)?;
    write_frame(writer, &payload).await
}

/// Frames sent by the browser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InboundFrame {
    Message {
        #[serde(rename = "requestId")]
        request_id: u64,
        #[serde(rename = "senderTabId", default)]
        sender_tab_id: Option<TabId>,
        message: Value,
    },
    TabActivated {
        #[serde(rename = "tabId")]
        tab_id: TabId,
    },
    TabRemoved {
        #[serde(rename = "tabId")]
        tab_id: TabId,
    },
    TabUpdated {
        #[serde(rename = "tabId")]
        tab_id: TabId,
        #[serde(default)]
        url: Option<String>,
    },
    IdleStateChanged {
        state: IdleState,
    },
    NotificationClicked {
        #[serde(rename = "notificationId")]
        notification_id: String,
    },
    Reply(CallReply),
}

/// The browser's answer to an [`OutboundFrame::Call`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallReply {
    pub id: u64,
    pub ok: bool,
    #[serde(default)]
    pub result: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// An inbound frame sorted by who consumes it.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    Event(MonitorEvent),
    Reply(CallReply),
}

impl From<InboundFrame> for Inbound {
    fn from(frame: InboundFrame) -> Self {
        let event = match frame {
            InboundFrame::Reply(reply) => return Inbound::Reply(reply),
            InboundFrame::Message {
                request_id,
                sender_tab_id,
                message,
            } => MonitorEvent::Message {
                request_id,
                sender_tab: sender_tab_id,
                message,
            },
            InboundFrame::TabActivated { tab_id } => MonitorEvent::TabActivated(tab_id),
            InboundFrame::TabRemoved { tab_id } => MonitorEvent::TabRemoved(tab_id),
            InboundFrame::TabUpdated { tab_id, url } => MonitorEvent::TabUpdated { tab_id, url },
            InboundFrame::IdleStateChanged { state } => MonitorEvent::IdleStateChanged(state),
            InboundFrame::NotificationClicked { notification_id } => MonitorEvent::NotificationClicked(notification_id),
        };
        Inbound::Event(event)
    }
}

/// Frames sent by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum OutboundFrame {
    Response {
        #[serde(rename = "requestId")]
        request_id: u64,
        handled: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        response: Option<MessageResponse>,
    },
    Call {
        id: u64,
        call: HostCall,
    },
}

impl OutboundFrame {
    pub fn response(request_id: u64, outcome: MessageOutcome) -> Self {
        match outcome {
            MessageOutcome::Handled(response) => OutboundFrame::Response {
                request_id,
                handled: true,
                response: Some(response),
            },
            MessageOutcome::NotHandled => OutboundFrame::Response {
                request_id,
                handled: false,
                response: None,
            },
        }
    }
}

/// Browser API calls the host asks the extension to perform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method")]
pub enum HostCall {
    #[serde(rename = "tabs.get")]
    GetTab {
        #[serde(rename = "tabId")]
        tab_id: TabId,
    },
    #[serde(rename = "tabs.activate")]
    ActivateTab {
        #[serde(rename = "tabId")]
        tab_id: TabId,
    },
    #[serde(rename = "windows.focus")]
    FocusWindow {
        #[serde(rename = "windowId")]
        window_id: WindowId,
    },
    #[serde(rename = "tabs.sendMessage")]
    SendToPage {
        #[serde(rename = "tabId")]
        tab_id: TabId,
        message: PageCommand,
    },
    #[serde(rename = "notifications.create")]
    CreateNotification {
        #[serde(rename = "notificationId")]
        notification_id: String,
        options: NotificationOptions,
    },
    #[serde(rename = "notifications.clear")]
    ClearNotification {
        #[serde(rename = "notificationId")]
        notification_id: String,
    },
    #[serde(rename = "offscreen.has")]
    HasOffscreenDocument {
        url: String,
    },
    #[serde(rename = "offscreen.create")]
    CreateOffscreenDocument {
        url: String,
        reasons: Vec<String>,
        justification: String,
    },
    #[serde(rename = "runtime.sendMessage")]
    SendToPlayback {
        message: PlaybackCommand,
    },
}

impl HostCall {
    /// Method name, for logs and errors.
    pub fn method(&self) -> &'static str {
        match self {
            HostCall::GetTab { .. } => "tabs.get",
            HostCall::ActivateTab { .. } => "tabs.activate",
            HostCall::FocusWindow { .. } => "windows.focus",
            HostCall::SendToPage { .. } => "tabs.sendMessage",
            HostCall::CreateNotification { .. } => "notifications.create",
            HostCall::ClearNotification { .. } => "notifications.clear",
            HostCall::HasOffscreenDocument { .. } => "offscreen.has",
            HostCall::CreateOffscreenDocument { .. } => "offscreen.create",
            HostCall::SendToPlayback { .. } => "runtime.sendMessage",
        }
    }
}
