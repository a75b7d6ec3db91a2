//! Events consumed by the focus monitor and the runtime message protocol.

use crate::libs::browser::TabId;
use crate::libs::nudge::NudgeKind;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// System idle state as reported by the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdleState {
    Active,
    Idle,
    Locked,
}

/// Runtime messages from the settings UI and page observers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum InboundMessage {
    StartMonitoring {
        #[serde(rename = "tabId", alias = "targetId")]
        tab_id: TabId,
        /// Empty when the extension cannot read the tab's URL.
        #[serde(rename = "tabUrl", alias = "targetUrl", default)]
        tab_url: String,
    },
    StopMonitoring,
    VideoPausedTooLong {
        #[serde(rename = "videoUrl", default)]
        video_url: Option<String>,
    },
    VideoPlayed {
        #[serde(rename = "videoUrl", default)]
        video_url: Option<String>,
    },
}

/// Reply body for a handled runtime message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub status: String,
}

/// Result of dispatching a runtime message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageOutcome {
    Handled(MessageResponse),
    /// Unrecognized message; the sender must not wait for a response.
    NotHandled,
}

impl MessageOutcome {
    pub fn handled(status: impl ToString) -> Self {
        MessageOutcome::Handled(MessageResponse { status: status.to_string() })
    }

    pub fn status(&self) -> Option<&str> {
        match self {
            MessageOutcome::Handled(response) => Some(&response.status),
            MessageOutcome::NotHandled => None,
        }
    }
}

/// Everything the monitor reacts to, in delivery order.
#[derive(Debug, Clone, PartialEq)]
pub enum MonitorEvent {
    /// A runtime message. `message` is kept raw so unknown actions can be
    /// reported as not handled instead of failing to decode.
    Message {
        request_id: u64,
        sender_tab: Option<TabId>,
        message: Value,
    },
    TabActivated(TabId),
    TabRemoved(TabId),
    TabUpdated {
        tab_id: TabId,
        url: Option<String>,
    },
    IdleStateChanged(IdleState),
    NotificationClicked(String),
    /// A timeline's timer expired. Stale generations are ignored.
    TimelineFired {
        kind: NudgeKind,
        generation: u64,
    },
}
