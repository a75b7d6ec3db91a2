//! Browser-side collaborators of the focus monitor.
//!
//! These traits are the only way the monitor touches the outside world
//! besides the settings store. In production all three are implemented by
//! the native messaging bridge; tests provide recording fakes.

use crate::libs::messages::Message;
use crate::libs::nudge::NotificationOptions;
use crate::msg_warning;
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::future::Future;

pub type TabId = i64;
pub type WindowId = i64;

/// Snapshot of a browser tab as reported by the tab host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabInfo {
    pub id: TabId,
    pub window_id: WindowId,
    #[serde(default)]
    pub url: Option<String>,
    /// Whether the tab is currently producing sound.
    #[serde(default)]
    pub audible: bool,
}

/// Commands sent to the page observer running inside the focus tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum PageCommand {
    CancelVideoPauseTimer,
}

/// Commands sent to the isolated audio playback host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum PlaybackCommand {
    #[serde(rename = "playSoundOffscreen")]
    Play {
        #[serde(rename = "soundPath")]
        sound_path: String,
    },
    #[serde(rename = "stopSoundOffscreen")]
    Stop,
}

/// OS-level toast notifications addressed by stable identifiers.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Shows the notification, replacing any notification with the same id.
    async fn show(&self, id: &str, options: &NotificationOptions) -> Result<()>;
    /// Clears the notification; `Ok(false)` when it was not showing.
    async fn clear(&self, id: &str) -> Result<bool>;
}

/// Tab and window operations plus messaging into pages.
#[async_trait]
pub trait TabHost: Send + Sync {
    /// Looks up a tab; `Ok(None)` when it no longer exists.
    async fn get(&self, tab_id: TabId) -> Result<Option<TabInfo>>;
    async fn focus_window(&self, window_id: WindowId) -> Result<()>;
    async fn activate(&self, tab_id: TabId) -> Result<()>;
    /// Delivers a command to the page observer; fails when the page has no listener.
    async fn send_to_page(&self, tab_id: TabId, command: PageCommand) -> Result<()>;
}

/// Lifecycle of the audio playback host and delivery of commands to it.
#[async_trait]
pub trait PlaybackHost: Send + Sync {
    async fn is_running(&self) -> Result<bool>;
    async fn launch(&self) -> Result<()>;
    async fn send(&self, command: PlaybackCommand) -> Result<()>;
}

/// Awaits a collaborator call, logging and discarding any failure.
///
/// Every outbound call made by the monitor goes through here: a failed
/// notification or message delivery is never worth more than a log line.
pub async fn best_effort<T, F>(what: &str, call: F) -> Option<T>
where
    F: Future<Output = Result<T>>,
{
    match call.await {
        Ok(value) => Some(value),
        Err(e) => {
            msg_warning!(Message::CollaboratorCallFailed(what.to_string(), e.to_string()));
            None
        }
    }
}
